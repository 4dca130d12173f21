//! HC-SR04 ultrasonic distance sensor
//!
//! Fires a 10 µs trigger pulse and converts the echo round-trip time
//! into centimeters. Measuring the echo pulse width needs platform
//! timer support, so it sits behind a small trait.

use acequia_core::traits::{DistanceSensor, SensorError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Trigger pulse width in microseconds
pub const TRIGGER_PULSE_US: u32 = 10;

/// Sound round trip per centimeter of distance
const US_PER_CM: u32 = 58;

/// Shortest distance the sensor resolves
pub const MIN_RANGE_CM: i16 = 2;

/// Longest distance the sensor resolves
pub const MAX_RANGE_CM: i16 = 400;

/// Echo pulse measurement abstraction
pub trait EchoPulse {
    /// Wait for the echo pulse and return its width in microseconds,
    /// or `None` when no echo arrives within the sensor timeout
    fn measure_us(&mut self) -> Option<u32>;
}

/// HC-SR04 driver
pub struct HcSr04<T, E, D> {
    trigger: T,
    echo: E,
    delay: D,
}

impl<T, E, D> HcSr04<T, E, D> {
    /// Create a new driver from the trigger pin, the echo measurement
    /// and a delay provider
    pub fn new(trigger: T, echo: E, delay: D) -> Self {
        Self {
            trigger,
            echo,
            delay,
        }
    }
}

/// Convert an echo pulse width to a distance
///
/// Returns `OutOfRange` outside the sensor's 2-400 cm span.
pub fn pulse_to_cm(pulse_us: u32) -> Result<i16, SensorError> {
    let cm = pulse_us / US_PER_CM;
    if cm < MIN_RANGE_CM as u32 || cm > MAX_RANGE_CM as u32 {
        return Err(SensorError::OutOfRange);
    }
    Ok(cm as i16)
}

impl<T: OutputPin, E: EchoPulse, D: DelayNs> DistanceSensor for HcSr04<T, E, D> {
    fn read_distance_cm(&mut self) -> Result<i16, SensorError> {
        // settle, then fire the trigger pulse
        let _ = self.trigger.set_low();
        self.delay.delay_us(2);
        let _ = self.trigger.set_high();
        self.delay.delay_us(TRIGGER_PULSE_US);
        let _ = self.trigger.set_low();

        let pulse_us = self.echo.measure_us().ok_or(SensorError::NoEcho)?;
        pulse_to_cm(pulse_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct MockTrigger;

    impl embedded_hal::digital::ErrorType for MockTrigger {
        type Error = Infallible;
    }

    impl OutputPin for MockTrigger {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct MockDelay;

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    struct MockEcho(Option<u32>);

    impl EchoPulse for MockEcho {
        fn measure_us(&mut self) -> Option<u32> {
            self.0
        }
    }

    #[test]
    fn test_pulse_conversion() {
        // 58 µs per cm
        assert_eq!(pulse_to_cm(1160), Ok(20));
        assert_eq!(pulse_to_cm(580), Ok(10));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(pulse_to_cm(60), Err(SensorError::OutOfRange));
        assert_eq!(pulse_to_cm(30_000), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_read_distance() {
        let mut sensor = HcSr04::new(MockTrigger, MockEcho(Some(1160)), MockDelay);
        assert_eq!(sensor.read_distance_cm(), Ok(20));
    }

    #[test]
    fn test_no_echo() {
        let mut sensor = HcSr04::new(MockTrigger, MockEcho(None), MockDelay);
        assert_eq!(sensor.read_distance_cm(), Err(SensorError::NoEcho));
    }
}
