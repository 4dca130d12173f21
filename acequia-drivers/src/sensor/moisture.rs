//! Capacitive soil-moisture probes
//!
//! One ADC channel per valve. Burst averaging and calibration live in
//! the core's moisture filter; this driver only maps valve indices onto
//! ADC channels.

use acequia_core::channel::NUM_VALVES;
use acequia_core::traits::{MoistureAdc, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcChannel {
    /// Read one raw ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Moisture probe bank
///
/// Valves without a probe are simply absent and report `NotPresent`.
pub struct MoistureProbes<A> {
    channels: [Option<A>; NUM_VALVES],
}

impl<A: AdcChannel> MoistureProbes<A> {
    /// Create a probe bank
    pub fn new(channels: [Option<A>; NUM_VALVES]) -> Self {
        Self { channels }
    }
}

impl<A: AdcChannel> MoistureAdc for MoistureProbes<A> {
    fn read_raw(&mut self, valve: u8) -> Result<u16, SensorError> {
        match self.channels.get_mut(valve as usize) {
            Some(Some(adc)) => adc.read().map_err(|_| SensorError::Bus),
            _ => Err(SensorError::NotPresent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dummy ADC returning a fixed value
    struct DummyAdc(u16);

    impl AdcChannel for DummyAdc {
        fn read(&mut self) -> Result<u16, ()> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_read_mapped_channel() {
        let mut probes = MoistureProbes::new([Some(DummyAdc(2800)), None, None, None]);
        assert_eq!(probes.read_raw(0), Ok(2800));
    }

    #[test]
    fn test_missing_probe() {
        let mut probes = MoistureProbes::new([Some(DummyAdc(2800)), None, None, None]);
        assert_eq!(probes.read_raw(1), Err(SensorError::NotPresent));
        // out-of-range valve index is not a probe either
        assert_eq!(probes.read_raw(9), Err(SensorError::NotPresent));
    }
}
