//! Sensor traits
//!
//! Raw sensor access only; outlier rejection and averaging live in
//! [`crate::sensor`]. Implementations should return an error rather
//! than a guessed value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur when reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No echo/response within the timeout
    NoEcho,
    /// Sensor not connected
    NotPresent,
    /// Reading outside the physically plausible range
    OutOfRange,
    /// Bus or conversion error
    Bus,
}

/// Trait for the reservoir distance sensor (ultrasonic)
pub trait DistanceSensor {
    /// Measure the distance to the water surface in whole centimeters
    fn read_distance_cm(&mut self) -> Result<i16, SensorError>;
}

/// Trait for the soil-moisture ADC inputs, one per valve
pub trait MoistureAdc {
    /// Take a single raw ADC sample for a valve's moisture probe
    fn read_raw(&mut self, valve: u8) -> Result<u16, SensorError>;
}

/// Ambient temperature and humidity reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Climate {
    /// Temperature with 0.1 °C resolution (e.g. 215 = 21.5 °C)
    pub temperature_c_x10: i16,
    /// Relative humidity in percent
    pub humidity_pct: u8,
}

/// Trait for the ambient climate sensor
pub trait ClimateSensor {
    /// Read temperature and relative humidity
    fn read_climate(&mut self) -> Result<Climate, SensorError>;
}
