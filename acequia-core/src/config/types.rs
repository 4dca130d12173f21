//! Configuration type definitions
//!
//! These types describe the controller setup: pin assignments, safety
//! thresholds, sensor calibration and the daily watering plan. The
//! surrounding configuration layer validates a config before handing it
//! to the core; the core assumes validated input.

use heapless::String;

use crate::channel::{NUM_CHANNELS, NUM_VALVES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum channel label length
pub const MAX_LABEL_LEN: usize = 24;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Errors found by [`ControllerConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A valve's watering duration exceeds the pump autostop ceiling
    DurationExceedsAutostop {
        /// Offending valve index
        valve: u8,
    },
    /// Auto-irrigation start time is not a valid minute of day
    StartMinuteOutOfRange,
    /// Moisture calibration values are unusable
    MoistureCalibration,
    /// Reservoir height and minimum level do not fit together
    ReservoirGeometry,
}

/// One relay channel: pin assignment and display label
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// GPIO pin, `None` disables the channel
    pub pin: Option<u8>,
    /// Human-readable name
    pub label: String<MAX_LABEL_LEN>,
}

impl ChannelConfig {
    /// Create a wired channel
    pub fn new(pin: u8, label: &str) -> Self {
        Self {
            pin: Some(pin),
            label: label_string(label),
        }
    }

    /// Create a disabled channel
    pub fn disabled(label: &str) -> Self {
        Self {
            pin: None,
            label: label_string(label),
        }
    }
}

/// Soil-moisture probe calibration and output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoistureConfig {
    /// Raw ADC reading in dry air
    pub air_raw: u16,
    /// Raw ADC reading in water
    pub water_raw: u16,
    /// Report calibrated percentages instead of raw values
    pub percent: bool,
    /// Smooth bursts with the moving-average window
    pub smooth: bool,
}

impl Default for MoistureConfig {
    fn default() -> Self {
        Self {
            air_raw: 3200,
            water_raw: 1700,
            percent: true,
            smooth: true,
        }
    }
}

/// Daily watering plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutoIrrigationConfig {
    /// Run the daily sequence at all
    pub enabled: bool,
    /// Start time as minutes since local midnight
    pub start_minute: u16,
    /// Skip valves that watered more recently than this many hours
    pub pause_threshold_hours: u8,
    /// Watering duration per valve in seconds, 0 skips the valve
    pub durations_s: [u16; NUM_VALVES],
}

impl Default for AutoIrrigationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_minute: 6 * 60 + 30,
            pause_threshold_hours: 18,
            durations_s: [0; NUM_VALVES],
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Pump channel
    pub pump: ChannelConfig,
    /// Valve channels
    pub valves: [ChannelConfig; NUM_VALVES],
    /// Cooldown window after closing a valve, in seconds
    pub cooldown_s: u32,
    /// Maximum continuous pump runtime, in seconds
    pub pump_autostop_s: u32,
    /// Minimum usable water level, in centimeters
    pub min_level_cm: i16,
    /// Distance from the level sensor to the reservoir floor
    pub reservoir_height_cm: i16,
    /// Operate without a working level sensor
    pub ignore_level: bool,
    /// Moisture probe calibration, shared across valves
    pub moisture: MoistureConfig,
    /// Daily watering plan
    pub auto: AutoIrrigationConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            pump: ChannelConfig::new(4, "pump"),
            valves: [
                ChannelConfig::new(19, "valve1"),
                ChannelConfig::new(18, "valve2"),
                ChannelConfig::new(17, "valve3"),
                ChannelConfig::new(16, "valve4"),
            ],
            cooldown_s: 900,
            pump_autostop_s: 90,
            min_level_cm: 4,
            reservoir_height_cm: 37,
            ignore_level: false,
            moisture: MoistureConfig::default(),
            auto: AutoIrrigationConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Check the configuration-time invariants
    ///
    /// Watering durations must fit under the pump autostop ceiling so a
    /// scheduled cycle can never trip the runtime bound; the moisture
    /// calibration must keep the disconnect threshold (half the air
    /// value) below the wet reading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (v, duration_s) in self.auto.durations_s.iter().enumerate() {
            if u32::from(*duration_s) > self.pump_autostop_s {
                return Err(ConfigError::DurationExceedsAutostop { valve: v as u8 });
            }
        }
        if self.auto.start_minute >= 24 * 60 {
            return Err(ConfigError::StartMinuteOutOfRange);
        }
        if self.moisture.air_raw <= self.moisture.water_raw
            || self.moisture.water_raw < self.moisture.air_raw / 2
        {
            return Err(ConfigError::MoistureCalibration);
        }
        if self.reservoir_height_cm <= 0 || self.min_level_cm >= self.reservoir_height_cm {
            return Err(ConfigError::ReservoirGeometry);
        }
        Ok(())
    }

    /// Enabled flags for the interlock, pump first
    pub fn enabled_channels(&self) -> [bool; NUM_CHANNELS] {
        let mut enabled = [false; NUM_CHANNELS];
        enabled[0] = self.pump.pin.is_some();
        for (i, valve) in self.valves.iter().enumerate() {
            enabled[i + 1] = valve.pin.is_some();
        }
        enabled
    }
}

#[cfg(feature = "serde")]
impl ControllerConfig {
    /// Serialize into a buffer for the persistence layer
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
        postcard::to_slice(self, buf)
    }

    /// Deserialize a persisted configuration
    pub fn from_bytes(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }
}

fn label_string(label: &str) -> String<MAX_LABEL_LEN> {
    let mut s = String::new();
    let _ = s.push_str(label);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_duration_must_fit_under_autostop() {
        let mut cfg = ControllerConfig::default();
        cfg.pump_autostop_s = 90;
        cfg.auto.durations_s = [60, 91, 0, 0];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DurationExceedsAutostop { valve: 1 })
        );
    }

    #[test]
    fn test_start_minute_bounds() {
        let mut cfg = ControllerConfig::default();
        cfg.auto.start_minute = 24 * 60;
        assert_eq!(cfg.validate(), Err(ConfigError::StartMinuteOutOfRange));
    }

    #[test]
    fn test_moisture_calibration_span() {
        let mut cfg = ControllerConfig::default();
        cfg.moisture.water_raw = cfg.moisture.air_raw;
        assert_eq!(cfg.validate(), Err(ConfigError::MoistureCalibration));

        // wet reading below the disconnect threshold is unusable too
        let mut cfg = ControllerConfig::default();
        cfg.moisture.water_raw = cfg.moisture.air_raw / 2 - 100;
        assert_eq!(cfg.validate(), Err(ConfigError::MoistureCalibration));
    }

    #[test]
    fn test_reservoir_geometry() {
        let mut cfg = ControllerConfig::default();
        cfg.min_level_cm = cfg.reservoir_height_cm;
        assert_eq!(cfg.validate(), Err(ConfigError::ReservoirGeometry));
    }

    #[test]
    fn test_enabled_channels() {
        let mut cfg = ControllerConfig::default();
        cfg.valves[2] = ChannelConfig::disabled("valve3");
        let enabled = cfg.enabled_channels();
        assert!(enabled[0]);
        assert!(enabled[1 + 1]);
        assert!(!enabled[2 + 1]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_round_trip() {
        let mut cfg = ControllerConfig::default();
        cfg.auto.enabled = true;
        cfg.auto.durations_s = [60, 45, 0, 30];

        let mut buf = [0u8; 256];
        let bytes = cfg.to_bytes(&mut buf).unwrap();
        let restored = ControllerConfig::from_bytes(bytes).unwrap();
        assert_eq!(cfg, restored);
    }
}
