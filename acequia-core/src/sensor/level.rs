//! Water level filter
//!
//! Converts raw distance readings from the ultrasonic sensor into a
//! reservoir level, rejecting implausible samples. The level is the
//! distance subtracted from the reservoir height.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consecutive rejections tolerated before the level turns unknown
pub const LEVEL_REJECT_LIMIT: u8 = 3;

/// Maximum relative change between consecutive samples, in percent
const MAX_RELATIVE_CHANGE_PCT: i32 = 25;

/// Filtered water level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LevelReading {
    /// No accepted reading, or rejections persisted past the limit
    #[default]
    Unknown,
    /// Water level above the reservoir floor in centimeters
    Known(i16),
}

/// Outlier-rejecting filter for the reservoir level
#[derive(Debug, Clone)]
pub struct LevelFilter {
    reservoir_height_cm: i16,
    /// Baseline for the relative-change check; moves on every sample
    prev_cm: Option<i16>,
    rejects: u8,
    reading: LevelReading,
}

impl LevelFilter {
    /// Create a filter for a reservoir of the given height
    pub fn new(reservoir_height_cm: i16) -> Self {
        Self {
            reservoir_height_cm,
            prev_cm: None,
            rejects: 0,
            reading: LevelReading::Unknown,
        }
    }

    /// Feed one raw distance sample
    ///
    /// A sample is rejected when it is non-positive, deviates more than
    /// 25 % from the previous sample, or exceeds the reservoir height by
    /// more than 10 %. After more than [`LEVEL_REJECT_LIMIT`] rejections
    /// in a row the level reports unknown until a sample is accepted.
    pub fn update(&mut self, raw_cm: i16) -> LevelReading {
        let limit_cm = self.reservoir_height_cm + self.reservoir_height_cm / 10;
        let rejected = raw_cm <= 0
            || raw_cm > limit_cm
            || match self.prev_cm {
                Some(prev) => {
                    ((prev as i32 - raw_cm as i32).abs() * 100) / raw_cm as i32
                        > MAX_RELATIVE_CHANGE_PCT
                }
                None => false,
            };

        if rejected {
            self.rejects = self.rejects.saturating_add(1);
            if self.rejects > LEVEL_REJECT_LIMIT {
                self.reading = LevelReading::Unknown;
            }
        } else {
            self.rejects = 0;
            self.reading = LevelReading::Known(self.reservoir_height_cm - raw_cm);
        }

        // the baseline follows every sample so a genuine level jump
        // re-accepts on the second consistent reading
        self.prev_cm = Some(raw_cm);
        self.reading
    }

    /// Current filtered level
    pub fn reading(&self) -> LevelReading {
        self.reading
    }

    /// Consecutive rejections so far
    pub fn rejects(&self) -> u8 {
        self.rejects
    }

    /// Discard all filter state
    pub fn reset(&mut self, reservoir_height_cm: i16) {
        *self = Self::new(reservoir_height_cm);
    }
}
