//! Sensor conditioning
//!
//! Turns raw distance and ADC readings into stable water-level and
//! soil-moisture signals. Raw access lives behind the traits in
//! [`crate::traits`]; everything here is pure filter state.

pub mod level;
pub mod moisture;

pub use level::{LevelFilter, LevelReading, LEVEL_REJECT_LIMIT};
pub use moisture::{MoistureFilter, MoistureReading, MOISTURE_BURST_SAMPLES, MOISTURE_WINDOW};
