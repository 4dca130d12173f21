//! Sensor drivers

pub mod hcsr04;
pub mod htu21d;
pub mod moisture;

pub use hcsr04::{EchoPulse, HcSr04};
pub use htu21d::Htu21d;
pub use moisture::{AdcChannel, MoistureProbes};
