//! Relay output drivers

pub mod gpio;

pub use gpio::{GpioRelayBank, RelayPin};
