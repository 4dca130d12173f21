//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and the
//! hardware-specific implementations (relay board, sensors) plus the
//! observability seam toward the surrounding layers (log, transport).

pub mod notify;
pub mod relay;
pub mod sensor;

pub use notify::EventSink;
pub use relay::RelayBank;
pub use sensor::{Climate, ClimateSensor, DistanceSensor, MoistureAdc, SensorError};
