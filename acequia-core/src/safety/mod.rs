//! Safety monitoring
//!
//! Forces protective blocks and shutdowns through the relay interlock.

pub mod monitor;

pub use monitor::SafetyMonitor;
