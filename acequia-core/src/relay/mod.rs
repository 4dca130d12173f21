//! Relay interlock
//!
//! Owns the on/off/blocked state of the pump and valve channels and
//! enforces the pressure-sharing and cooldown rules.

pub mod interlock;

pub use interlock::{RelayInterlock, TransitionResult};
