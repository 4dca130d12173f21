//! Board-agnostic core logic for the irrigation controller
//!
//! This crate contains all control logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (relay bank, sensors, notification sink)
//! - Relay interlock for the pump and valve channels
//! - Safety monitoring over water level and pump runtime
//! - Bounded job scheduler for deferred valve transitions
//! - Sensor conditioning (outlier rejection, burst/window averaging)
//! - Configuration type definitions
//!
//! # Clock domain
//!
//! All timing state lives in a single clock domain: monotonic whole
//! seconds since boot, passed into every tick-path entry point as
//! `now_s`. The daily auto-irrigation trigger additionally consumes
//! minutes since local midnight as a separate observable; the two are
//! never compared against each other.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod channel;
pub mod config;
pub mod controller;
pub mod events;
pub mod relay;
pub mod safety;
pub mod scheduler;
pub mod sensor;
pub mod traits;
