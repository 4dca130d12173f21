//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in acequia-core for the controller hardware:
//!
//! - Relay outputs (GPIO pins, per-pin polarity)
//! - Water level sensor (HC-SR04 ultrasonic)
//! - Soil moisture probes (capacitive, via ADC)
//! - Climate sensor (HTU21D over I²C)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod relay;
pub mod sensor;
