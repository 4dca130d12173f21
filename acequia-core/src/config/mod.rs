//! Configuration types
//!
//! Board-agnostic configuration structures stored as postcard binary
//! data by the persistence layer.

pub mod types;

pub use types::*;
