//! Deferred valve transitions
//!
//! A bounded pool of time-ordered jobs plus the daily auto-irrigation
//! planner that fills it.

pub mod jobs;
pub mod plan;

pub use jobs::{JobQueue, ScheduleError, MAX_JOBS};
pub use plan::{AutoIrrigation, SETTLE_GAP_S};
