//! Condition records emitted through the notification seam
//!
//! Typed counterparts of the original controller's log lines. The sink
//! decides how to render or transport them.

use crate::channel::Channel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Safety and scheduling conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Condition {
    /// Water level unknown, every channel blocked
    SystemBlocked,
    /// Water level at or below the configured minimum
    LowWater {
        /// Filtered level in centimeters
        level_cm: i16,
    },
    /// Pump safety block cleared
    PumpUnblocked {
        /// The level-ignore override is set
        ignoring_level: bool,
    },
    /// Pump exceeded its maximum continuous runtime
    PumpAutostop {
        /// Configured ceiling in seconds
        limit_s: u32,
    },
    /// Switch-on refused while the channel is blocked
    Rejected {
        /// Channel the command targeted
        channel: Channel,
        /// Seconds until the cooldown window elapses
        blocked_for_s: u32,
    },
    /// Daily watering sequence scheduled
    AutoIrrigation {
        /// Number of jobs placed in the queue
        jobs: u8,
    },
}
