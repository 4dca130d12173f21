//! Channel identities
//!
//! A channel is one controllable actuator: the shared water pump or one
//! of the valve outputs. Identities are fixed at build time; whether a
//! channel is wired to a pin is configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of valve outputs
pub const NUM_VALVES: usize = 4;

/// Total channel count (pump + valves)
pub const NUM_CHANNELS: usize = NUM_VALVES + 1;

/// One controllable actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    /// The shared water pump
    Pump,
    /// Valve output, 0-based index below [`NUM_VALVES`]
    Valve(u8),
}

impl Channel {
    /// Create a validated valve channel
    pub const fn valve(index: u8) -> Option<Self> {
        if (index as usize) < NUM_VALVES {
            Some(Channel::Valve(index))
        } else {
            None
        }
    }

    /// Slot index into per-channel state arrays (pump first)
    pub const fn index(self) -> usize {
        match self {
            Channel::Pump => 0,
            Channel::Valve(v) => 1 + v as usize,
        }
    }

    /// Inverse of [`Channel::index`]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Channel::Pump),
            i if i < NUM_CHANNELS => Some(Channel::Valve((i - 1) as u8)),
            _ => None,
        }
    }

    /// Check if this is a valve channel
    pub const fn is_valve(self) -> bool {
        matches!(self, Channel::Valve(_))
    }

    /// Default human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            Channel::Pump => "pump",
            Channel::Valve(0) => "valve1",
            Channel::Valve(1) => "valve2",
            Channel::Valve(2) => "valve3",
            Channel::Valve(3) => "valve4",
            Channel::Valve(_) => "valve?",
        }
    }

    /// Iterate over all valve channels
    pub fn valves() -> impl Iterator<Item = Channel> {
        (0..NUM_VALVES as u8).map(Channel::Valve)
    }
}

/// Observable per-channel status
///
/// `Blocked` and `On` are mutually exclusive control states. `Disabled`
/// is reported for channels without a pin assignment, independent of the
/// interlock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelStatus {
    /// Output released
    #[default]
    Off,
    /// Output driven
    On,
    /// Switch-on refused until the block clears
    Blocked,
    /// No pin assigned
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for i in 0..NUM_CHANNELS {
            let ch = Channel::from_index(i).unwrap();
            assert_eq!(ch.index(), i);
        }
        assert!(Channel::from_index(NUM_CHANNELS).is_none());
    }

    #[test]
    fn test_valve_bounds() {
        assert_eq!(Channel::valve(0), Some(Channel::Valve(0)));
        assert_eq!(Channel::valve(NUM_VALVES as u8), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Channel::Pump.label(), "pump");
        assert_eq!(Channel::Valve(0).label(), "valve1");
        assert_eq!(Channel::Valve(3).label(), "valve4");
    }

    #[test]
    fn test_valve_iterator() {
        let valves: std::vec::Vec<Channel> = Channel::valves().collect();
        assert_eq!(valves.len(), NUM_VALVES);
        assert!(valves.iter().all(|c| c.is_valve()));
    }
}
