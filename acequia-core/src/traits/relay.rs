//! Relay output trait

use crate::channel::Channel;

/// Trait for the physical relay outputs
///
/// Implementations drive the actual pump and valve outputs (GPIO,
/// shift register, I/O expander). The interlock logic decides *when* to
/// switch; implementations only translate a logical on/off into the
/// wire-level polarity of the board.
pub trait RelayBank {
    /// Drive the output for a channel
    ///
    /// Called only for channels with a pin assignment. Must not block.
    fn set_output(&mut self, channel: Channel, on: bool);
}
