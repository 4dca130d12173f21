//! Relay interlock implementation
//!
//! All channel state lives here and is mutated only through the
//! operations below. The rules, always in force:
//!
//! - at most one valve is on at any instant
//! - the pump is on exactly while a valve is open, unless the explicit
//!   pump-only override is active
//! - opening a valve blocks every other valve (pressure sharing)
//! - closing a valve blocks the valve itself for the cooldown window
//! - a blocked channel never switches on

use crate::channel::{Channel, ChannelStatus, NUM_CHANNELS, NUM_VALVES};
use crate::events::Condition;
use crate::traits::{EventSink, RelayBank};

/// Outcome of a channel command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionResult {
    /// Output driven, state changed
    Switched,
    /// Channel already in the requested state, no I/O performed
    Unchanged,
    /// Switch-on refused while the channel is blocked
    Rejected {
        /// Seconds until the cooldown window elapses (0 when the block
        /// is held by the interlock or a safety condition instead)
        blocked_for_s: u32,
    },
    /// Channel has no pin assignment
    Disabled,
}

/// Per-channel control state
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    on: bool,
    blocked: bool,
    enabled: bool,
    /// Monotonic second of the last accepted on/off edge
    last_transition_s: Option<u32>,
}

/// Exclusive owner of the pump and valve states
#[derive(Debug)]
pub struct RelayInterlock {
    slots: [Slot; NUM_CHANNELS],
    cooldown_s: u32,
    pump_override: bool,
}

impl RelayInterlock {
    /// Create an interlock with all channels off and unblocked
    ///
    /// `enabled` marks the channels with a pin assignment, pump first.
    pub fn new(cooldown_s: u32, enabled: [bool; NUM_CHANNELS]) -> Self {
        let mut slots = [Slot::default(); NUM_CHANNELS];
        for (slot, en) in slots.iter_mut().zip(enabled) {
            slot.enabled = en;
        }
        Self {
            slots,
            cooldown_s,
            pump_override: false,
        }
    }

    /// Change the cooldown window
    pub fn set_cooldown(&mut self, cooldown_s: u32) {
        self.cooldown_s = cooldown_s;
    }

    /// Command a channel on or off
    ///
    /// Switch-on of a blocked channel is refused without any I/O.
    /// Opening a valve blocks every other valve; closing a valve blocks
    /// the valve itself and records the transition time. After any valve
    /// transition the pump is recomputed. Every accepted transition is
    /// reported through the sink.
    pub fn set_channel<B: RelayBank, S: EventSink>(
        &mut self,
        channel: Channel,
        want_on: bool,
        now_s: u32,
        bank: &mut B,
        sink: &mut S,
    ) -> TransitionResult {
        let index = channel.index();
        if !self.slots[index].enabled {
            return TransitionResult::Disabled;
        }

        match channel {
            Channel::Pump => {
                if want_on {
                    if self.slots[index].blocked {
                        let blocked_for_s = self.blocked_for(index, now_s);
                        sink.condition(Condition::Rejected {
                            channel,
                            blocked_for_s,
                        });
                        return TransitionResult::Rejected { blocked_for_s };
                    }
                    self.pump_override = true;
                } else {
                    self.pump_override = false;
                }
                if self.update_pump(now_s, bank, sink) {
                    TransitionResult::Switched
                } else {
                    TransitionResult::Unchanged
                }
            }
            Channel::Valve(_) => {
                if want_on {
                    if self.slots[index].blocked {
                        let blocked_for_s = self.blocked_for(index, now_s);
                        sink.condition(Condition::Rejected {
                            channel,
                            blocked_for_s,
                        });
                        return TransitionResult::Rejected { blocked_for_s };
                    }
                    if self.slots[index].on {
                        return TransitionResult::Unchanged;
                    }
                    bank.set_output(channel, true);
                    self.slots[index].on = true;
                    self.slots[index].last_transition_s = Some(now_s);
                    // block the other valves while one is open to keep
                    // up pressure
                    for other in Channel::valves() {
                        if other.index() != index {
                            self.slots[other.index()].blocked = true;
                        }
                    }
                    sink.relay_changed(channel, ChannelStatus::On);
                } else {
                    if !self.slots[index].on {
                        return TransitionResult::Unchanged;
                    }
                    bank.set_output(channel, false);
                    self.slots[index].on = false;
                    self.slots[index].blocked = true;
                    self.slots[index].last_transition_s = Some(now_s);
                    sink.relay_changed(channel, ChannelStatus::Off);
                }
                self.update_pump(now_s, bank, sink);
                TransitionResult::Switched
            }
        }
    }

    /// Recompute the pump from the valve states and the override
    ///
    /// Returns true if the pump changed state.
    fn update_pump<B: RelayBank, S: EventSink>(
        &mut self,
        now_s: u32,
        bank: &mut B,
        sink: &mut S,
    ) -> bool {
        let want_on = self.any_valve_on() || self.pump_override;
        let pump = &mut self.slots[Channel::Pump.index()];

        if want_on && !pump.on && !pump.blocked && pump.enabled {
            bank.set_output(Channel::Pump, true);
            pump.on = true;
            pump.last_transition_s = Some(now_s);
            sink.relay_changed(Channel::Pump, ChannelStatus::On);
            true
        } else if !want_on && pump.on {
            bank.set_output(Channel::Pump, false);
            pump.on = false;
            pump.last_transition_s = Some(now_s);
            sink.relay_changed(Channel::Pump, ChannelStatus::Off);
            true
        } else {
            false
        }
    }

    /// Clear expired valve cooldown blocks
    ///
    /// Called once per tick. A valve unblocks only when its cooldown
    /// window has elapsed, no valve is open and the pump is not blocked.
    pub fn sweep_unblock(&mut self, now_s: u32) {
        // a blocked pump means a safety condition is active
        if self.slots[Channel::Pump.index()].blocked {
            return;
        }
        // keep the cooldown windows while a valve is open
        if self.any_valve_on() {
            return;
        }
        for channel in Channel::valves() {
            let slot = &mut self.slots[channel.index()];
            if !slot.blocked {
                continue;
            }
            let elapsed = match slot.last_transition_s {
                Some(t) => now_s.saturating_sub(t),
                // never switched, no cooldown window to honor
                None => self.cooldown_s,
            };
            if elapsed >= self.cooldown_s {
                slot.blocked = false;
            }
        }
    }

    /// Close every valve, then the pump
    ///
    /// Safety escape hatch; the valves close before the pump.
    pub fn force_all_off<B: RelayBank, S: EventSink>(
        &mut self,
        now_s: u32,
        bank: &mut B,
        sink: &mut S,
    ) {
        for v in (0..NUM_VALVES as u8).rev() {
            let _ = self.set_channel(Channel::Valve(v), false, now_s, bank, sink);
        }
        let _ = self.set_channel(Channel::Pump, false, now_s, bank, sink);
    }

    /// Set the blocked flag on every channel
    pub fn block_all(&mut self) {
        for slot in &mut self.slots {
            slot.blocked = true;
        }
    }

    /// Clear the pump's blocked flag only
    ///
    /// Valve cooldown blocks stay until [`RelayInterlock::sweep_unblock`]
    /// clears them.
    pub fn unblock_pump(&mut self) {
        self.slots[Channel::Pump.index()].blocked = false;
    }

    /// Per-channel observable status, no side effects
    pub fn status_snapshot(&self) -> [ChannelStatus; NUM_CHANNELS] {
        let mut status = [ChannelStatus::Off; NUM_CHANNELS];
        for (i, slot) in self.slots.iter().enumerate() {
            status[i] = if !slot.enabled {
                ChannelStatus::Disabled
            } else if slot.blocked {
                ChannelStatus::Blocked
            } else if slot.on {
                ChannelStatus::On
            } else {
                ChannelStatus::Off
            };
        }
        status
    }

    /// Check if any valve is currently open
    pub fn any_valve_on(&self) -> bool {
        Channel::valves().any(|c| self.slots[c.index()].on)
    }

    /// Check if the pump is running
    pub fn pump_on(&self) -> bool {
        self.slots[Channel::Pump.index()].on
    }

    /// Check if the pump is blocked
    pub fn pump_blocked(&self) -> bool {
        self.slots[Channel::Pump.index()].blocked
    }

    /// Check if the pump-only override is active
    pub fn pump_override(&self) -> bool {
        self.pump_override
    }

    /// Seconds the pump has been running, if it is on
    pub fn pump_run_secs(&self, now_s: u32) -> Option<u32> {
        let pump = &self.slots[Channel::Pump.index()];
        if pump.on {
            Some(now_s.saturating_sub(pump.last_transition_s.unwrap_or(now_s)))
        } else {
            None
        }
    }

    /// Seconds since a valve last changed state, `None` if it never did
    pub fn valve_idle_secs(&self, valve: u8, now_s: u32) -> Option<u32> {
        Channel::valve(valve)
            .and_then(|c| self.slots[c.index()].last_transition_s)
            .map(|t| now_s.saturating_sub(t))
    }

    /// Check if a valve has a pin assignment
    pub fn valve_enabled(&self, valve: u8) -> bool {
        Channel::valve(valve)
            .map(|c| self.slots[c.index()].enabled)
            .unwrap_or(false)
    }

    /// Remaining cooldown seconds for a channel
    fn blocked_for(&self, index: usize, now_s: u32) -> u32 {
        match self.slots[index].last_transition_s {
            Some(t) => self.cooldown_s.saturating_sub(now_s.saturating_sub(t)),
            None => 0,
        }
    }
}
