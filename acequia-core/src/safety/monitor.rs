//! Safety monitor implementation
//!
//! Consumes the filtered water level and the pump's elapsed runtime and
//! forces blocks or a full shutdown through the relay interlock. All
//! transitions are idempotent: re-evaluating an applied state changes
//! nothing and toggles no output.

use crate::events::Condition;
use crate::relay::RelayInterlock;
use crate::sensor::LevelReading;
use crate::traits::{EventSink, RelayBank};

/// Safety monitor for the reservoir and the pump
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    /// Minimum usable water level in centimeters
    min_level_cm: i16,
    /// Operate without a working level sensor
    ignore_level: bool,
    /// Maximum continuous pump runtime in seconds
    autostop_s: u32,
}

impl SafetyMonitor {
    /// Create a new safety monitor
    pub fn new(min_level_cm: i16, ignore_level: bool, autostop_s: u32) -> Self {
        Self {
            min_level_cm,
            ignore_level,
            autostop_s,
        }
    }

    /// Change the level-ignore override
    pub fn set_ignore_level(&mut self, ignore: bool) {
        self.ignore_level = ignore;
    }

    /// Change the thresholds
    pub fn set_limits(&mut self, min_level_cm: i16, autostop_s: u32) {
        self.min_level_cm = min_level_cm;
        self.autostop_s = autostop_s;
    }

    /// Evaluate all safety conditions for this tick
    ///
    /// Level transitions are applied first, then the runtime ceiling.
    /// The ceiling is unconditional: it fires even while the level is
    /// unknown or ignored.
    pub fn evaluate<B: RelayBank, S: EventSink>(
        &mut self,
        level: LevelReading,
        now_s: u32,
        relays: &mut RelayInterlock,
        bank: &mut B,
        sink: &mut S,
    ) {
        match level {
            LevelReading::Unknown if !self.ignore_level => {
                if !relays.pump_blocked() {
                    sink.condition(Condition::SystemBlocked);
                    relays.force_all_off(now_s, bank, sink);
                    relays.block_all();
                }
            }
            LevelReading::Known(cm) if cm <= self.min_level_cm && !self.ignore_level => {
                if !relays.pump_blocked() {
                    sink.condition(Condition::LowWater { level_cm: cm });
                    relays.force_all_off(now_s, bank, sink);
                    relays.block_all();
                }
            }
            _ => {
                // recovered, or the level is deliberately ignored;
                // valve cooldown blocks stay with the interlock
                if relays.pump_blocked() {
                    relays.unblock_pump();
                    sink.condition(Condition::PumpUnblocked {
                        ignoring_level: self.ignore_level,
                    });
                }
            }
        }

        // upper bound against accidental overwatering
        if let Some(run_s) = relays.pump_run_secs(now_s) {
            if run_s > self.autostop_s {
                sink.condition(Condition::PumpAutostop {
                    limit_s: self.autostop_s,
                });
                relays.force_all_off(now_s, bank, sink);
            }
        }
    }
}
