//! Daily auto-irrigation planner
//!
//! Builds the watering sequence once per day: for every eligible valve
//! an on-job followed by an off-job, staggered so channels never
//! overlap. The interlock still arbitrates each transition when the
//! jobs execute.

use crate::channel::{Channel, NUM_VALVES};
use crate::config::AutoIrrigationConfig;
use crate::events::Condition;
use crate::relay::RelayInterlock;
use crate::scheduler::jobs::JobQueue;
use crate::traits::EventSink;

/// Pause between one valve closing and the next one opening, in seconds
///
/// Leaves room for the closing valve's transition and the unblock sweep
/// before the next on-job is due.
pub const SETTLE_GAP_S: u32 = 5;

/// Daily watering trigger and sequence builder
#[derive(Debug, Clone)]
pub struct AutoIrrigation {
    enabled: bool,
    /// Minutes since local midnight
    start_minute: u16,
    /// A valve is skipped while it watered more recently than this
    pause_threshold_s: u32,
    durations_s: [u16; NUM_VALVES],
    /// Last observed minute-of-day, for edge detection
    prev_minute: Option<u16>,
}

impl AutoIrrigation {
    /// Create a planner from its configuration
    pub fn new(cfg: &AutoIrrigationConfig) -> Self {
        Self {
            enabled: cfg.enabled,
            start_minute: cfg.start_minute,
            pause_threshold_s: u32::from(cfg.pause_threshold_hours) * 3600,
            durations_s: cfg.durations_s,
            prev_minute: None,
        }
    }

    /// Replace the configuration, keeping the trigger edge state
    pub fn set_config(&mut self, cfg: &AutoIrrigationConfig) {
        self.enabled = cfg.enabled;
        self.start_minute = cfg.start_minute;
        self.pause_threshold_s = u32::from(cfg.pause_threshold_hours) * 3600;
        self.durations_s = cfg.durations_s;
    }

    /// Evaluate the daily trigger for this tick
    ///
    /// Fires on the transition into the configured minute, and only if
    /// no previous sequence is still in flight.
    pub fn check<S: EventSink>(
        &mut self,
        minute_of_day: u16,
        now_s: u32,
        relays: &RelayInterlock,
        jobs: &mut JobQueue,
        sink: &mut S,
    ) {
        let fire = self.enabled
            && minute_of_day == self.start_minute
            && self.prev_minute != Some(self.start_minute);
        self.prev_minute = Some(minute_of_day);

        if !fire || jobs.has_pending() {
            return;
        }

        let mut start_s = now_s + 1;
        let mut scheduled = 0u8;
        for v in 0..NUM_VALVES as u8 {
            let duration_s = u32::from(self.durations_s[v as usize]);
            if duration_s == 0 || !relays.valve_enabled(v) {
                continue;
            }
            // recently watered valves sit this sequence out
            if let Some(idle_s) = relays.valve_idle_secs(v, now_s) {
                if idle_s < self.pause_threshold_s {
                    continue;
                }
            }
            if jobs.schedule(start_s, Channel::Valve(v), true).is_err()
                || jobs
                    .schedule(start_s + duration_s, Channel::Valve(v), false)
                    .is_err()
            {
                break;
            }
            scheduled += 2;
            start_s += duration_s + SETTLE_GAP_S;
        }

        if scheduled > 0 {
            sink.condition(Condition::AutoIrrigation { jobs: scheduled });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelStatus, NUM_CHANNELS};
    use crate::relay::RelayInterlock;
    use crate::traits::RelayBank;
    use std::vec::Vec;

    struct NullBank;

    impl RelayBank for NullBank {
        fn set_output(&mut self, _channel: Channel, _on: bool) {}
    }

    struct RecordingSink {
        conditions: Vec<Condition>,
    }

    impl EventSink for RecordingSink {
        fn relay_changed(&mut self, _channel: Channel, _status: ChannelStatus) {}

        fn condition(&mut self, condition: Condition) {
            self.conditions.push(condition);
        }
    }

    fn config() -> AutoIrrigationConfig {
        AutoIrrigationConfig {
            enabled: true,
            start_minute: 6 * 60 + 30,
            pause_threshold_hours: 12,
            durations_s: [60, 120, 30, 0],
        }
    }

    fn fixture() -> (RelayInterlock, JobQueue, NullBank, RecordingSink) {
        (
            RelayInterlock::new(900, [true; NUM_CHANNELS]),
            JobQueue::new(),
            NullBank,
            RecordingSink {
                conditions: Vec::new(),
            },
        )
    }

    #[test]
    fn test_fires_only_on_minute_edge() {
        let (relays, mut jobs, _bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&config());

        auto.check(389, 0, &relays, &mut jobs, &mut sink);
        assert!(!jobs.has_pending());

        auto.check(390, 60, &relays, &mut jobs, &mut sink);
        // valves 0..2 eligible, valve 3 has no duration
        assert_eq!(jobs.pending(), 6);
        assert!(sink
            .conditions
            .iter()
            .any(|c| *c == Condition::AutoIrrigation { jobs: 6 }));
    }

    #[test]
    fn test_no_refire_within_the_same_minute() {
        let (mut relays, mut jobs, mut bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&config());

        auto.check(390, 0, &relays, &mut jobs, &mut sink);
        let pending = jobs.pending();

        // drain the queue so has_pending cannot mask a refire
        for t in 0..500u32 {
            jobs.tick(t, &mut relays, &mut bank, &mut sink);
            relays.sweep_unblock(t);
        }
        assert!(!jobs.has_pending());

        auto.check(390, 500, &relays, &mut jobs, &mut sink);
        assert!(!jobs.has_pending());
        assert_eq!(pending, 6);
    }

    #[test]
    fn test_fires_again_next_day() {
        let (relays, mut jobs, _bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&AutoIrrigationConfig {
            durations_s: [60, 0, 0, 0],
            ..config()
        });

        auto.check(390, 0, &relays, &mut jobs, &mut sink);
        assert_eq!(jobs.pending(), 2);
        auto.check(391, 60, &relays, &mut jobs, &mut sink);

        // next day, the minute edge comes around again; the first
        // sequence is long done but the valves watered recently
        let mut jobs = JobQueue::new();
        auto.check(390, 86_400, &relays, &mut jobs, &mut sink);
        assert_eq!(jobs.pending(), 2);
    }

    #[test]
    fn test_disabled_planner_never_fires() {
        let (relays, mut jobs, _bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&AutoIrrigationConfig {
            enabled: false,
            ..config()
        });

        auto.check(390, 0, &relays, &mut jobs, &mut sink);
        assert!(!jobs.has_pending());
    }

    #[test]
    fn test_skips_while_sequence_in_flight() {
        let (relays, mut jobs, _bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&config());

        jobs.schedule(1000, Channel::Valve(0), false).unwrap();
        auto.check(390, 0, &relays, &mut jobs, &mut sink);
        assert_eq!(jobs.pending(), 1);
    }

    #[test]
    fn test_recently_watered_valve_skipped() {
        let (mut relays, mut jobs, mut bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&config());

        // valve 1 watered two hours ago, threshold is twelve
        let two_hours_ago = 86_400 - 2 * 3600;
        relays.set_channel(Channel::Valve(1), true, two_hours_ago - 60, &mut bank, &mut sink);
        relays.set_channel(Channel::Valve(1), false, two_hours_ago, &mut bank, &mut sink);

        auto.check(390, 86_400, &relays, &mut jobs, &mut sink);
        // only valves 0 and 2 scheduled
        assert_eq!(jobs.pending(), 4);
    }

    #[test]
    fn test_disabled_valve_skipped() {
        let mut enabled = [true; NUM_CHANNELS];
        enabled[Channel::Valve(0).index()] = false;
        let relays = RelayInterlock::new(900, enabled);
        let mut jobs = JobQueue::new();
        let mut sink = RecordingSink {
            conditions: Vec::new(),
        };
        let mut auto = AutoIrrigation::new(&config());

        auto.check(390, 0, &relays, &mut jobs, &mut sink);
        // valves 1 and 2 remain
        assert_eq!(jobs.pending(), 4);
    }

    #[test]
    fn test_sequence_never_overlaps() {
        let (mut relays, mut jobs, mut bank, mut sink) = fixture();
        let mut auto = AutoIrrigation::new(&config());

        auto.check(390, 0, &relays, &mut jobs, &mut sink);

        // drive the tick loop and watch the sequence play out:
        // valve0 1..61, valve1 66..186, valve2 191..221
        for t in 0..400u32 {
            jobs.tick(t, &mut relays, &mut bank, &mut sink);
            relays.sweep_unblock(t);

            let on: Vec<Channel> = Channel::valves()
                .filter(|c| relays.status_snapshot()[c.index()] == ChannelStatus::On)
                .collect();
            assert!(on.len() <= 1, "overlap at t={}", t);

            match t {
                1 => assert_eq!(on, std::vec![Channel::Valve(0)]),
                61 => assert!(on.is_empty()),
                66 => assert_eq!(on, std::vec![Channel::Valve(1)]),
                186 => assert!(on.is_empty()),
                191 => assert_eq!(on, std::vec![Channel::Valve(2)]),
                221 => assert!(on.is_empty()),
                _ => {}
            }
        }
        assert!(!jobs.has_pending());
    }
}
