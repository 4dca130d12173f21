//! Controller tick loop
//!
//! Owns the interlock, safety monitor, scheduler and sensor filters and
//! wires them to the collaborator implementations. The external driver
//! calls [`Controller::tick`] once per second; everything in here runs
//! to completion without blocking.

use crate::channel::{Channel, ChannelStatus, NUM_CHANNELS, NUM_VALVES};
use crate::config::ControllerConfig;
use crate::relay::{RelayInterlock, TransitionResult};
use crate::safety::SafetyMonitor;
use crate::scheduler::{AutoIrrigation, JobQueue, ScheduleError};
use crate::sensor::{LevelFilter, LevelReading, MoistureFilter, MoistureReading};
use crate::traits::{Climate, ClimateSensor, DistanceSensor, EventSink, MoistureAdc, RelayBank};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Level sensor cadence while the pump is idle; with the pump running
/// the level is read every tick
pub const LEVEL_READ_INTERVAL_S: u32 = 20;

/// Climate sensor cadence
pub const CLIMATE_READ_INTERVAL_S: u32 = 60;

/// Moisture probe cadence
pub const MOISTURE_READ_INTERVAL_S: u32 = 300;

/// Aggregate status for the surrounding layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusSnapshot {
    /// Per-channel status, pump first
    pub channels: [ChannelStatus; NUM_CHANNELS],
    /// Filtered water level
    pub level: LevelReading,
    /// Filtered moisture per valve
    pub moisture: [MoistureReading; NUM_VALVES],
    /// Last ambient reading, if any
    pub climate: Option<Climate>,
    /// Queued scheduler jobs
    pub jobs_pending: u8,
}

/// Top-level controller
///
/// The only entry points the surrounding layers (web, MQTT, CLI) may
/// call are [`Controller::set_channel`], [`Controller::schedule`],
/// [`Controller::status`] and [`Controller::tick`].
pub struct Controller<B, D, M, C, S> {
    relays: RelayInterlock,
    safety: SafetyMonitor,
    jobs: JobQueue,
    auto: AutoIrrigation,
    level: LevelFilter,
    moisture_filters: [MoistureFilter; NUM_VALVES],
    moisture_readings: [MoistureReading; NUM_VALVES],
    climate: Option<Climate>,
    bank: B,
    distance: D,
    moisture_adc: M,
    climate_sensor: C,
    sink: S,
    last_level_read_s: Option<u32>,
    last_climate_read_s: Option<u32>,
    last_moisture_read_s: Option<u32>,
}

impl<B, D, M, C, S> Controller<B, D, M, C, S>
where
    B: RelayBank,
    D: DistanceSensor,
    M: MoistureAdc,
    C: ClimateSensor,
    S: EventSink,
{
    /// Create a controller from a validated configuration
    pub fn new(
        cfg: &ControllerConfig,
        bank: B,
        distance: D,
        moisture_adc: M,
        climate_sensor: C,
        sink: S,
    ) -> Self {
        let m = &cfg.moisture;
        Self {
            relays: RelayInterlock::new(cfg.cooldown_s, cfg.enabled_channels()),
            safety: SafetyMonitor::new(cfg.min_level_cm, cfg.ignore_level, cfg.pump_autostop_s),
            jobs: JobQueue::new(),
            auto: AutoIrrigation::new(&cfg.auto),
            level: LevelFilter::new(cfg.reservoir_height_cm),
            moisture_filters: core::array::from_fn(|_| {
                MoistureFilter::new(m.air_raw, m.water_raw, m.percent, m.smooth)
            }),
            moisture_readings: [MoistureReading::NotPresent; NUM_VALVES],
            climate: None,
            bank,
            distance,
            moisture_adc,
            climate_sensor,
            sink,
            last_level_read_s: None,
            last_climate_read_s: None,
            last_moisture_read_s: None,
        }
    }

    /// Run one controller tick
    ///
    /// `now_s` is monotonic seconds since boot, `minute_of_day` minutes
    /// since local midnight. Order per tick: refresh sensors, evaluate
    /// safety, dispatch at most one due job, check the daily trigger,
    /// sweep expired cooldown blocks.
    pub fn tick(&mut self, now_s: u32, minute_of_day: u16) {
        let level_due = self.relays.pump_on()
            || match self.last_level_read_s {
                None => true,
                Some(t) => now_s.saturating_sub(t) >= LEVEL_READ_INTERVAL_S,
            };
        if level_due {
            let raw_cm = self.distance.read_distance_cm().unwrap_or(-1);
            self.level.update(raw_cm);
            self.last_level_read_s = Some(now_s);
        }

        self.safety.evaluate(
            self.level.reading(),
            now_s,
            &mut self.relays,
            &mut self.bank,
            &mut self.sink,
        );

        self.jobs
            .tick(now_s, &mut self.relays, &mut self.bank, &mut self.sink);

        self.auto
            .check(minute_of_day, now_s, &self.relays, &mut self.jobs, &mut self.sink);

        self.relays.sweep_unblock(now_s);

        let climate_due = match self.last_climate_read_s {
            None => true,
            Some(t) => now_s.saturating_sub(t) >= CLIMATE_READ_INTERVAL_S,
        };
        if climate_due {
            // a failed read keeps the previous value
            if let Ok(climate) = self.climate_sensor.read_climate() {
                self.climate = Some(climate);
            }
            self.last_climate_read_s = Some(now_s);
        }

        let moisture_due = match self.last_moisture_read_s {
            None => true,
            Some(t) => now_s.saturating_sub(t) >= MOISTURE_READ_INTERVAL_S,
        };
        if moisture_due {
            for v in 0..NUM_VALVES {
                self.moisture_readings[v] =
                    self.moisture_filters[v].read(&mut self.moisture_adc, v as u8);
            }
            self.last_moisture_read_s = Some(now_s);
        }
    }

    /// Command a channel on or off
    pub fn set_channel(
        &mut self,
        channel: Channel,
        want_on: bool,
        now_s: u32,
    ) -> TransitionResult {
        self.relays
            .set_channel(channel, want_on, now_s, &mut self.bank, &mut self.sink)
    }

    /// Schedule a deferred channel transition
    pub fn schedule(
        &mut self,
        due_s: u32,
        channel: Channel,
        want_on: bool,
    ) -> Result<(), ScheduleError> {
        self.jobs.schedule(due_s, channel, want_on)
    }

    /// Aggregate status, no side effects
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            channels: self.relays.status_snapshot(),
            level: self.level.reading(),
            moisture: self.moisture_readings,
            climate: self.climate,
            jobs_pending: self.jobs.pending() as u8,
        }
    }

    /// Check for queued scheduler jobs
    pub fn has_pending_jobs(&self) -> bool {
        self.jobs.has_pending()
    }

    /// Apply changed thresholds and calibration
    ///
    /// Resets all sensor filter state. Pin assignments stay as they
    /// were at construction; changing them requires a restart, as on
    /// the original hardware.
    pub fn apply_config(&mut self, cfg: &ControllerConfig) {
        self.relays.set_cooldown(cfg.cooldown_s);
        self.safety
            .set_limits(cfg.min_level_cm, cfg.pump_autostop_s);
        self.safety.set_ignore_level(cfg.ignore_level);
        self.auto.set_config(&cfg.auto);
        self.level.reset(cfg.reservoir_height_cm);
        let m = &cfg.moisture;
        self.moisture_filters =
            core::array::from_fn(|_| MoistureFilter::new(m.air_raw, m.water_raw, m.percent, m.smooth));
        self.moisture_readings = [MoistureReading::NotPresent; NUM_VALVES];
        self.last_level_read_s = None;
        self.last_moisture_read_s = None;
    }
}
