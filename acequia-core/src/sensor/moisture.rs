//! Soil moisture filter
//!
//! A capacitive probe reads high in dry air and low in water. Each read
//! burst-averages a fixed number of ADC samples to denoise a single
//! reading; an optional moving-average window smooths successive bursts.

use crate::traits::MoistureAdc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ADC samples averaged per burst
pub const MOISTURE_BURST_SAMPLES: u8 = 8;

/// Moving-average window length, in bursts
pub const MOISTURE_WINDOW: usize = 8;

/// Filtered moisture value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoistureReading {
    /// Probe disconnected or never read
    #[default]
    NotPresent,
    /// Filtered raw ADC value
    Raw(u16),
    /// Calibrated moisture in percent
    Percent(u8),
}

/// Burst and window filter for one moisture probe
#[derive(Debug, Clone)]
pub struct MoistureFilter {
    /// Calibration reading in dry air
    air_raw: u16,
    /// Calibration reading in water
    water_raw: u16,
    /// Report a calibrated percentage instead of the raw value
    percent: bool,
    /// Smooth bursts with the moving-average window
    smooth: bool,
    window: [u16; MOISTURE_WINDOW],
    len: u8,
    pos: u8,
    sum: u32,
}

impl MoistureFilter {
    /// Create a filter with the given calibration
    pub fn new(air_raw: u16, water_raw: u16, percent: bool, smooth: bool) -> Self {
        Self {
            air_raw,
            water_raw,
            percent,
            smooth,
            window: [0; MOISTURE_WINDOW],
            len: 0,
            pos: 0,
            sum: 0,
        }
    }

    /// Read and condition one moisture value
    ///
    /// Takes [`MOISTURE_BURST_SAMPLES`] raw samples and averages them.
    /// A burst below half the dry-air calibration value means the probe
    /// is disconnected.
    pub fn read<A: MoistureAdc>(&mut self, adc: &mut A, valve: u8) -> MoistureReading {
        let mut sum = 0u32;
        let mut samples = 0u32;
        for _ in 0..MOISTURE_BURST_SAMPLES {
            if let Ok(raw) = adc.read_raw(valve) {
                sum += u32::from(raw);
                samples += 1;
            }
        }
        if samples == 0 {
            self.clear_window();
            return MoistureReading::NotPresent;
        }

        let burst = (sum / samples) as u16;
        if burst < self.air_raw / 2 {
            self.clear_window();
            return MoistureReading::NotPresent;
        }

        let filtered = if self.smooth { self.push(burst) } else { burst };
        if self.percent {
            MoistureReading::Percent(self.to_percent(filtered))
        } else {
            MoistureReading::Raw(filtered)
        }
    }

    /// Feed the window; smoothing starts once it is fully populated
    fn push(&mut self, burst: u16) -> u16 {
        if (self.len as usize) < MOISTURE_WINDOW {
            self.window[self.len as usize] = burst;
            self.sum += u32::from(burst);
            self.len += 1;
            if (self.len as usize) < MOISTURE_WINDOW {
                return burst;
            }
        } else {
            self.sum -= u32::from(self.window[self.pos as usize]);
            self.window[self.pos as usize] = burst;
            self.sum += u32::from(burst);
            self.pos = (self.pos + 1) % MOISTURE_WINDOW as u8;
        }
        (self.sum / MOISTURE_WINDOW as u32) as u16
    }

    /// Map a raw value onto the calibrated 0-100 range
    fn to_percent(&self, raw: u16) -> u8 {
        let span = self.air_raw.saturating_sub(self.water_raw);
        if span == 0 {
            return 0;
        }
        let clamped = raw.clamp(self.water_raw, self.air_raw);
        ((u32::from(self.air_raw - clamped) * 100) / u32::from(span)) as u8
    }

    /// Discard the window state
    pub fn reset(&mut self) {
        self.clear_window();
    }

    fn clear_window(&mut self) {
        self.window = [0; MOISTURE_WINDOW];
        self.len = 0;
        self.pos = 0;
        self.sum = 0;
    }
}
