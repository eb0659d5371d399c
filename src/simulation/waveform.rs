// src/simulation/waveform.rs - Deterministic sine waveform
use std::f64::consts::PI;
use tokio::time::Instant;

use crate::simulation::properties::WaveformConfig;

/// Sine wave between `min` and `max`, measured from a fixed origin so the
/// signal does not accumulate timing drift.
#[derive(Debug, Clone, Copy)]
pub struct WaveformGenerator {
    amplitude: f64,
    midpoint: f64,
    period: f64,
    start_time: Instant,
}

impl WaveformGenerator {
    pub fn new(config: &WaveformConfig, start_time: Instant) -> Self {
        Self {
            amplitude: config.amplitude(),
            midpoint: config.midpoint(),
            period: config.period,
            start_time,
        }
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        self.value_at_elapsed(now.saturating_duration_since(self.start_time).as_secs_f64())
    }

    /// Value `elapsed_secs` after the origin.
    pub fn value_at_elapsed(&self, elapsed_secs: f64) -> f64 {
        let phase = elapsed_secs.rem_euclid(self.period);
        let radians = phase / self.period * PI * 2.0;
        self.amplitude * radians.sin() + self.midpoint
    }
}
