// src/simulation/rates.rs - Per-minute rates to per-tick deltas
use crate::simulation::properties::SimulationConfig;

/// Converts a per-minute rate into the change applied on one tick of
/// `period_seconds`.
pub fn normalize(rate_per_minute: f64, period_seconds: f64) -> f64 {
    rate_per_minute / 60.0 * period_seconds
}

/// Like [`normalize`], but an unconfigured rate yields an inert delta of 0.
pub fn normalize_or_inert(rate_per_minute: Option<f64>, period_seconds: f64) -> f64 {
    rate_per_minute
        .map(|rate| normalize(rate, period_seconds))
        .unwrap_or(0.0)
}

/// Per-tick deltas derived once from a [`SimulationConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedRates {
    pub heat_delta: f64,
    pub cool_delta: f64,
    pub drift_delta: f64,
}

impl NormalizedRates {
    pub fn new(heat_rate: f64, cool_rate: f64, drift_rate: f64, period_seconds: f64) -> Self {
        Self {
            heat_delta: normalize(heat_rate, period_seconds),
            cool_delta: normalize(cool_rate, period_seconds),
            drift_delta: normalize(drift_rate, period_seconds),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.heat_rate,
            config.cool_rate,
            config.drift_rate,
            config.sample_period,
        )
    }
}
