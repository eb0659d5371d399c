// src/simulation/clamp.rs - Optional bounding of computed values
use serde::{Deserialize, Serialize};

use crate::unit::TemperatureUnit;

/// Bound `value` to `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Clamp selection as written in a sensor's configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClampMode {
    None,
    Bounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClampPolicy {
    #[default]
    Unbounded,
    Bounded { min: f64, max: f64 },
}

impl ClampPolicy {
    /// Bounded policy; inverted bounds are swapped.
    pub fn bounded(min: f64, max: f64) -> Self {
        if min > max {
            tracing::warn!("Clamp bounds inverted (min {} > max {}), swapping", min, max);
            Self::Bounded { min: max, max: min }
        } else {
            Self::Bounded { min, max }
        }
    }

    /// Resolves the policy for a sensor. Without an explicit mode the sensor
    /// is bounded only when a bound was configured; a missing bound falls back
    /// to zero or the unit's boiling point. A fallback never overrides the
    /// configured bound it conflicts with.
    pub fn resolve(mode: Option<ClampMode>, min: Option<f64>, max: Option<f64>, unit: TemperatureUnit) -> Self {
        let bounded = match mode {
            Some(ClampMode::None) => false,
            Some(ClampMode::Bounded) => true,
            None => min.is_some() || max.is_some(),
        };
        if !bounded {
            return Self::Unbounded;
        }
        match (min, max) {
            (Some(min), Some(max)) => Self::bounded(min, max),
            (Some(min), None) => Self::Bounded { min, max: unit.boiling_point().max(min) },
            (None, Some(max)) => Self::Bounded { min: 0.0_f64.min(max), max },
            (None, None) => Self::Bounded { min: 0.0, max: unit.boiling_point() },
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ClampPolicy::Unbounded => value,
            ClampPolicy::Bounded { min, max } => clamp(value, min, max),
        }
    }
}
