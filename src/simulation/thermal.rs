// src/simulation/thermal.rs - Actuator-driven thermal state machine
use serde::{Deserialize, Serialize};

use crate::actuator::{ActuatorSnapshot, ActuatorState};
use crate::simulation::clamp::ClampPolicy;
use crate::simulation::properties::SimulationConfig;
use crate::simulation::rates::NormalizedRates;
use crate::unit::TemperatureUnit;

/// How an actuator's reported power scales its effect.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorPowerModel {
    /// On/off only; reported power is ignored.
    #[default]
    Binary,
    /// Deltas are scaled by the actuator's power fraction.
    Proportional,
}

impl ActuatorPowerModel {
    pub fn snapshot(&self, state: Option<ActuatorState>) -> ActuatorSnapshot {
        match (self, state) {
            (_, None) => ActuatorSnapshot::INACTIVE,
            (ActuatorPowerModel::Binary, Some(s)) => ActuatorSnapshot::new(s.active, 1.0),
            (ActuatorPowerModel::Proportional, Some(s)) => ActuatorSnapshot::new(s.active, s.power_fraction()),
        }
    }
}

/// Next value of the process variable.
///
/// Heating wins over cooling when both are active. With neither active the
/// value moves `drift_delta` toward `ambient` and snaps to it once within one
/// delta. The result is not clamped.
pub fn step(
    last_value: f64,
    heat: &ActuatorSnapshot,
    cool: &ActuatorSnapshot,
    rates: &NormalizedRates,
    ambient: f64,
) -> f64 {
    if heat.active {
        last_value + rates.heat_delta * heat.power
    } else if cool.active {
        last_value - rates.cool_delta * cool.power
    } else {
        let diff = ambient - last_value;
        if diff.abs() <= rates.drift_delta {
            ambient
        } else {
            last_value + rates.drift_delta.copysign(diff)
        }
    }
}

/// Mutable state of one running thermal sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalRunState {
    pub last_value: f64,
}

/// Thermal model of one sensor, built once at start.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalModel {
    pub rates: NormalizedRates,
    pub ambient: f64,
    pub clamp: ClampPolicy,
    pub power_model: ActuatorPowerModel,
}

impl ThermalModel {
    pub fn new(rates: NormalizedRates, ambient: f64, clamp: ClampPolicy, power_model: ActuatorPowerModel) -> Self {
        Self {
            rates,
            ambient,
            clamp,
            power_model,
        }
    }

    pub fn from_config(config: &SimulationConfig, unit: TemperatureUnit) -> Self {
        Self::new(
            NormalizedRates::from_config(config),
            config.ambient,
            ClampPolicy::resolve(config.clamp, config.min, config.max, unit),
            config.power_model,
        )
    }

    /// Initial run state, clamped like every later value.
    pub fn initial_state(&self, start_value: f64) -> ThermalRunState {
        ThermalRunState {
            last_value: self.clamp.apply(start_value),
        }
    }

    /// Unclamped next value for the given actuator states.
    pub fn step(&self, last_value: f64, heat: Option<ActuatorState>, cool: Option<ActuatorState>) -> f64 {
        step(
            last_value,
            &self.power_model.snapshot(heat),
            &self.power_model.snapshot(cool),
            &self.rates,
            self.ambient,
        )
    }

    /// One tick: step, clamp and store as the new `last_value`.
    pub fn advance(&self, state: &mut ThermalRunState, heat: Option<ActuatorState>, cool: Option<ActuatorState>) -> f64 {
        let next = self.clamp.apply(self.step(state.last_value, heat, cool));
        state.last_value = next;
        next
    }
}
