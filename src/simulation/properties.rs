//! Typed sensor configuration resolved from raw file properties.
//!
//! Resolution never fails. A property missing from the file takes its
//! documented default; a property that is present but unreadable makes the
//! affected axis inert (delta 0, actuator none) and is reported with a warning.

use std::time::Duration;

use crate::actuator::ActuatorId;
use crate::config::{RawValue, SensorConfig};
use crate::simulation::clamp::ClampMode;
use crate::simulation::output::OutputFormat;
use crate::simulation::thermal::ActuatorPowerModel;

pub const DEFAULT_HEAT_RATE: f64 = 10.0;
pub const DEFAULT_COOL_RATE: f64 = 10.0;
pub const DEFAULT_DRIFT_RATE: f64 = 2.0;
pub const DEFAULT_AMBIENT: f64 = 65.0;
pub const DEFAULT_SAMPLE_PERIOD: f64 = 5.0;
pub const DEFAULT_WAVE_MIN: f64 = 0.0;
pub const DEFAULT_WAVE_MAX: f64 = 100.0;
pub const DEFAULT_WAVE_PERIOD: f64 = 600.0;

/// Thermal sensor configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Units per minute while the heater is on.
    pub heat_rate: f64,
    /// Units per minute while the cooler is on.
    pub cool_rate: f64,
    /// Units per minute toward `ambient` while idle.
    pub drift_rate: f64,
    pub ambient: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Seconds between readings, always > 0.
    pub sample_period: f64,
    pub heat_actuator: Option<ActuatorId>,
    pub cool_actuator: Option<ActuatorId>,
    pub start_value: Option<f64>,
    pub clamp: Option<ClampMode>,
    pub power_model: ActuatorPowerModel,
    pub output: Option<OutputFormat>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            heat_rate: 0.0,
            cool_rate: 0.0,
            drift_rate: DEFAULT_DRIFT_RATE,
            ambient: DEFAULT_AMBIENT,
            min: None,
            max: None,
            sample_period: DEFAULT_SAMPLE_PERIOD,
            heat_actuator: None,
            cool_actuator: None,
            start_value: None,
            clamp: None,
            power_model: ActuatorPowerModel::default(),
            output: None,
        }
    }
}

/// Waveform sensor configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformConfig {
    pub min: f64,
    pub max: f64,
    /// Seconds per full cycle, always > 0.
    pub period: f64,
    pub sample_period: f64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_WAVE_MIN,
            max: DEFAULT_WAVE_MAX,
            period: DEFAULT_WAVE_PERIOD,
            sample_period: DEFAULT_SAMPLE_PERIOD,
        }
    }
}

impl WaveformConfig {
    pub fn amplitude(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn midpoint(&self) -> f64 {
        self.min + self.amplitude()
    }
}

/// Present-and-readable number, or the default when the property is absent.
/// `None` means the property was present but unreadable.
fn number_or_default(sensor: &str, key: &str, raw: Option<&RawValue>, default: f64) -> Option<f64> {
    match raw {
        None => Some(default),
        Some(value) => {
            let parsed = value.as_f64();
            if parsed.is_none() {
                tracing::warn!("Sensor '{}': property '{}' = {:?} is not a number", sensor, key, value);
            }
            parsed
        }
    }
}

fn optional_number(sensor: &str, key: &str, raw: Option<&RawValue>) -> Option<f64> {
    let value = raw?;
    let parsed = value.as_f64();
    if parsed.is_none() {
        tracing::warn!("Sensor '{}': property '{}' = {:?} is not a number, ignoring", sensor, key, value);
    }
    parsed
}

fn non_negative_rate(sensor: &str, key: &str, raw: Option<&RawValue>, default: f64) -> Option<f64> {
    number_or_default(sensor, key, raw, default).filter(|rate| {
        let ok = *rate >= 0.0;
        if !ok {
            tracing::warn!("Sensor '{}': property '{}' must not be negative", sensor, key);
        }
        ok
    })
}

fn actuator_ref(sensor: &str, key: &str, raw: Option<&RawValue>) -> Option<ActuatorId> {
    let value = raw?;
    let id = value.as_id().map(ActuatorId);
    if id.is_none() {
        tracing::warn!("Sensor '{}': property '{}' = {:?} is not an actuator id", sensor, key, value);
    }
    id
}

fn positive_period(sensor: &str, key: &str, raw: Option<&RawValue>, default: f64) -> f64 {
    match number_or_default(sensor, key, raw, default) {
        Some(period) if period > 0.0 && Duration::try_from_secs_f64(period).is_ok() => period,
        _ => {
            tracing::warn!("Sensor '{}': using default {} = {}", sensor, key, default);
            default
        }
    }
}

/// One actuator axis is live only when both its rate and actuator resolve.
fn actuator_axis(
    sensor: &str,
    rate_key: &str,
    rate: Option<&RawValue>,
    default_rate: f64,
    actuator_key: &str,
    actuator: Option<&RawValue>,
) -> (f64, Option<ActuatorId>) {
    let rate = non_negative_rate(sensor, rate_key, rate, default_rate);
    let id = actuator_ref(sensor, actuator_key, actuator);
    match (rate, id) {
        (Some(rate), Some(id)) => (rate, Some(id)),
        _ => {
            tracing::debug!("Sensor '{}': '{}' axis inactive", sensor, actuator_key);
            (0.0, None)
        }
    }
}

impl SimulationConfig {
    pub fn from_properties(props: &SensorConfig) -> Self {
        let name = props.name.as_str();
        let sample_period = positive_period(name, "sample_period", props.sample_period.as_ref(), DEFAULT_SAMPLE_PERIOD);

        let (heat_rate, heat_actuator) = actuator_axis(
            name,
            "heat_rate",
            props.heat_rate.as_ref(),
            DEFAULT_HEAT_RATE,
            "heater",
            props.heater.as_ref(),
        );
        let (cool_rate, cool_actuator) = actuator_axis(
            name,
            "cool_rate",
            props.cool_rate.as_ref(),
            DEFAULT_COOL_RATE,
            "cooler",
            props.cooler.as_ref(),
        );

        let drift = non_negative_rate(name, "drift_rate", props.drift_rate.as_ref(), DEFAULT_DRIFT_RATE);
        let ambient = number_or_default(name, "ambient", props.ambient.as_ref(), DEFAULT_AMBIENT);
        let (drift_rate, ambient) = match (drift, ambient) {
            (Some(drift), Some(ambient)) => (drift, ambient),
            _ => {
                tracing::warn!("Sensor '{}': drift disabled, ambient set to 0", name);
                (0.0, 0.0)
            }
        };

        Self {
            heat_rate,
            cool_rate,
            drift_rate,
            ambient,
            min: optional_number(name, "min", props.min.as_ref()),
            max: optional_number(name, "max", props.max.as_ref()),
            sample_period,
            heat_actuator,
            cool_actuator,
            start_value: optional_number(name, "start_value", props.start_value.as_ref()),
            clamp: props.clamp,
            power_model: props.power_model.unwrap_or_default(),
            output: props.output,
        }
    }

    /// Value the run state starts from.
    pub fn initial_value(&self) -> f64 {
        self.start_value.unwrap_or(self.ambient)
    }
}

impl WaveformConfig {
    pub fn from_properties(props: &SensorConfig) -> Self {
        let name = props.name.as_str();
        let min = number_or_default(name, "min", props.min.as_ref(), DEFAULT_WAVE_MIN).unwrap_or(DEFAULT_WAVE_MIN);
        let max = number_or_default(name, "max", props.max.as_ref(), DEFAULT_WAVE_MAX).unwrap_or(DEFAULT_WAVE_MAX);
        let (min, max) = if min > max {
            tracing::warn!("Sensor '{}': min {} > max {}, swapping", name, min, max);
            (max, min)
        } else {
            (min, max)
        };
        Self {
            min,
            max,
            period: positive_period(name, "period", props.period.as_ref(), DEFAULT_WAVE_PERIOD),
            sample_period: positive_period(name, "sample_period", props.sample_period.as_ref(), DEFAULT_SAMPLE_PERIOD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorKind;

    fn thermal(name: &str) -> SensorConfig {
        SensorConfig::new(name, SensorKind::Thermal)
    }

    #[test]
    fn test_defaults_without_actuators() {
        let config = SimulationConfig::from_properties(&thermal("t"));
        assert_eq!(config.heat_rate, 0.0);
        assert_eq!(config.heat_actuator, None);
        assert_eq!(config.cool_rate, 0.0);
        assert_eq!(config.cool_actuator, None);
        assert_eq!(config.drift_rate, 2.0);
        assert_eq!(config.ambient, 65.0);
        assert_eq!(config.sample_period, 5.0);
        assert_eq!(config.initial_value(), 65.0);
    }

    #[test]
    fn test_heater_uses_default_rate() {
        let mut props = thermal("t");
        props.heater = Some(RawValue::Integer(1));
        let config = SimulationConfig::from_properties(&props);
        assert_eq!(config.heat_rate, 10.0);
        assert_eq!(config.heat_actuator, Some(ActuatorId(1)));
    }

    #[test]
    fn test_unparseable_rate_disables_axis() {
        let mut props = thermal("t");
        props.heater = Some(RawValue::Integer(1));
        props.heat_rate = Some(RawValue::Text("lots".to_string()));
        props.cooler = Some(RawValue::Integer(2));
        props.cool_rate = Some(RawValue::Integer(4));
        let config = SimulationConfig::from_properties(&props);
        assert_eq!(config.heat_rate, 0.0);
        assert_eq!(config.heat_actuator, None);
        assert_eq!(config.cool_rate, 4.0);
        assert_eq!(config.cool_actuator, Some(ActuatorId(2)));
    }

    #[test]
    fn test_unparseable_actuator_disables_axis() {
        let mut props = thermal("t");
        props.heat_rate = Some(RawValue::Integer(10));
        props.heater = Some(RawValue::Text("kettle".to_string()));
        let config = SimulationConfig::from_properties(&props);
        assert_eq!(config.heat_rate, 0.0);
        assert_eq!(config.heat_actuator, None);
    }

    #[test]
    fn test_negative_rate_disables_axis() {
        let mut props = thermal("t");
        props.cool_rate = Some(RawValue::Float(-3.0));
        props.cooler = Some(RawValue::Integer(2));
        let config = SimulationConfig::from_properties(&props);
        assert_eq!(config.cool_rate, 0.0);
        assert_eq!(config.cool_actuator, None);
    }

    #[test]
    fn test_bad_ambient_disables_drift() {
        let mut props = thermal("t");
        props.ambient = Some(RawValue::Text("warm".to_string()));
        let config = SimulationConfig::from_properties(&props);
        assert_eq!(config.drift_rate, 0.0);
        assert_eq!(config.ambient, 0.0);
    }

    #[test]
    fn test_bad_sample_period_falls_back() {
        let mut props = thermal("t");
        props.sample_period = Some(RawValue::Integer(0));
        assert_eq!(SimulationConfig::from_properties(&props).sample_period, 5.0);
        props.sample_period = Some(RawValue::Text("soon".to_string()));
        assert_eq!(SimulationConfig::from_properties(&props).sample_period, 5.0);
        props.sample_period = Some(RawValue::Float(0.5));
        assert_eq!(SimulationConfig::from_properties(&props).sample_period, 0.5);
    }

    #[test]
    fn test_unrepresentable_sample_period_falls_back() {
        let mut props = thermal("t");
        props.sample_period = Some(RawValue::Float(1e20));
        assert_eq!(SimulationConfig::from_properties(&props).sample_period, 5.0);

        let mut wave = SensorConfig::new("s", SensorKind::Sine);
        wave.sample_period = Some(RawValue::Float(1e20));
        wave.period = Some(RawValue::Float(1e20));
        let config = WaveformConfig::from_properties(&wave);
        assert_eq!(config.sample_period, 5.0);
        assert_eq!(config.period, 600.0);
    }

    #[test]
    fn test_start_value_and_bounds() {
        let mut props = thermal("t");
        props.start_value = Some(RawValue::Integer(20));
        props.min = Some(RawValue::Integer(10));
        props.max = Some(RawValue::Text("oops".to_string()));
        let config = SimulationConfig::from_properties(&props);
        assert_eq!(config.initial_value(), 20.0);
        assert_eq!(config.min, Some(10.0));
        assert_eq!(config.max, None);
    }

    #[test]
    fn test_waveform_defaults_and_derived() {
        let config = WaveformConfig::from_properties(&SensorConfig::new("s", SensorKind::Sine));
        assert_eq!(config, WaveformConfig::default());
        assert_eq!(config.amplitude(), 50.0);
        assert_eq!(config.midpoint(), 50.0);
    }

    #[test]
    fn test_waveform_degrades_and_swaps() {
        let mut props = SensorConfig::new("s", SensorKind::Sine);
        props.min = Some(RawValue::Integer(80));
        props.max = Some(RawValue::Integer(20));
        props.period = Some(RawValue::Integer(-5));
        let config = WaveformConfig::from_properties(&props);
        assert_eq!(config.min, 20.0);
        assert_eq!(config.max, 80.0);
        assert_eq!(config.period, 600.0);
        assert_eq!(config.midpoint(), 50.0);
    }
}
