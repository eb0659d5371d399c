//! # Simulator Configuration
//!
//! The service reads a single TOML file describing the actuators that seed the
//! in-memory registry and the simulated sensors to run.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [simulation]
//! unit = "C"
//! output = "number"
//!
//! [[actuators]]
//! id = 1
//! name = "kettle heater"
//!
//! [[sensors]]
//! name = "kettle"
//! kind = "thermal"
//! heat_rate = 10
//! heater = 1
//! drift_rate = 2
//! ambient = 65
//! sample_period = 5
//!
//! [[sensors]]
//! name = "sine"
//! kind = "sine"
//! min = 0
//! max = 100
//! period = 600
//! ```
//!
//! Sensor properties are kept as [`RawValue`]s. A property that is present but
//! cannot be read as a number is not a configuration error: it is resolved to
//! an inert default when the sensor is built (see `simulation::properties`).

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::simulation::clamp::ClampMode;
use crate::simulation::output::OutputFormat;
use crate::simulation::thermal::ActuatorPowerModel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct: HTTP server, global simulation settings,
/// registry seed and sensors.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub actuators: Vec<ActuatorConfig>,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: default_server_enabled(),
            bind: default_bind(),
        }
    }
}

/// Settings shared by every sensor of the process.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Unit parameter, "C" or "F". Purely informational.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Interval between registry availability checks while a thermal sensor
    /// waits for the actuator registry.
    #[serde(default = "default_registry_poll_secs")]
    pub registry_poll_secs: f64,
    /// Delay before the in-memory registry is populated from `[[actuators]]`.
    #[serde(default)]
    pub registry_delay_secs: f64,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            registry_poll_secs: default_registry_poll_secs(),
            registry_delay_secs: 0.0,
            output: OutputFormat::default(),
        }
    }
}

/// One actuator entry seeded into the in-memory registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActuatorConfig {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub power: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Thermal,
    Sine,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Thermal => "thermal",
            SensorKind::Sine => "sine",
        }
    }
}

/// A property value exactly as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Numeric reading of the value, `None` if it is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawValue::Integer(i) => *i as f64,
            RawValue::Float(f) => *f,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Reads the value as a non-negative integral identifier.
    pub fn as_id(&self) -> Option<u32> {
        match self {
            RawValue::Integer(i) => u32::try_from(*i).ok(),
            RawValue::Float(_) => None,
            RawValue::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }
}

/// One simulated sensor. Only `name` and `kind` are structural; everything
/// else degrades to a default when missing or unreadable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorConfig {
    pub name: String,
    pub kind: SensorKind,
    #[serde(default)]
    pub heat_rate: Option<RawValue>,
    #[serde(default)]
    pub heater: Option<RawValue>,
    #[serde(default)]
    pub cool_rate: Option<RawValue>,
    #[serde(default)]
    pub cooler: Option<RawValue>,
    #[serde(default)]
    pub drift_rate: Option<RawValue>,
    #[serde(default)]
    pub ambient: Option<RawValue>,
    #[serde(default)]
    pub start_value: Option<RawValue>,
    #[serde(default)]
    pub min: Option<RawValue>,
    #[serde(default)]
    pub max: Option<RawValue>,
    /// Full waveform period in seconds (sine sensors).
    #[serde(default)]
    pub period: Option<RawValue>,
    /// Seconds between readings.
    #[serde(default)]
    pub sample_period: Option<RawValue>,
    #[serde(default)]
    pub clamp: Option<ClampMode>,
    #[serde(default)]
    pub power_model: Option<ActuatorPowerModel>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

impl SensorConfig {
    /// A sensor of the given kind with every property left at its default.
    pub fn new(name: impl Into<String>, kind: SensorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            heat_rate: None,
            heater: None,
            cool_rate: None,
            cooler: None,
            drift_rate: None,
            ambient: None,
            start_value: None,
            min: None,
            max: None,
            period: None,
            sample_period: None,
            clamp: None,
            power_model: None,
            output: None,
        }
    }
}

impl Config {
    /// Checks the structural parts of the file. Numeric sensor properties are
    /// deliberately not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let poll = self.simulation.registry_poll_secs;
        if !(poll > 0.0 && Duration::try_from_secs_f64(poll).is_ok()) {
            return Err(ConfigError::Invalid("registry_poll_secs must be a positive duration".to_string()));
        }
        if Duration::try_from_secs_f64(self.simulation.registry_delay_secs).is_err() {
            return Err(ConfigError::Invalid("registry_delay_secs must be a non-negative duration".to_string()));
        }
        let mut names = HashSet::new();
        for sensor in &self.sensors {
            if sensor.name.trim().is_empty() {
                return Err(ConfigError::Invalid("sensor name cannot be empty".to_string()));
            }
            if !names.insert(sensor.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate sensor name '{}'", sensor.name)));
            }
        }
        let mut ids = HashSet::new();
        for actuator in &self.actuators {
            if !ids.insert(actuator.id) {
                return Err(ConfigError::Invalid(format!("duplicate actuator id {}", actuator.id)));
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_server_enabled() -> bool { true }
fn default_bind() -> String { "0.0.0.0:3000".to_string() }
fn default_unit() -> String { "C".to_string() }
fn default_registry_poll_secs() -> f64 { 2.0 }

/// Parse and validate configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config '{}': {}", path, e);
                Err(e)
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert!(config.server.enabled);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.simulation.unit, "C");
        assert_eq!(config.simulation.registry_poll_secs, 2.0);
        assert_eq!(config.simulation.output, OutputFormat::Number);
        assert!(config.sensors.is_empty());
    }

    #[test]
    fn test_load_config_success() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("sim.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            "[simulation]\nunit = 'F'\n\n[[sensors]]\nname = 'mash'\nkind = 'thermal'\nheat_rate = 10\nheater = '3'"
        )
        .unwrap();
        file.flush().unwrap();
        let config = load_config(file_path.to_str().unwrap()).unwrap();
        assert_eq!(config.simulation.unit, "F");
        assert_eq!(config.sensors.len(), 1);
        assert_eq!(config.sensors[0].kind, SensorKind::Thermal);
        assert_eq!(config.sensors[0].heat_rate, Some(RawValue::Integer(10)));
        assert_eq!(config.sensors[0].heater, Some(RawValue::Text("3".to_string())));
        // Defaults for missing fields
        assert_eq!(config.simulation.registry_poll_secs, 2.0);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent_file.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "not a valid toml").unwrap();
        file.flush().unwrap();
        let result = load_config(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unparseable_property_is_not_a_config_error() {
        let toml = r#"
        [[sensors]]
        name = "kettle"
        kind = "thermal"
        heat_rate = "fast"
        drift_rate = 2.5
        "#;
        let config = parse_config(toml).unwrap();
        let sensor = &config.sensors[0];
        assert_eq!(sensor.heat_rate, Some(RawValue::Text("fast".to_string())));
        assert_eq!(sensor.heat_rate.as_ref().unwrap().as_f64(), None);
        assert_eq!(sensor.drift_rate.as_ref().unwrap().as_f64(), Some(2.5));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let toml = r#"
        [[sensors]]
        name = "x"
        kind = "square"
        "#;
        assert!(matches!(parse_config(toml), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_duplicate_sensor_names_rejected() {
        let toml = r#"
        [[sensors]]
        name = "a"
        kind = "sine"

        [[sensors]]
        name = "a"
        kind = "thermal"
        "#;
        assert!(matches!(parse_config(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_actuator_ids_rejected() {
        let toml = r#"
        [[actuators]]
        id = 1

        [[actuators]]
        id = 1
        "#;
        assert!(matches!(parse_config(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unrepresentable_registry_timings_rejected() {
        let poll = "[simulation]\nregistry_poll_secs = 1e20\n";
        assert!(matches!(parse_config(poll), Err(ConfigError::Invalid(_))));
        let delay = "[simulation]\nregistry_delay_secs = 1e20\n";
        assert!(matches!(parse_config(delay), Err(ConfigError::Invalid(_))));
        let negative = "[simulation]\nregistry_delay_secs = -1.0\n";
        assert!(matches!(parse_config(negative), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_raw_value_conversions() {
        assert_eq!(RawValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(RawValue::Text(" 1.5 ".to_string()).as_f64(), Some(1.5));
        assert_eq!(RawValue::Text("nan".to_string()).as_f64(), None);
        assert_eq!(RawValue::Integer(4).as_id(), Some(4));
        assert_eq!(RawValue::Integer(-1).as_id(), None);
        assert_eq!(RawValue::Float(2.0).as_id(), None);
        assert_eq!(RawValue::Text("12".to_string()).as_id(), Some(12));
    }

    #[test]
    fn test_sensor_options_parsing() {
        let toml = r#"
        [[sensors]]
        name = "fermenter"
        kind = "thermal"
        clamp = "bounded"
        power_model = "proportional"
        output = "string"
        "#;
        let config = parse_config(toml).unwrap();
        let sensor = &config.sensors[0];
        assert_eq!(sensor.clamp, Some(ClampMode::Bounded));
        assert_eq!(sensor.power_model, Some(ActuatorPowerModel::Proportional));
        assert_eq!(sensor.output, Some(OutputFormat::String));
    }
}
