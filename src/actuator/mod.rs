// src/actuator/mod.rs - Actuator registry capability and snapshot reader
pub mod registry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use registry::InMemoryActuatorRegistry;

/// Identifier of an actuator in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActuatorId(pub u32);

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State an actuator reports to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActuatorState {
    pub active: bool,
    /// Power fraction for actuators that support proportional output.
    #[serde(default)]
    pub power: Option<f64>,
}

impl ActuatorState {
    pub fn on() -> Self {
        Self { active: true, power: None }
    }

    pub fn off() -> Self {
        Self { active: false, power: None }
    }

    pub fn with_power(active: bool, power: f64) -> Self {
        Self { active, power: Some(power) }
    }

    /// Power fraction in [0, 1]; 1.0 when the actuator has no proportional power.
    pub fn power_fraction(&self) -> f64 {
        match self.power {
            Some(p) if p.is_finite() => p.clamp(0.0, 1.0),
            Some(_) => 0.0,
            None => 1.0,
        }
    }
}

/// Per-tick view of one actuator as seen by the thermal state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorSnapshot {
    pub active: bool,
    pub power: f64,
}

impl ActuatorSnapshot {
    pub const INACTIVE: ActuatorSnapshot = ActuatorSnapshot { active: false, power: 0.0 };

    pub fn new(active: bool, power: f64) -> Self {
        Self { active, power }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("actuator registry is not available yet")]
    Unavailable,
}

/// Read access to the externally owned actuator registry.
#[async_trait]
pub trait ActuatorRegistry: Send + Sync {
    /// Whether the registry has been populated.
    async fn is_available(&self) -> bool;
    /// State of one actuator; `Ok(None)` when no such actuator exists.
    async fn lookup(&self, id: ActuatorId) -> Result<Option<ActuatorState>, RegistryError>;
}

/// Looks up actuator state for a sensor, folding every failure into "absent".
#[derive(Clone)]
pub struct ActuatorSnapshotReader {
    registry: Arc<dyn ActuatorRegistry>,
}

impl ActuatorSnapshotReader {
    pub fn new(registry: Arc<dyn ActuatorRegistry>) -> Self {
        Self { registry }
    }

    pub async fn is_available(&self) -> bool {
        self.registry.is_available().await
    }

    pub async fn read(&self, id: Option<ActuatorId>) -> Option<ActuatorState> {
        let id = id?;
        match self.registry.lookup(id).await {
            Ok(Some(state)) => Some(state),
            Ok(None) => {
                tracing::trace!("Actuator {} not found, treating as inactive", id);
                None
            }
            Err(e) => {
                tracing::debug!("Actuator {} lookup failed: {}", id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_fraction_defaults_and_bounds() {
        assert_eq!(ActuatorState::on().power_fraction(), 1.0);
        assert_eq!(ActuatorState::with_power(true, 0.25).power_fraction(), 0.25);
        assert_eq!(ActuatorState::with_power(true, 1.7).power_fraction(), 1.0);
        assert_eq!(ActuatorState::with_power(true, -0.3).power_fraction(), 0.0);
        assert_eq!(ActuatorState::with_power(true, f64::NAN).power_fraction(), 0.0);
    }

    #[tokio::test]
    async fn test_reader_unconfigured_reference() {
        let registry = Arc::new(InMemoryActuatorRegistry::with_actuators([(ActuatorId(1), ActuatorState::on())]));
        let reader = ActuatorSnapshotReader::new(registry);
        assert_eq!(reader.read(None).await, None);
    }

    #[tokio::test]
    async fn test_reader_found_and_missing() {
        let registry = Arc::new(InMemoryActuatorRegistry::with_actuators([(ActuatorId(1), ActuatorState::on())]));
        let reader = ActuatorSnapshotReader::new(registry);
        assert_eq!(reader.read(Some(ActuatorId(1))).await, Some(ActuatorState::on()));
        assert_eq!(reader.read(Some(ActuatorId(9))).await, None);
    }

    #[tokio::test]
    async fn test_reader_unavailable_registry_is_absent() {
        let registry = Arc::new(InMemoryActuatorRegistry::new());
        let reader = ActuatorSnapshotReader::new(registry);
        assert!(!reader.is_available().await);
        assert_eq!(reader.read(Some(ActuatorId(1))).await, None);
    }
}
