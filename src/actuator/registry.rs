// src/actuator/registry.rs - In-memory actuator registry
//! Stand-in for the host's actuator registry. It starts unpopulated, like a
//! host that is still booting, until [`InMemoryActuatorRegistry::populate`] is
//! called. The HTTP API is the only writer.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ActuatorId, ActuatorRegistry, ActuatorState, RegistryError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActuatorRecord {
    pub id: ActuatorId,
    pub name: String,
    #[serde(flatten)]
    pub state: ActuatorState,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryActuatorRegistry {
    inner: Arc<RwLock<Option<BTreeMap<ActuatorId, ActuatorRecord>>>>,
}

impl InMemoryActuatorRegistry {
    /// Unpopulated registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populated registry with unnamed actuators.
    pub fn with_actuators(actuators: impl IntoIterator<Item = (ActuatorId, ActuatorState)>) -> Self {
        let records = actuators
            .into_iter()
            .map(|(id, state)| (id, ActuatorRecord { id, name: format!("actuator-{}", id), state }))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(Some(records))),
        }
    }

    /// Makes the registry available with the given actuators, replacing any
    /// previous content.
    pub async fn populate(&self, records: impl IntoIterator<Item = ActuatorRecord>) {
        let map: BTreeMap<_, _> = records.into_iter().map(|r| (r.id, r)).collect();
        tracing::info!("Actuator registry populated with {} actuator(s)", map.len());
        *self.inner.write().await = Some(map);
    }

    /// Updates an existing actuator. Returns the new record.
    pub async fn set_state(&self, id: ActuatorId, state: ActuatorState) -> Result<Option<ActuatorRecord>, RegistryError> {
        let mut guard = self.inner.write().await;
        let map = guard.as_mut().ok_or(RegistryError::Unavailable)?;
        Ok(map.get_mut(&id).map(|record| {
            record.state = state;
            tracing::info!("Actuator {} ({}) set to active={} power={:?}", id, record.name, state.active, state.power);
            record.clone()
        }))
    }

    pub async fn get(&self, id: ActuatorId) -> Result<Option<ActuatorRecord>, RegistryError> {
        let guard = self.inner.read().await;
        let map = guard.as_ref().ok_or(RegistryError::Unavailable)?;
        Ok(map.get(&id).cloned())
    }

    pub async fn list(&self) -> Result<Vec<ActuatorRecord>, RegistryError> {
        let guard = self.inner.read().await;
        let map = guard.as_ref().ok_or(RegistryError::Unavailable)?;
        Ok(map.values().cloned().collect())
    }
}

#[async_trait]
impl ActuatorRegistry for InMemoryActuatorRegistry {
    async fn is_available(&self) -> bool {
        self.inner.read().await.is_some()
    }

    async fn lookup(&self, id: ActuatorId) -> Result<Option<ActuatorState>, RegistryError> {
        Ok(self.get(id).await?.map(|record| record.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str) -> ActuatorRecord {
        ActuatorRecord { id: ActuatorId(id), name: name.to_string(), state: ActuatorState::off() }
    }

    #[tokio::test]
    async fn test_unpopulated_registry() {
        let registry = InMemoryActuatorRegistry::new();
        assert!(!registry.is_available().await);
        assert_eq!(registry.lookup(ActuatorId(1)).await, Err(RegistryError::Unavailable));
        assert_eq!(registry.set_state(ActuatorId(1), ActuatorState::on()).await, Err(RegistryError::Unavailable));
    }

    #[tokio::test]
    async fn test_populate_and_update() {
        let registry = InMemoryActuatorRegistry::new();
        registry.populate([record(1, "heater"), record(2, "chiller")]).await;
        assert!(registry.is_available().await);
        assert_eq!(registry.lookup(ActuatorId(1)).await, Ok(Some(ActuatorState::off())));

        let updated = registry
            .set_state(ActuatorId(2), ActuatorState::with_power(true, 0.5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "chiller");
        assert_eq!(registry.lookup(ActuatorId(2)).await, Ok(Some(ActuatorState::with_power(true, 0.5))));
    }

    #[tokio::test]
    async fn test_missing_actuator() {
        let registry = InMemoryActuatorRegistry::with_actuators([(ActuatorId(1), ActuatorState::on())]);
        assert_eq!(registry.lookup(ActuatorId(3)).await, Ok(None));
        assert_eq!(registry.set_state(ActuatorId(3), ActuatorState::on()).await, Ok(None));
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let registry = InMemoryActuatorRegistry::new();
        let other = registry.clone();
        registry.populate([record(5, "pump")]).await;
        assert!(other.is_available().await);
    }
}
