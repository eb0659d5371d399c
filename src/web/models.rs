//! Contains the data models for API requests and responses.

use serde::{Deserialize, Serialize};

use crate::actuator::registry::ActuatorRecord;
use crate::manager::SensorStatus;
use crate::simulation::output::Reading;

/// Status of one sensor together with its most recent reading.
#[derive(Debug, Serialize, Deserialize)]
pub struct SensorStatusResponse {
    pub name: String,
    pub kind: String,
    pub unit: String,
    pub state: String,
    pub sample_period_secs: f64,
    pub last_reading: Option<Reading>,
}

impl SensorStatusResponse {
    pub fn new(status: SensorStatus, last_reading: Option<Reading>) -> Self {
        Self {
            name: status.name,
            kind: status.kind.as_str().to_string(),
            unit: status.unit.to_string(),
            state: status.state.as_str().to_string(),
            sample_period_secs: status.sample_period_secs,
            last_reading,
        }
    }
}

/// One actuator as stored in the registry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActuatorResponse {
    pub id: u32,
    pub name: String,
    pub active: bool,
    pub power: Option<f64>,
}

impl From<ActuatorRecord> for ActuatorResponse {
    fn from(record: ActuatorRecord) -> Self {
        Self {
            id: record.id.0,
            name: record.name,
            active: record.state.active,
            power: record.state.power,
        }
    }
}

/// Represents a request to change an actuator's state.
#[derive(Debug, Deserialize, Serialize)]
pub struct ActuatorUpdateRequest {
    pub active: bool,
    #[serde(default)]
    pub power: Option<f64>,
}
