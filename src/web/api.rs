//! Defines the Axum API routes and handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

use crate::actuator::{ActuatorId, ActuatorState, InMemoryActuatorRegistry, RegistryError};
use crate::manager::{ManagerError, SensorManager, SensorStatus};
use crate::sink::ReadingStore;
use crate::web::models::{ActuatorResponse, ActuatorUpdateRequest, SensorStatusResponse};

pub struct AppStateInner {
    pub manager: Arc<SensorManager>,
    pub registry: InMemoryActuatorRegistry,
    pub store: ReadingStore,
}
pub type AppState = Arc<AppStateInner>;

/// Helper to create a JSON error response with a message and status code
fn json_error(message: &str, status: StatusCode) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn manager_error(e: ManagerError) -> axum::response::Response {
    match e {
        ManagerError::UnknownSensor(_) => json_error(&e.to_string(), StatusCode::NOT_FOUND),
        _ => json_error(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
    }
}

fn registry_unavailable(e: RegistryError) -> axum::response::Response {
    json_error(&e.to_string(), StatusCode::SERVICE_UNAVAILABLE)
}

/// Creates the Axum router with all the API endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/sensors", get(list_sensors))
        .route("/api/v1/sensors/{name}", get(get_sensor))
        .route("/api/v1/sensors/{name}/stop", post(stop_sensor))
        .route("/api/v1/actuators", get(list_actuators))
        .route("/api/v1/actuators/{id}", put(update_actuator))
        .with_state(state)
}

async fn with_reading(state: &AppStateInner, status: SensorStatus) -> SensorStatusResponse {
    let last = state.store.latest(&status.name).await;
    SensorStatusResponse::new(status, last)
}

/// Handler listing every sensor with its last reading.
async fn list_sensors(State(state): State<AppState>) -> axum::response::Response {
    let mut sensors = Vec::new();
    for status in state.manager.statuses() {
        sensors.push(with_reading(&state, status).await);
    }
    (StatusCode::OK, Json(sensors)).into_response()
}

/// Handler to get the current status of one sensor.
async fn get_sensor(State(state): State<AppState>, Path(name): Path<String>) -> axum::response::Response {
    match state.manager.status(&name) {
        Ok(status) => (StatusCode::OK, Json(with_reading(&state, status).await)).into_response(),
        Err(e) => manager_error(e),
    }
}

/// Handler requesting a sensor to stop sampling.
async fn stop_sensor(State(state): State<AppState>, Path(name): Path<String>) -> axum::response::Response {
    match state.manager.stop(&name) {
        Ok(status) => (StatusCode::OK, Json(with_reading(&state, status).await)).into_response(),
        Err(e) => manager_error(e),
    }
}

async fn list_actuators(State(state): State<AppState>) -> axum::response::Response {
    match state.registry.list().await {
        Ok(records) => {
            let actuators: Vec<ActuatorResponse> = records.into_iter().map(ActuatorResponse::from).collect();
            (StatusCode::OK, Json(actuators)).into_response()
        }
        Err(e) => registry_unavailable(e),
    }
}

/// Handler switching an actuator on or off.
async fn update_actuator(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(payload): Json<ActuatorUpdateRequest>,
) -> axum::response::Response {
    if let Some(power) = payload.power {
        if !(0.0..=1.0).contains(&power) {
            return json_error("power must be between 0 and 1", StatusCode::BAD_REQUEST);
        }
    }
    let new_state = ActuatorState {
        active: payload.active,
        power: payload.power,
    };
    match state.registry.set_state(ActuatorId(id), new_state).await {
        Ok(Some(record)) => (StatusCode::OK, Json(ActuatorResponse::from(record))).into_response(),
        Ok(None) => json_error("Actuator not found", StatusCode::NOT_FOUND),
        Err(e) => registry_unavailable(e),
    }
}
