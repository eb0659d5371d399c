// src/manager.rs - Spawns and stops the configured sensors
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::actuator::{ActuatorRegistry, ActuatorSnapshotReader};
use crate::config::{Config, SensorConfig, SensorKind, SimulationSettings};
use crate::scheduler::{
    Lifecycle, LifecycleError, LifecycleState, RunSummary, SampleSource, SamplingScheduler, ThermalSource,
    WaveformSource,
};
use crate::simulation::properties::{SimulationConfig, WaveformConfig, DEFAULT_SAMPLE_PERIOD};
use crate::sink::ReadingSink;
use crate::unit::TemperatureUnit;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("Sensor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Public view of one sensor.
#[derive(Debug, Clone, Serialize)]
pub struct SensorStatus {
    pub name: String,
    pub kind: SensorKind,
    pub unit: &'static str,
    pub state: LifecycleState,
    pub sample_period_secs: f64,
}

struct SensorEntry {
    name: String,
    kind: SensorKind,
    sample_period: f64,
    lifecycle: Lifecycle,
}

/// A sensor ready to be spawned.
pub struct BuiltSensor {
    pub name: String,
    pub kind: SensorKind,
    pub sample_period: f64,
    pub scheduler: SamplingScheduler<Box<dyn SampleSource>>,
}

const DEFAULT_REGISTRY_POLL: Duration = Duration::from_secs(2);

fn duration_or(secs: f64, default: Duration, key: &str) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => duration,
        _ => {
            tracing::warn!("{} = {} is not a usable duration, using {:?}", key, secs, default);
            default
        }
    }
}

/// Builds the scheduler for one configured sensor. Never fails: unreadable
/// properties were already resolved to defaults.
pub fn build_sensor(
    config: &SensorConfig,
    settings: &SimulationSettings,
    registry: Arc<dyn ActuatorRegistry>,
    sink: Arc<dyn ReadingSink>,
) -> BuiltSensor {
    let unit = TemperatureUnit::from_param(&settings.unit);
    let (source, sample_period, output) = match config.kind {
        SensorKind::Thermal => {
            let sim = SimulationConfig::from_properties(config);
            let reader = ActuatorSnapshotReader::new(registry);
            let poll = duration_or(settings.registry_poll_secs, DEFAULT_REGISTRY_POLL, "registry_poll_secs");
            let source = ThermalSource::new(&sim, unit, reader, poll);
            (Box::new(source) as Box<dyn SampleSource>, sim.sample_period, sim.output.unwrap_or(settings.output))
        }
        SensorKind::Sine => {
            let wave = WaveformConfig::from_properties(config);
            let output = config.output.unwrap_or(settings.output);
            (Box::new(WaveformSource::new(wave)) as Box<dyn SampleSource>, wave.sample_period, output)
        }
    };
    let scheduler = SamplingScheduler::new(
        config.name.clone(),
        source,
        sink,
        Lifecycle::new(),
        duration_or(sample_period, Duration::from_secs_f64(DEFAULT_SAMPLE_PERIOD), "sample_period"),
        output,
    );
    BuiltSensor {
        name: config.name.clone(),
        kind: config.kind,
        sample_period,
        scheduler,
    }
}

/// Owns one sampling task per configured sensor.
pub struct SensorManager {
    unit: TemperatureUnit,
    sensors: Vec<SensorEntry>,
    tasks: Mutex<Vec<(String, JoinHandle<Result<RunSummary, LifecycleError>>)>>,
}

impl SensorManager {
    /// Builds every sensor in `config` and spawns its loop on the current
    /// runtime.
    pub fn spawn(config: &Config, registry: Arc<dyn ActuatorRegistry>, sink: Arc<dyn ReadingSink>) -> Self {
        let mut sensors = Vec::with_capacity(config.sensors.len());
        let mut tasks = Vec::with_capacity(config.sensors.len());
        for sensor in &config.sensors {
            let built = build_sensor(sensor, &config.simulation, registry.clone(), sink.clone());
            tracing::info!(
                "Spawning {} sensor '{}' ({}s period)",
                built.kind.as_str(),
                built.name,
                built.sample_period
            );
            sensors.push(SensorEntry {
                name: built.name.clone(),
                kind: built.kind,
                sample_period: built.sample_period,
                lifecycle: built.scheduler.lifecycle().clone(),
            });
            tasks.push((built.name, tokio::spawn(built.scheduler.run())));
        }
        Self {
            unit: TemperatureUnit::from_param(&config.simulation.unit),
            sensors,
            tasks: Mutex::new(tasks),
        }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    fn entry(&self, name: &str) -> Result<&SensorEntry, ManagerError> {
        self.sensors
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ManagerError::UnknownSensor(name.to_string()))
    }

    fn status_of(&self, entry: &SensorEntry) -> SensorStatus {
        SensorStatus {
            name: entry.name.clone(),
            kind: entry.kind,
            unit: self.unit.label(),
            state: entry.lifecycle.state(),
            sample_period_secs: entry.sample_period,
        }
    }

    pub fn status(&self, name: &str) -> Result<SensorStatus, ManagerError> {
        self.entry(name).map(|entry| self.status_of(entry))
    }

    pub fn statuses(&self) -> Vec<SensorStatus> {
        self.sensors.iter().map(|entry| self.status_of(entry)).collect()
    }

    /// Requests a stop. The sensor emits nothing further once its loop has
    /// observed the request.
    pub fn stop(&self, name: &str) -> Result<SensorStatus, ManagerError> {
        let entry = self.entry(name)?;
        if entry.lifecycle.request_stop() {
            tracing::info!("Stop requested for sensor '{}'", name);
        }
        Ok(self.status_of(entry))
    }

    /// Stops every sensor and waits for all loops to finish.
    pub async fn shutdown(&self) -> Vec<(String, Result<RunSummary, ManagerError>)> {
        for entry in &self.sensors {
            entry.lifecycle.request_stop();
        }
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        let (names, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let results = join_all(handles).await;
        names
            .into_iter()
            .zip(results)
            .map(|(name, joined)| {
                let result = match joined {
                    Ok(run) => run.map_err(ManagerError::from),
                    Err(e) => Err(ManagerError::from(e)),
                };
                (name, result)
            })
            .collect()
    }
}
