// src/scheduler/source.rs - Models driven by the sampling loop
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

use crate::actuator::{ActuatorId, ActuatorSnapshotReader};
use crate::scheduler::lifecycle::Lifecycle;
use crate::simulation::properties::{SimulationConfig, WaveformConfig};
use crate::simulation::thermal::{ThermalModel, ThermalRunState};
use crate::simulation::waveform::WaveformGenerator;
use crate::unit::TemperatureUnit;

/// A model the scheduler samples once per tick.
#[async_trait]
pub trait SampleSource: Send {
    /// Runs once after the sensor starts, before the first tick. Returns
    /// false if the sensor was stopped while preparing.
    async fn prepare(&mut self, _lifecycle: &Lifecycle) -> bool {
        true
    }

    async fn sample(&mut self, now: Instant) -> f64;
}

#[async_trait]
impl SampleSource for Box<dyn SampleSource> {
    async fn prepare(&mut self, lifecycle: &Lifecycle) -> bool {
        (**self).prepare(lifecycle).await
    }

    async fn sample(&mut self, now: Instant) -> f64 {
        (**self).sample(now).await
    }
}

/// Actuator-driven thermal sensor.
pub struct ThermalSource {
    model: ThermalModel,
    reader: ActuatorSnapshotReader,
    heat_actuator: Option<ActuatorId>,
    cool_actuator: Option<ActuatorId>,
    state: ThermalRunState,
    registry_poll: Duration,
}

impl ThermalSource {
    pub fn new(config: &SimulationConfig, unit: TemperatureUnit, reader: ActuatorSnapshotReader, registry_poll: Duration) -> Self {
        let model = ThermalModel::from_config(config, unit);
        let state = model.initial_state(config.initial_value());
        Self {
            model,
            reader,
            heat_actuator: config.heat_actuator,
            cool_actuator: config.cool_actuator,
            state,
            registry_poll,
        }
    }

    pub fn last_value(&self) -> f64 {
        self.state.last_value
    }
}

#[async_trait]
impl SampleSource for ThermalSource {
    /// Polls until the actuator registry is available or the sensor stops.
    async fn prepare(&mut self, lifecycle: &Lifecycle) -> bool {
        let mut attempts: u32 = 0;
        loop {
            if !lifecycle.is_running() {
                return false;
            }
            if self.reader.is_available().await {
                if attempts > 0 {
                    tracing::info!("Actuator registry available after {} check(s)", attempts + 1);
                }
                return true;
            }
            attempts += 1;
            tracing::debug!("Actuator registry not available, retrying in {:?}", self.registry_poll);
            tokio::select! {
                biased;
                _ = lifecycle.stopped() => return false,
                _ = tokio::time::sleep(self.registry_poll) => {}
            }
        }
    }

    async fn sample(&mut self, _now: Instant) -> f64 {
        let heat = self.reader.read(self.heat_actuator).await;
        let cool = self.reader.read(self.cool_actuator).await;
        self.model.advance(&mut self.state, heat, cool)
    }
}

/// Sine waveform sensor. The origin is captured when the sensor starts.
pub struct WaveformSource {
    config: WaveformConfig,
    generator: Option<WaveformGenerator>,
}

impl WaveformSource {
    pub fn new(config: WaveformConfig) -> Self {
        Self { config, generator: None }
    }
}

#[async_trait]
impl SampleSource for WaveformSource {
    async fn prepare(&mut self, _lifecycle: &Lifecycle) -> bool {
        self.generator = Some(WaveformGenerator::new(&self.config, Instant::now()));
        true
    }

    async fn sample(&mut self, now: Instant) -> f64 {
        let config = &self.config;
        self.generator
            .get_or_insert_with(|| WaveformGenerator::new(config, now))
            .value_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::{ActuatorState, InMemoryActuatorRegistry};
    use std::sync::Arc;

    fn heated_config() -> SimulationConfig {
        SimulationConfig {
            heat_rate: 10.0,
            heat_actuator: Some(ActuatorId(1)),
            ..SimulationConfig::default()
        }
    }

    #[tokio::test]
    async fn test_thermal_source_feeds_back_last_value() {
        let registry = Arc::new(InMemoryActuatorRegistry::with_actuators([(ActuatorId(1), ActuatorState::on())]));
        let mut source = ThermalSource::new(
            &heated_config(),
            TemperatureUnit::Celsius,
            ActuatorSnapshotReader::new(registry),
            Duration::from_secs(2),
        );
        let first = source.sample(Instant::now()).await;
        let second = source.sample(Instant::now()).await;
        assert!((first - 65.833_333).abs() < 1e-5);
        assert!((second - 66.666_667).abs() < 1e-5);
        assert_eq!(source.last_value(), second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_thermal_prepare_stops_while_waiting() {
        let registry = Arc::new(InMemoryActuatorRegistry::new());
        let mut source = ThermalSource::new(
            &heated_config(),
            TemperatureUnit::Celsius,
            ActuatorSnapshotReader::new(registry),
            Duration::from_secs(2),
        );
        let lifecycle = Lifecycle::new();
        lifecycle.start().unwrap();
        let stopper = lifecycle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            stopper.request_stop();
        });
        assert!(!source.prepare(&lifecycle).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waveform_source_measures_from_start() {
        let mut source = WaveformSource::new(WaveformConfig::default());
        let lifecycle = Lifecycle::new();
        assert!(source.prepare(&lifecycle).await);
        let start = Instant::now();
        assert_eq!(source.sample(start).await, 50.0);
        let quarter = source.sample(start + Duration::from_secs(150)).await;
        assert!((quarter - 100.0).abs() < 1e-9);
    }
}
