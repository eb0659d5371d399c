// src/lib.rs - Simulated process-variable sensors for exercising control loops
pub mod actuator;
pub mod config;
pub mod manager;
pub mod scheduler;
pub mod simulation;
pub mod sink;
pub mod unit;
pub mod web;

pub use actuator::{ActuatorId, ActuatorRegistry, ActuatorSnapshotReader, ActuatorState, InMemoryActuatorRegistry};
pub use config::{Config, ConfigError, SensorConfig, SensorKind};
pub use manager::{ManagerError, SensorManager, SensorStatus};
pub use scheduler::{Lifecycle, LifecycleError, LifecycleState, RunSummary, SamplingScheduler};
pub use simulation::output::{OutputFormat, Reading, ReadingValue};
pub use sink::{ChannelSink, ReadingSink, ReadingStore};
pub use unit::TemperatureUnit;
