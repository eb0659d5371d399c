//! Simulation models: rate normalization, the actuator-driven thermal state
//! machine, boundary clamping and the sine waveform generator.
//!
//! Everything in here is pure and reentrant. Time, actuator lookups and
//! delivery of readings live in `scheduler`, `actuator` and `sink`.

pub mod clamp;
pub mod output;
pub mod properties;
pub mod rates;
pub mod thermal;
pub mod waveform;

pub use clamp::{clamp, ClampMode, ClampPolicy};
pub use output::{round2, OutputFormat, Reading, ReadingValue};
pub use properties::{SimulationConfig, WaveformConfig};
pub use rates::{normalize, NormalizedRates};
pub use thermal::{ActuatorPowerModel, ThermalModel, ThermalRunState};
pub use waveform::WaveformGenerator;
