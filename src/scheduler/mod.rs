// src/scheduler/mod.rs - Fixed-period sampling loop
pub mod lifecycle;
pub mod source;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::simulation::output::{OutputFormat, Reading};
use crate::sink::ReadingSink;

pub use lifecycle::{Lifecycle, LifecycleError, LifecycleState};
pub use source::{SampleSource, ThermalSource, WaveformSource};

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sleeps_completed: u64,
    pub readings: u64,
}

/// Drives one sensor: wait one period, sample, emit, repeat until stopped.
///
/// A stop request is observed ahead of a sleep that completes at the same
/// moment, so every completed sleep yields exactly one reading and nothing is
/// emitted after the stop is seen. The first reading therefore arrives one
/// full period after start; a sine sensor never emits its start midpoint.
pub struct SamplingScheduler<S: SampleSource> {
    name: String,
    source: S,
    sink: Arc<dyn ReadingSink>,
    lifecycle: Lifecycle,
    period: Duration,
    output: OutputFormat,
}

impl<S: SampleSource> SamplingScheduler<S> {
    pub fn new(
        name: impl Into<String>,
        source: S,
        sink: Arc<dyn ReadingSink>,
        lifecycle: Lifecycle,
        period: Duration,
        output: OutputFormat,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            sink,
            lifecycle,
            period,
            output,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub async fn run(mut self) -> Result<RunSummary, LifecycleError> {
        match self.lifecycle.start() {
            Ok(()) => {}
            Err(LifecycleError::InvalidTransition(LifecycleState::Stopped)) => {
                tracing::info!("Sensor '{}' stopped before it started", self.name);
                return Ok(RunSummary::default());
            }
            Err(e) => return Err(e),
        }
        tracing::info!("Sensor '{}' running, sampling every {:?}", self.name, self.period);

        let mut summary = RunSummary::default();
        if !self.source.prepare(&self.lifecycle).await {
            tracing::info!("Sensor '{}' stopped before its first reading", self.name);
            return Ok(summary);
        }

        while self.lifecycle.is_running() {
            tokio::select! {
                biased;
                _ = self.lifecycle.stopped() => break,
                _ = tokio::time::sleep(self.period) => {}
            }
            summary.sleeps_completed += 1;

            let value = self.source.sample(Instant::now()).await;
            let reading = Reading::new(self.name.clone(), summary.sleeps_completed, self.output.render(value));
            tracing::debug!("Sensor '{}' tick {}: {:.4}", self.name, reading.tick, value);
            self.sink.emit(reading).await;
            summary.readings += 1;
        }

        self.lifecycle.request_stop();
        tracing::info!("Sensor '{}' stopped after {} reading(s)", self.name, summary.readings);
        Ok(summary)
    }
}
