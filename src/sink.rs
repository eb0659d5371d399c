// src/sink.rs - Destinations for emitted readings
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::simulation::output::Reading;

/// Receives one reading per completed tick. Implementations must not block
/// the sampling loop.
#[async_trait]
pub trait ReadingSink: Send + Sync {
    async fn emit(&self, reading: Reading);
}

/// Forwards readings into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Reading>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reading>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ReadingSink for ChannelSink {
    async fn emit(&self, reading: Reading) {
        if self.tx.send(reading).is_err() {
            tracing::debug!("Reading receiver dropped");
        }
    }
}

/// Keeps the latest reading of every sensor for the HTTP API.
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    latest: Arc<RwLock<HashMap<String, Reading>>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self, sensor: &str) -> Option<Reading> {
        self.latest.read().await.get(sensor).cloned()
    }

    pub async fn all(&self) -> HashMap<String, Reading> {
        self.latest.read().await.clone()
    }
}

#[async_trait]
impl ReadingSink for ReadingStore {
    async fn emit(&self, reading: Reading) {
        tracing::debug!("{} #{} -> {:?}", reading.sensor, reading.tick, reading.value);
        self.latest.write().await.insert(reading.sensor.clone(), reading);
    }
}

/// Delivers every reading to each inner sink in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ReadingSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn ReadingSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl ReadingSink for FanoutSink {
    async fn emit(&self, reading: Reading) {
        for sink in &self.sinks {
            sink.emit(reading.clone()).await;
        }
    }
}
