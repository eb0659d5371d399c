// src/simulation/output.rs - Representation of emitted readings
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a computed value is handed to the reading sink.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Numeric value rounded to two decimal places.
    #[default]
    Number,
    /// Fixed two-decimal string, e.g. `"65.80"`.
    String,
}

impl OutputFormat {
    pub fn render(&self, value: f64) -> ReadingValue {
        match self {
            OutputFormat::Number => ReadingValue::Number(round2(value)),
            OutputFormat::String => ReadingValue::Text(format!("{:.2}", value)),
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
}

impl ReadingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(v) => Some(*v),
            ReadingValue::Text(s) => s.parse().ok(),
        }
    }
}

/// One emitted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor: String,
    /// 1-based tick index within the sensor's run.
    pub tick: u64,
    pub value: ReadingValue,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(sensor: impl Into<String>, tick: u64, value: ReadingValue) -> Self {
        Self {
            sensor: sensor.into(),
            tick,
            value,
            timestamp: Utc::now(),
        }
    }
}
