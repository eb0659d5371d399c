// src/scheduler/lifecycle.rs - Idle -> Running -> Stopped signalling
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Idle,
    Running,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("cannot start a sensor that is {0:?}")]
    InvalidTransition(LifecycleState),
}

/// Shared lifecycle of one sensor. Clones observe and control the same state;
/// `Stopped` is terminal.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: Arc<watch::Sender<LifecycleState>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LifecycleState::Idle);
        Self { state: Arc::new(tx) }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// Idle -> Running.
    pub fn start(&self) -> Result<(), LifecycleError> {
        let mut observed = LifecycleState::Idle;
        let started = self.state.send_if_modified(|state| {
            observed = *state;
            if *state == LifecycleState::Idle {
                *state = LifecycleState::Running;
                true
            } else {
                false
            }
        });
        if started {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition(observed))
        }
    }

    /// Moves to `Stopped`. Returns false if already stopped.
    pub fn request_stop(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == LifecycleState::Stopped {
                false
            } else {
                *state = LifecycleState::Stopped;
                true
            }
        })
    }

    /// Resolves once the state is `Stopped`.
    pub async fn stopped(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|state| *state == LifecycleState::Stopped).await;
    }
}
