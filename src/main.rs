// src/main.rs - Simulated sensor service
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use sim_sensor::actuator::registry::ActuatorRecord;
use sim_sensor::actuator::{ActuatorId, ActuatorState, InMemoryActuatorRegistry};
use sim_sensor::config::{self, Config};
use sim_sensor::manager::SensorManager;
use sim_sensor::sink::ReadingStore;
use sim_sensor::web::api::{create_router, AppStateInner};

/// Runs the configured simulated sensors and serves their readings over HTTP.
#[derive(Parser, Debug)]
#[command(name = "sim-sensor", version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(default_value = "simsensor.toml")]
    config: String,

    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Do not start the HTTP API even if enabled in the config
    #[arg(long)]
    no_server: bool,
}

fn registry_records(config: &Config) -> Vec<ActuatorRecord> {
    config
        .actuators
        .iter()
        .map(|a| ActuatorRecord {
            id: ActuatorId(a.id),
            name: a.name.clone().unwrap_or_else(|| format!("actuator-{}", a.id)),
            state: ActuatorState {
                active: a.active,
                power: a.power,
            },
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::info!("Starting sim-sensor {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Loading configuration from: {}", args.config);

    let config = config::load_config(&args.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", args.config, e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    tracing::info!(
        "{} sensor(s), {} actuator(s), unit {}",
        config.sensors.len(),
        config.actuators.len(),
        sim_sensor::unit::get_unit(&config.simulation.unit)
    );

    // The registry starts unpopulated, as it would while the host boots.
    let registry = InMemoryActuatorRegistry::new();
    let records = registry_records(&config);
    let delay = Duration::try_from_secs_f64(config.simulation.registry_delay_secs).unwrap_or_default();
    {
        let registry = registry.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            registry.populate(records).await;
        });
    }

    let store = ReadingStore::new();
    let manager = Arc::new(SensorManager::spawn(
        &config,
        Arc::new(registry.clone()),
        Arc::new(store.clone()),
    ));

    if config.server.enabled && !args.no_server {
        let app = create_router(Arc::new(AppStateInner {
            manager: manager.clone(),
            registry,
            store,
        }));
        let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
        tracing::info!("Web API listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
    } else {
        tokio::signal::ctrl_c().await?;
    }

    tracing::info!("Shutting down sensors");
    for (name, result) in manager.shutdown().await {
        match result {
            Ok(summary) => tracing::info!("Sensor '{}': {} reading(s)", name, summary.readings),
            Err(e) => tracing::error!("Sensor '{}' ended with error: {}", name, e),
        }
    }
    Ok(())
}
