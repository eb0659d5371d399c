//! CLI entry point for the offline trace harness: runs one configured sensor
//! for a fixed number of ticks on a virtual clock and writes JSON lines.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use sim_sensor::actuator::ActuatorState;
use sim_sensor::config::{self, Config, RawValue, SensorConfig, SensorKind};
use sim_sensor::simulation::output::{OutputFormat, ReadingValue};
use sim_sensor::simulation::properties::{SimulationConfig, WaveformConfig};
use sim_sensor::simulation::thermal::ThermalModel;
use sim_sensor::simulation::waveform::WaveformGenerator;
use sim_sensor::unit::TemperatureUnit;

/// Simulation Harness CLI
#[derive(Parser, Debug)]
#[command(name = "sim-harness", about = "Offline trace of a simulated sensor.")]
pub struct Cli {
    /// Path to a TOML config file (a default thermal and sine sensor otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for JSON lines (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum log level
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List sensors available in the config
    ListSensors,
    /// Trace one sensor (default)
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Sensor name (first configured sensor if omitted)
    #[arg(long)]
    sensor: Option<String>,

    /// Number of ticks to compute
    #[arg(long, default_value_t = 120)]
    ticks: u64,

    /// Report the heat actuator as active
    #[arg(long)]
    heat_on: bool,

    /// Report the cool actuator as active
    #[arg(long)]
    cool_on: bool,

    /// Power fraction reported by active actuators
    #[arg(long)]
    power: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TraceRecord<'a> {
    sensor: &'a str,
    tick: u64,
    elapsed_secs: f64,
    value: ReadingValue,
}

fn demo_config() -> Config {
    let mut thermal = SensorConfig::new("thermal", SensorKind::Thermal);
    thermal.heater = Some(RawValue::Integer(1));
    thermal.cooler = Some(RawValue::Integer(2));
    Config {
        sensors: vec![thermal, SensorConfig::new("sine", SensorKind::Sine)],
        ..Config::default()
    }
}

fn trace(config: &Config, args: &RunArgs, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let sensor = match &args.sensor {
        Some(name) => config
            .sensors
            .iter()
            .find(|s| &s.name == name)
            .ok_or_else(|| format!("no sensor named '{}'", name))?,
        None => config.sensors.first().ok_or("config has no sensors")?,
    };
    let unit = TemperatureUnit::from_param(&config.simulation.unit);
    let output: OutputFormat = sensor.output.unwrap_or(config.simulation.output);

    match sensor.kind {
        SensorKind::Thermal => {
            let sim = SimulationConfig::from_properties(sensor);
            let model = ThermalModel::from_config(&sim, unit);
            let actuator = |active: bool| ActuatorState {
                active,
                power: args.power,
            };
            let heat = sim.heat_actuator.map(|_| actuator(args.heat_on));
            let cool = sim.cool_actuator.map(|_| actuator(args.cool_on));
            let mut state = model.initial_state(sim.initial_value());
            for tick in 1..=args.ticks {
                let value = model.advance(&mut state, heat, cool);
                let record = TraceRecord {
                    sensor: &sensor.name,
                    tick,
                    elapsed_secs: tick as f64 * sim.sample_period,
                    value: output.render(value),
                };
                writeln!(out, "{}", serde_json::to_string(&record)?)?;
            }
        }
        SensorKind::Sine => {
            let wave = WaveformConfig::from_properties(sensor);
            let generator = WaveformGenerator::new(&wave, tokio::time::Instant::now());
            for tick in 1..=args.ticks {
                let elapsed = tick as f64 * wave.sample_period;
                let record = TraceRecord {
                    sensor: &sensor.name,
                    tick,
                    elapsed_secs: elapsed,
                    value: output.render(generator.value_at_elapsed(elapsed)),
                };
                writeln!(out, "{}", serde_json::to_string(&record)?)?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => config::load_config(&path.to_string_lossy())?,
        None => demo_config(),
    };

    match cli.command {
        Some(Commands::ListSensors) => {
            for sensor in &config.sensors {
                println!("{} ({})", sensor.name, sensor.kind.as_str());
            }
        }
        Some(Commands::Run(ref args)) => run(&config, args, cli.output.as_ref())?,
        None => run(&config, &RunArgs { ticks: 120, ..RunArgs::default() }, cli.output.as_ref())?,
    }
    Ok(())
}

fn run(config: &Config, args: &RunArgs, output: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            trace(config, args, &mut writer)?;
            writer.flush()?;
            tracing::info!("Trace written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            trace(config, args, &mut lock)?;
        }
    }
    Ok(())
}
