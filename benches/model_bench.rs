// Benchmark for the thermal and waveform models
// Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use sim_sensor::actuator::ActuatorState;
use sim_sensor::simulation::properties::{SimulationConfig, WaveformConfig};
use sim_sensor::simulation::thermal::ThermalModel;
use sim_sensor::simulation::waveform::WaveformGenerator;
use sim_sensor::unit::TemperatureUnit;
use std::hint::black_box;

fn bench_thermal_advance(c: &mut Criterion) {
    let config = SimulationConfig {
        heat_rate: 10.0,
        cool_rate: 10.0,
        ..SimulationConfig::default()
    };
    let model = ThermalModel::from_config(&config, TemperatureUnit::Celsius);
    c.bench_function("thermal advance 10k ticks", |b| {
        b.iter(|| {
            let mut state = model.initial_state(config.initial_value());
            for i in 0..10_000u32 {
                let heating = (i / 500) % 2 == 0;
                model.advance(
                    &mut state,
                    Some(ActuatorState { active: heating, power: None }),
                    Some(ActuatorState::off()),
                );
            }
            black_box(state.last_value)
        });
    });
}

fn bench_waveform(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let generator = rt.block_on(async {
        WaveformGenerator::new(&WaveformConfig::default(), tokio::time::Instant::now())
    });
    c.bench_function("sine 10k samples", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..10_000 {
                sum += generator.value_at_elapsed(black_box(i as f64 * 5.0));
            }
            sum
        });
    });
}

criterion_group!(benches, bench_thermal_advance, bench_waveform);
criterion_main!(benches);
