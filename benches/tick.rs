//! Per-iteration cost of the controller loop.
//!
//! Run with: cargo bench --bench tick

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ring_toss::{tick, Console, ControlCommand, Level, RigConfig};

/// Pin level for tick `t` of a repeating toss: 40ms down, 400ms up.
fn toss_pattern(t: u32, active_low: bool) -> bool {
    let level = if t % 440 < 40 {
        Level::Pressed
    } else {
        Level::Released
    };
    level.pin_for(active_low)
}

fn benchmark_idle_tick(c: &mut Criterion) {
    let config = RigConfig::default();
    let idle = Level::Released.pin_for(config.sensor.active_low);
    let mut console = Console::new(&config, 0, idle);
    let mut now = 0u32;

    c.bench_function("idle_tick", |b| {
        b.iter(|| {
            now = now.wrapping_add(1);
            black_box(tick(&mut console, black_box(now), idle, &config))
        });
    });
}

fn benchmark_match_second(c: &mut Criterion) {
    let config = RigConfig::default();
    let idle = Level::Released.pin_for(config.sensor.active_low);

    let mut group = c.benchmark_group("match");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("1s_of_tossing", |b| {
        b.iter(|| {
            let mut console = Console::new(&config, 0, idle);
            console.apply(
                &ControlCommand::StartMatch {
                    player_count: 4,
                    names: vec![],
                },
                0,
                &config,
            );
            for now in 1..=1_000u32 {
                let pin = toss_pattern(now, config.sensor.active_low);
                black_box(tick(&mut console, now, pin, &config));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_idle_tick, benchmark_match_second);
criterion_main!(benches);
