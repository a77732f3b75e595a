use blight_core::{run_spread, Coordinate, EngineConfig, InputTables, SpreadParams};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn ring_offsets(radius: i32) -> Vec<Coordinate> {
    let mut offsets = Vec::new();
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx.abs().max(dy.abs()) == radius {
                offsets.push(Coordinate::new(dx as f64, dy as f64));
            }
        }
    }
    offsets
}

fn synthetic_world(width: u32, rings: i32, infected: usize) -> InputTables {
    let mut rng = SmallRng::seed_from_u64(u64::from(width));
    let random_tree = |rng: &mut SmallRng| {
        Coordinate::new(
            f64::from(rng.gen_range(0..width)),
            f64::from(rng.gen_range(0..width)),
        )
    };

    let candidates = (0..width)
        .flat_map(|x| (0..width).map(move |y| Coordinate::new(f64::from(x), f64::from(y))))
        .collect();
    let newly_infected = (0..infected).map(|_| random_tree(&mut rng)).collect();
    let losing_infection = (0..infected / 4).map(|_| random_tree(&mut rng)).collect();
    let ring_count = rings as usize;

    InputTables {
        rings: (1..=rings).map(ring_offsets).collect(),
        prob_sc: (0..ring_count / 2).map(|i| 0.05 / (i + 1) as f64).collect(),
        prob_pf: (0..ring_count).map(|i| 0.1 / (i + 1) as f64).collect(),
        prob_hn: (0..ring_count).map(|i| 0.2 / (i + 1) as f64).collect(),
        candidates,
        newly_infected,
        losing_infection,
    }
}

fn bench_spread(c: &mut Criterion) {
    let mut group = c.benchmark_group("spread");
    let config = EngineConfig::default();

    for width in [32u32, 64, 128] {
        let tables = synthetic_world(width, 8, (width * width / 16) as usize);
        let params = SpreadParams::new(f64::from(width)).expect("valid width");
        group.bench_with_input(BenchmarkId::new("world", width), &tables, |b, tables| {
            b.iter(|| run_spread(tables, &params, &config).expect("spread run"))
        });
    }

    group.finish();
}

criterion_group!(spread_benches, bench_spread);
criterion_main!(spread_benches);
