use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tankfront_core::entity::{Archetype, Tank};
use tankfront_core::environment::{Terrain, TerrainKind};
use tankfront_core::input::{InputState, MoveFlags};
use tankfront_core::level::LevelCatalog;
use tankfront_core::{SimConfig, Simulation};

fn populated_simulation() -> Simulation {
    let mut sim = Simulation::new(SimConfig::with_seed(7), LevelCatalog::default())
        .expect("default config is valid");
    // A crowd around the player so AI, weapons and combat all have work.
    for i in 0..20 {
        let angle = i as f32 * 0.314;
        let position = Vec2::new(300.0, 300.0) + Vec2::new(angle.cos(), angle.sin()) * 250.0;
        sim.add_enemy(Tank::enemy(Archetype::Normal, position, &[]));
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    let input = InputState {
        moves: MoveFlags::RIGHT | MoveFlags::DOWN,
        fire_held: true,
        ability: None,
        cursor: Vec2::new(400.0, 300.0),
    };

    c.bench_function("tick_populated_60", |b| {
        b.iter_batched(
            populated_simulation,
            |mut sim| {
                for _ in 0..60 {
                    black_box(sim.step(&input));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_terrain_generation(c: &mut Criterion) {
    let world = Vec2::splat(3000.0);
    c.bench_function("terrain_generate", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        b.iter(|| black_box(Terrain::generate(TerrainKind::Forest, world, &mut rng)))
    });
}

criterion_group!(benches, bench_tick, bench_terrain_generation);
criterion_main!(benches);
