//! Benchmark for region generation and placement tests.
//!
//! TARGET: a full 100x100 field in well under a tick (100 ms)
//!
//! Run with: cargo bench --package wayfarer_procedural --bench terrain_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wayfarer_procedural::{
    FieldNoise, Hitmap, NoiseSeed, RegionType, Terrain, TerrainRequest, WorldRoot,
};

fn request(kind: RegionType, is_town: bool) -> TerrainRequest {
    TerrainRequest {
        root: WorldRoot::Overworld,
        kind,
        x: 0,
        y: 0,
        is_town,
        is_dungeon_entrance: false,
        noise_seed: NoiseSeed::default(),
    }
}

fn benchmark_field_noise(c: &mut Criterion) {
    let field = FieldNoise::new(NoiseSeed::default());
    let mut tiles = vec![0; 100 * 100];

    let mut group = c.benchmark_group("field_noise");
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("fill_100x100", |b| {
        let mut origin = 0i64;
        b.iter(|| {
            origin += 100;
            field.fill_grid(black_box(origin), 0, &mut tiles, 100, 100);
        });
    });

    group.finish();
}

fn benchmark_terrain_generation(c: &mut Criterion) {
    let field = request(RegionType::Field, false);
    let town = request(RegionType::Field, true);
    let shop = request(RegionType::Shop, false);

    c.bench_function("generate_field", |b| {
        b.iter(|| black_box(Terrain::generate(black_box(&field))));
    });
    c.bench_function("generate_town", |b| {
        b.iter(|| black_box(Terrain::generate(black_box(&town))));
    });
    c.bench_function("generate_shop", |b| {
        b.iter(|| black_box(Terrain::generate(black_box(&shop))));
    });
}

fn benchmark_hitmap_fits(c: &mut Criterion) {
    let mut hitmap = Hitmap::new(100, 100);
    for i in 0..100 {
        hitmap.set((i * 37) % 100, (i * 53) % 100);
    }

    c.bench_function("hitmap_fits", |b| {
        let mut x = 1.0f64;
        b.iter(|| {
            x = if x > 90.0 { 1.0 } else { x + 0.7 };
            black_box(hitmap.fits(black_box(x), black_box(x * 0.5 + 1.0), 2.0, 2.0))
        });
    });
}

criterion_group!(
    benches,
    benchmark_field_noise,
    benchmark_terrain_generation,
    benchmark_hitmap_fits,
);
criterion_main!(benches);
