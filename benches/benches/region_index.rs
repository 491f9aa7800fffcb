// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use zen_region::{Aabb2D, RegionIndex};

fn gen_grid_children(n: usize, cell: f64) -> Vec<(u32, Aabb2D)> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let key = (y * n + x) as u32;
            out.push((
                key,
                Aabb2D::from_xywh(x as f64 * cell, y as f64 * cell, cell, cell),
            ));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &n in &[16usize, 32, 64] {
        let cell = 20.0;
        let side = n as f64 * cell;
        let children = gen_grid_children(n, cell);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter_batched(
                RegionIndex::<u32>::new,
                |mut idx| {
                    let unindexed = idx.rebuild(side, side, children.iter().copied());
                    black_box((idx.len(), unindexed.len()));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_relocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocate");
    let n = 32;
    let cell = 20.0;
    let side = n as f64 * cell;
    let mut idx = RegionIndex::<u32>::new();
    idx.rebuild(side, side, gen_grid_children(n, cell));
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let moves: Vec<(u32, Aabb2D)> = (0..1024)
        .map(|_| {
            let key = (rng.next_u64() % (n * n) as u64) as u32;
            let x = rng.next_f64() * (side - cell);
            let y = rng.next_f64() * (side - cell);
            (key, Aabb2D::from_xywh(x, y, cell, cell))
        })
        .collect();
    group.throughput(Throughput::Elements(moves.len() as u64));
    group.bench_function("random_moves", |b| {
        b.iter(|| {
            for &(key, bounds) in &moves {
                black_box(idx.relocate(key, bounds));
            }
        });
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let n = 64;
    let cell = 10.0;
    let side = n as f64 * cell;
    let mut idx = RegionIndex::<u32>::new();
    idx.rebuild(side, side, gen_grid_children(n, cell));

    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    let points: Vec<(f64, f64)> = (0..1024)
        .map(|_| (rng.next_f64() * side, rng.next_f64() * side))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("point", |b| {
        b.iter(|| {
            let hits: usize = points
                .iter()
                .map(|&(x, y)| idx.query_point(x, y).count())
                .sum();
            black_box(hits);
        });
    });
    group.bench_function("region_200", |b| {
        b.iter(|| {
            let hits: usize = points
                .iter()
                .map(|&(x, y)| idx.query_region((x, y), (x + 200.0, y + 200.0)).len())
                .sum();
            black_box(hits);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_relocate, bench_queries);
criterion_main!(benches);
