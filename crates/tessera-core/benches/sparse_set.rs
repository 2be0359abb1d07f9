//! Benchmarks for the drawable/entity arena

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_core::alloc::SparseSet;
use tessera_core::math::{Vec2, Vec4};

#[derive(Clone, Copy, Debug)]
struct SpriteData {
    position: Vec2,
    scale: Vec2,
    color: Vec4,
    dirty: bool,
}

impl Default for SpriteData {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::splat(32.0),
            color: Vec4::ONE,
            dirty: true,
        }
    }
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_set_push");

    for size in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut set = SparseSet::new();
                for _ in 0..size {
                    set.push(black_box(SpriteData::default()));
                }
                set
            });
        });
    }

    group.finish();
}

fn bench_dirty_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_set_dirty_sweep");

    for size in [1000, 10000] {
        let mut set = SparseSet::new();
        let keys: Vec<_> = (0..size).map(|_| set.push(SpriteData::default())).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter(|| {
                let mut cleaned = 0usize;
                for key in keys {
                    if let Some(sprite) = set.get_mut(*key) {
                        if sprite.dirty {
                            sprite.position += sprite.scale;
                            sprite.dirty = false;
                            cleaned += 1;
                        }
                        sprite.dirty = true;
                    }
                }
                black_box(cleaned)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push, bench_dirty_sweep);
criterion_main!(benches);
