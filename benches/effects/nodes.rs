//! One bench per effect the factory knows about.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapline::{EffectNode, EffectSpec};

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("effects/process");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut scratch = [
            vec![0.0f32; size],
            vec![0.0f32; size],
            vec![0.0f32; size],
        ];

        for name in EffectSpec::NAMES {
            let Ok(mut effect) = tapline::create(name, SAMPLE_RATE) else {
                continue;
            };
            let channels = effect.layout().channels();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let [left, right, extra] = &mut scratch;
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    let mut all = [
                        left.as_mut_slice(),
                        right.as_mut_slice(),
                        extra.as_mut_slice(),
                    ];
                    effect.process(black_box(&mut all[..channels]));
                })
            });
        }
    }

    group.finish();
}
