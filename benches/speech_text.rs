// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use pitchside::commentary::speech_text::{prepare_for_speech, strip_emoji};
use std::hint::black_box;

const LINE: &str =
    "⚽🔥 GOAL! 2-1 in the 90+3rd minute, 45210 fans on their feet 👏👏 Score 10 to 5 on corners";

fn speech_text_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("speech_text");

    group.bench_function("strip_emoji", |b| {
        b.iter(|| black_box(strip_emoji(black_box(LINE))));
    });

    group.bench_function("prepare_for_speech", |b| {
        b.iter(|| black_box(prepare_for_speech(black_box(LINE))));
    });

    group.finish();
}

criterion_group!(benches, speech_text_benchmark);
criterion_main!(benches);
