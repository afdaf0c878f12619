//! Criterion benchmarks for controller frame parsing.
//!
//! Pointer motion arrives at touch-sample rate, so `parse_frame` plus the
//! accumulator sit on the hottest path in the host.
//!
//! Run with:
//! ```bash
//! cargo bench --package remote-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use remote_core::{canonicalize, parse_frame, MouseAccumulator};

// ── Frame fixtures ────────────────────────────────────────────────────────────

const FRAMES: &[(&str, &str)] = &[
    ("mouse_move", r#"{"type":"mouse_move","deltaX":1.25,"deltaY":-0.5}"#),
    ("mouse_click", r#"{"type":"mouse_click","button":"right","double":false}"#),
    ("mouse_scroll", r#"{"type":"mouse_scroll","scrollX":0,"scrollY":3}"#),
    (
        "key_tap",
        r#"{"type":"key_tap","key":"a","action":"tap","modifiers":["cmd","shift"]}"#,
    ),
    ("text_input", r#"{"type":"text_input","text":"hello, world"}"#),
    ("command", r#"{"type":"command","command":"media.volume_up","args":[6]}"#),
    ("heartbeat", r#"{"type":"heartbeat"}"#),
    ("invalid", r#"{"type":"teleport"}"#),
];

// ── Benchmark groups ──────────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_frame");
    for (name, raw) in FRAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), raw, |b, raw| {
            b.iter(|| parse_frame(black_box(raw)))
        });
    }
    group.finish();
}

fn bench_move_pipeline(c: &mut Criterion) {
    let raw = FRAMES[0].1;
    c.bench_function("mouse_move_parse_and_accumulate", |b| {
        let mut acc = MouseAccumulator::new();
        b.iter(|| {
            if let Ok(remote_core::InputEvent::MouseMove { dx, dy }) = parse_frame(black_box(raw)) {
                black_box(acc.accumulate(dx, dy));
            }
        })
    });
}

fn bench_canonicalize(c: &mut Criterion) {
    c.bench_function("canonicalize_command", |b| {
        b.iter(|| canonicalize(black_box("Media-Volume-Up")))
    });
}

criterion_group!(benches, bench_parse, bench_move_pipeline, bench_canonicalize);
criterion_main!(benches);
