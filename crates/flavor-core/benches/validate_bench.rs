//! Criterion benchmarks for the validation routine.
//!
//! Every save, update, import, and read runs through `validate`, so it should
//! stay in the low-microsecond range even for hostile input.
//!
//! Run with:
//! ```bash
//! cargo bench --package flavor-core --bench validate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flavor_core::{
    export_json, parse_import, validate, ConfigPatch, FlavorConfig, MarkupPolicy,
};
use serde_json::json;

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let empty = ConfigPatch::default();
    group.bench_function("empty_patch", |b| {
        b.iter(|| validate(black_box(&empty), MarkupPolicy::deny()))
    });

    let hostile = ConfigPatch::from_value(&json!({
        "enabled": "yes",
        "customizations": {
            "fontSize": "999",
            "borderWidth": -4,
            "borderRadius": 12.7,
            "padding": null,
            "glowIntensity": [1],
            "glowEnabled": {},
            "shadowEnabled": 0,
            "borderStyle": "italic"
        },
        "customHtml": "<script>alert(1)</script>"
    }));
    group.bench_function("hostile_patch", |b| {
        b.iter(|| validate(black_box(&hostile), MarkupPolicy::deny()))
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let cfg = FlavorConfig::default();
    let text = export_json(&cfg).expect("export must succeed");

    c.bench_function("export_json", |b| b.iter(|| export_json(black_box(&cfg))));
    c.bench_function("parse_import", |b| b.iter(|| parse_import(black_box(&text))));
}

criterion_group!(benches, bench_validate, bench_codec);
criterion_main!(benches);
