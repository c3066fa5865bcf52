//! Resolver performance benchmark.
//!
//! The resolver runs once per candidate entity per style per frame, so its
//! cost is on the frame's critical path. This benchmark measures a full
//! three-axis resolution over a mixed entity population.
//!
//! Run with: `cargo bench --bench resolve_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use limn_core::prelude::*;

/// A snapshot with every feature active on every style axis.
fn full_snapshot() -> FeatureSnapshot {
    let all = StyleSet {
        outline: true,
        glow: true,
        chams: true,
    };
    let mut snapshot = FeatureSnapshot::default();
    snapshot.entity_highlight.styles = all;
    snapshot.item_highlight.styles = all;
    snapshot.fuse_timer.enabled = true;
    snapshot.fuse_timer.highlight = all;
    snapshot.storage_highlight.styles = all;
    snapshot
}

/// A mixed population resembling one frame's candidate entities.
fn entity_population() -> Vec<EntityView> {
    let mut entities = Vec::with_capacity(512);
    for i in 0..512u64 {
        let entity = match i % 5 {
            0 => EntityView::living(i, Hostility::Hostile),
            1 => EntityView::living(i, Hostility::Passive),
            2 => EntityView::item(i),
            3 => EntityView::explosive(i, (i % 80) as u32),
            _ => EntityView::block(i, Some(StorageKind::Chest)),
        };
        entities.push(entity);
    }
    entities
}

fn bench_resolve(c: &mut Criterion) {
    let snapshot = full_snapshot();
    let entities = entity_population();

    c.bench_function("resolve_outline_512_entities", |b| {
        b.iter(|| {
            let mut matched = 0usize;
            for entity in &entities {
                if resolve(black_box(entity), &snapshot, HighlightStyle::Outline).is_some() {
                    matched += 1;
                }
            }
            black_box(matched)
        })
    });

    c.bench_function("resolve_all_styles_512_entities", |b| {
        b.iter(|| {
            let mut requests = 0usize;
            for entity in &entities {
                requests += resolve_all(black_box(entity), &snapshot).len();
            }
            black_box(requests)
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
