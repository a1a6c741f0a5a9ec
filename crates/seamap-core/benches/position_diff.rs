use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use seamap_core::{NodeId, PositionMap, UpdatedPositionsMemo, point, updated_positions};

fn snapshot(n: usize, offset: f64) -> PositionMap {
    (0..n)
        .map(|i| {
            let x = i as f64;
            // Every tenth node moves.
            let dx = if i % 10 == 0 { offset } else { 0.0 };
            (NodeId::new(format!("n{i}")), point(x + dx, x * 0.5))
        })
        .collect()
}

fn bench_position_diff(c: &mut Criterion) {
    let current = snapshot(5_000, 0.0);
    let target = snapshot(5_000, 1.0);

    c.bench_function("updated_positions_5k", |b| {
        b.iter(|| updated_positions(black_box(&current), black_box(&target)))
    });

    let current = Rc::new(current);
    let target = Rc::new(target);
    let mut memo = UpdatedPositionsMemo::new();
    c.bench_function("updated_positions_memo_hit_5k", |b| {
        b.iter(|| memo.get(black_box(&current), black_box(&target)))
    });
}

criterion_group!(benches, bench_position_diff);
criterion_main!(benches);
