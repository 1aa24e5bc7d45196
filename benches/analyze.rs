use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use nsconflict::{ConflictEngine, PolicyResource, ResourceSnapshot, Selector};

/// Builds `namespaces * per_namespace` resources: one namespace-wide resource in
/// every fourth namespace, the rest selector-scoped with some shared selectors.
fn make_snapshot(namespaces: usize, per_namespace: usize) -> ResourceSnapshot {
    let mut snapshot = ResourceSnapshot::default();
    for ns in 0..namespaces {
        let namespace = format!("ns-{ns}");
        if ns % 4 == 0 {
            snapshot.push(PolicyResource::namespace_wide(&namespace, "mesh-default"));
        }
        for i in 0..per_namespace {
            let selector = Selector::new()
                .with_label("app", format!("app-{}", i % 8))
                .with_label("tier", if i % 2 == 0 { "web" } else { "db" });
            snapshot.push(PolicyResource::scoped(&namespace, format!("policy-{i}"), selector));
        }
    }
    snapshot
}

fn bench_analyze(c: &mut Criterion) {
    let engine = ConflictEngine::new();
    let mut group = c.benchmark_group("analyze");

    for (namespaces, per_namespace) in [(16, 8), (64, 16), (128, 32)] {
        let snapshot = make_snapshot(namespaces, per_namespace);
        group.throughput(Throughput::Elements(snapshot.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(snapshot.len()),
            &snapshot,
            |b, snapshot| {
                b.iter(|| engine.analyze_snapshot(snapshot).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
