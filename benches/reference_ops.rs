//! Benchmarks for reference operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use amor::config::ReferenceConfig;
use amor::reference::Reference;
use amor::registry::ReferenceRegistry;
use amor::Completeness;

const IRI: &str = "http://www.semanticweb.org/bench";

/// A three-level taxonomy with `per_leaf` individuals under each leaf.
fn populated(registry: &ReferenceRegistry, name: &str, per_leaf: usize) -> std::sync::Arc<Reference> {
    let kb = registry
        .create(name, ReferenceConfig::new(IRI).with_buffering(true, true))
        .unwrap();
    for a in 0..4 {
        kb.add_sub_class(&format!("A{a}"), "Root");
        for b in 0..4 {
            let leaf = format!("A{a}B{b}");
            kb.add_sub_class(&leaf, &format!("A{a}"));
            for i in 0..per_leaf {
                kb.add_individual_to_class(&format!("{leaf}_i{i}"), &leaf);
            }
        }
    }
    kb.synchronize();
    kb
}

fn bench_synchronize(c: &mut Criterion) {
    let registry = ReferenceRegistry::new();
    let kb = populated(&registry, "sync", 10);

    c.bench_function("synchronize_160_individuals", |bench| {
        bench.iter(|| {
            kb.add_individual_to_class("extra", "A0B0");
            black_box(kb.synchronize());
            kb.remove_individual_from_class("extra", "A0B0");
            black_box(kb.synchronize())
        })
    });
}

fn bench_instances(c: &mut Criterion) {
    let registry = ReferenceRegistry::new();
    let kb = populated(&registry, "instances", 10);

    c.bench_function("individuals_of_root_transitive", |bench| {
        bench.iter(|| black_box(kb.individuals_of_with("Root", Completeness::Transitive)))
    });
    c.bench_function("individuals_of_root_direct", |bench| {
        bench.iter(|| black_box(kb.individuals_of_with("Root", Completeness::Direct)))
    });
}

fn bench_types(c: &mut Criterion) {
    let registry = ReferenceRegistry::new();
    let kb = populated(&registry, "types", 10);

    c.bench_function("bottom_types_of", |bench| {
        bench.iter(|| black_box(kb.bottom_types_of("A3B3_i9")))
    });
}

fn bench_buffered_write(c: &mut Criterion) {
    let registry = ReferenceRegistry::new();
    let kb = populated(&registry, "writes", 2);

    c.bench_function("buffered_write_and_flush_100", |bench| {
        bench.iter(|| {
            for i in 0..100 {
                kb.add_object_property(&format!("A1B1_i{}", i % 2), "near", &format!("n{i}"));
            }
            black_box(kb.flush());
            for i in 0..100 {
                kb.remove_object_property(&format!("A1B1_i{}", i % 2), "near", &format!("n{i}"));
            }
            black_box(kb.flush())
        })
    });
}

criterion_group!(
    benches,
    bench_synchronize,
    bench_instances,
    bench_types,
    bench_buffered_write
);
criterion_main!(benches);
