//! Inheritance Resolution Benchmarks
//!
//! Compares memoized against cold effective-attribute resolution on the
//! embedded schemas, and measures a full bootstrap for reference.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ldap_schema_registry::{RegistryConfig, SchemaBootstrap, SchemaRegistry};

const CLASS_SETS: [&[&str]; 3] = [
    &["person"],
    &["inetOrgPerson", "ggseperson"],
    &[
        "inetOrgPerson",
        "ggseperson",
        "organization",
        "organizationalUnit",
        "extensibleObject",
    ],
];

fn registry(config: RegistryConfig) -> SchemaRegistry {
    SchemaBootstrap::embedded(config)
        .expect("embedded bundles")
        .run()
        .into_result()
        .expect("embedded schemas load")
}

fn bench_resolution(c: &mut Criterion) {
    let memoized = registry(RegistryConfig::default());
    let cold = registry(RegistryConfig::default().with_resolution_cache(false));

    let mut group = c.benchmark_group("effective_attributes");
    for classes in CLASS_SETS {
        group.throughput(Throughput::Elements(classes.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("memoized", classes.len()),
            &classes,
            |b, classes| {
                b.iter(|| {
                    let effective = memoized
                        .resolve_effective_attributes(black_box(*classes))
                        .expect("resolution");
                    black_box(effective.may.len())
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("cold", classes.len()),
            &classes,
            |b, classes| {
                b.iter(|| {
                    let effective = cold
                        .resolve_effective_attributes(black_box(*classes))
                        .expect("resolution");
                    black_box(effective.may.len())
                })
            },
        );
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap");
    group.bench_function("embedded_schemas", |b| {
        b.iter(|| black_box(registry(RegistryConfig::default()).object_count()))
    });
    group.finish();
}

criterion_group!(benches, bench_resolution, bench_bootstrap);
criterion_main!(benches);
