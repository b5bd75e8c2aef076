//! Micro-benchmarks for authorization decisions and source lookups
//!
//! Run with: cargo bench --features=benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use authz_gate::auth::{
    All, Any, Credentials, HasPermission, InGroup, NotAnonymous, Predicate, RequestContext,
};
use authz_gate::benchmarks::{
    AdapterBenchmark, BenchmarkAction, GroupsRetrievalAction, PermissionsRetrievalAction,
};
use authz_gate::check_authorization;
use authz_gate::services::source::{indexed_adapter, scan_adapter, SourceData};

fn context() -> RequestContext {
    RequestContext::new().with_credentials(
        Credentials::for_user("alice")
            .with_groups(["admins", "developers"])
            .with_permissions(["edit-site", "commit"]),
    )
}

/// Benchmark decisions for simple and composite predicates
fn bench_check_authorization(c: &mut Criterion) {
    let ctx = context();
    let single = InGroup::new("admins");
    let composite = All::new(vec![
        Box::new(NotAnonymous),
        Box::new(Any::new(vec![
            Box::new(InGroup::new("trolls")),
            Box::new(HasPermission::new("commit")),
        ])),
    ]);
    let denied = InGroup::new("trolls");

    let cases: [(&str, Option<&dyn Predicate>); 4] = [
        ("none", None),
        ("single", Some(&single)),
        ("composite", Some(&composite)),
        ("denied", Some(&denied)),
    ];

    let mut group = c.benchmark_group("check_authorization");
    for (name, predicate) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &predicate, |b, predicate| {
            b.iter(|| black_box(check_authorization(*predicate, &ctx).is_ok()))
        });
    }
    group.finish();
}

fn seed(sections: usize, items_per_section: usize) -> SourceData {
    (0..sections)
        .map(|s| {
            let items = (0..items_per_section)
                .map(|i| format!("user{}", (s + i) % (sections * 2)))
                .collect();
            (format!("group{}", s), items)
        })
        .collect()
}

/// Benchmark the built-in lookups on both in-memory backends
fn bench_source_lookups(c: &mut Criterion) {
    let groups = GroupsRetrievalAction::new("user3");
    let permissions = PermissionsRetrievalAction::new("user3");
    let actions: [&dyn BenchmarkAction; 2] = [&groups, &permissions];

    for size in [10, 100] {
        let data = seed(size, 5);
        let mut group = c.benchmark_group(format!("source_lookup_{}", size));

        for action in actions {
            for (name, mut benchmark) in [
                ("scan", AdapterBenchmark::new(scan_adapter())),
                ("indexed", AdapterBenchmark::new(indexed_adapter())),
            ] {
                group.bench_function(BenchmarkId::new(action.label(), name), |b| {
                    b.iter(|| {
                        black_box(benchmark.run(action, 1, Some(&data)).is_ok());
                    })
                });
            }
        }
        group.finish();
    }
}

criterion_group!(benches, bench_check_authorization, bench_source_lookups);
criterion_main!(benches);
