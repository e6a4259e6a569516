//! Benchmarks for building an inventory over an in-memory organization.

use codeinventory::exclusion::ExclusionFilter;
use codeinventory::inventory::Inventory;
use codeinventory::overrides::Overrides;
use codeinventory::provider::memory::MemoryProvider;
use codeinventory::provider::{License, Repository};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const ORG: &str = "GSA";

/// An organization where every third repository carries a declaration and
/// every fifth is private.
fn organization(count: usize) -> MemoryProvider {
    let mut provider = MemoryProvider::new().with_organization(ORG, Some("gsa@example.gov"));
    for i in 0..count {
        let name = format!("repo-{i:04}");
        let full_name = format!("{ORG}/{name}");
        provider = provider
            .with_repository(
                Repository::new(ORG, &name)
                    .with_private(i % 5 == 0)
                    .with_topics(["benchmark"]),
            )
            .with_file(&full_name, "README.md", "# Benchmark\n")
            .with_license(
                &full_name,
                License {
                    spdx_id: Some("CC0-1.0".to_string()),
                    url: Some("https://api.github.com/licenses/cc0-1.0".to_string()),
                },
            );
        if i % 3 == 0 {
            provider = provider.with_file(
                &full_name,
                ".codeinventory.yml",
                "description: Declared\ncontact:\n  email: team@example.gov\nlaborHours: 40\n",
            );
        }
    }
    provider
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for count in [10, 100, 1000] {
        let provider = organization(count);
        let mut overrides = Overrides::new();
        overrides
            .apply_assignment("organization=General Services Administration")
            .unwrap();
        let inventory = Inventory::new(&provider, ORG)
            .with_overrides(overrides)
            .with_exclusions(ExclusionFilter::new(["repo-0001"]));

        group.bench_with_input(BenchmarkId::new("sequential", count), &count, |b, _| {
            b.iter(|| {
                provider.reset_calls();
                black_box(inventory.build().unwrap())
            })
        });
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, _| {
            b.iter(|| {
                provider.reset_calls();
                black_box(inventory.build_parallel().unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
