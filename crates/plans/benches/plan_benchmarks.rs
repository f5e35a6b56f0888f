use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hure_plans::{bundle_quote, check_plan_limits, plan_details, PlanProduct, TenantUsage};

/// These paths sit on every pricing-page render and dashboard load; the bench
/// mostly guards against accidental allocation creeping into the lookups.
fn bench_catalog_paths(c: &mut Criterion) {
    c.bench_function("plan_details_known_key", |b| {
        b.iter(|| plan_details(black_box(PlanProduct::Core), black_box("essential")))
    });

    c.bench_function("bundle_quote_default_care", |b| {
        b.iter(|| bundle_quote(black_box("essential"), None))
    });

    let plan = plan_details(PlanProduct::Core, "growth").unwrap();
    let usage = TenantUsage {
        staff_count: 87,
        location_count: 6,
        admin_role_count: 4,
    };
    c.bench_function("check_plan_limits", |b| {
        b.iter(|| check_plan_limits(black_box(&usage), black_box(plan)))
    });
}

criterion_group!(benches, bench_catalog_paths);
criterion_main!(benches);
