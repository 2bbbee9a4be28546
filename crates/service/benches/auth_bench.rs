use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::domain::{RegisterAdminInput, LoginInput};
use service::booking::{compute_end_time, start_time::parse_start_time};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12, password_algorithm: "argon2id".into() });

    // pre-create the account outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let admin = rt
        .block_on(svc.register_admin(RegisterAdminInput { tenant_name: "Bench".into(), username: "bench".into(), email: String::new(), password: "Benchmark1".into() }))
        .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { tenant_id: admin.tenant_id, username: "bench".into(), password: "Benchmark1".into() })).unwrap();
        });
    });
}

fn bench_slot(c: &mut Criterion) {
    let start = Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).unwrap();
    c.bench_function("booking_parse_and_compute", |b| {
        b.iter(|| {
            let parsed = parse_start_time("2025-01-02T10:00:00+02:00").unwrap_or(start);
            compute_end_time(parsed, 90)
        });
    });
}

criterion_group!(benches, bench_login, bench_slot);
criterion_main!(benches);
