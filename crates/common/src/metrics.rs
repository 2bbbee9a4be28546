use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static APPOINTMENTS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pawbook_appointments_created_total",
        "Total appointments booked"
    )
    .expect("register appointments_created_total")
});

pub static APPOINTMENTS_CANCELLED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pawbook_appointments_cancelled_total",
        "Total appointments deleted by owner or staff"
    )
    .expect("register appointments_cancelled_total")
});

pub static APPOINTMENTS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pawbook_appointments_rejected_total",
        "Total bookings rejected by validation or overlap policy"
    )
    .expect("register appointments_rejected_total")
});

pub static LOGINS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("pawbook_logins_total", "Total successful logins")
        .expect("register logins_total")
});

pub static LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("pawbook_login_failures_total", "Total rejected logins")
        .expect("register login_failures_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
