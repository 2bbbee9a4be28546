#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, AuthConfig, BookingConfig, DatabaseConfig};
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;

pub const PASSWORD: &str = "S3curePass!";

pub fn test_config(reject_overlaps: bool) -> AppConfig {
    AppConfig {
        database: DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() },
        auth: AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1 },
        booking: BookingConfig { reject_overlaps },
        ..AppConfig::default()
    }
}

/// Router over a private in-memory database.
pub async fn build_app(reject_overlaps: bool) -> anyhow::Result<Router> {
    let cfg = test_config(reject_overlaps);
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(server::startup::build_app(server::startup::build_state(&cfg, db)))
}

/// Fire one request and decode the JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, value))
}

pub struct Tenant {
    pub id: String,
    pub admin_token: String,
}

/// Register a tenant with its admin and log the admin in.
pub async fn new_tenant(app: &Router, name: &str) -> anyhow::Result<Tenant> {
    let (status, body) = send(app, "POST", "/auth/register/admin", None, Some(json!({
        "tenant_name": name,
        "username": "admin",
        "email": "admin@example.com",
        "password": PASSWORD,
    }))).await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["tenant_id"].as_str().unwrap_or_default().to_string();
    let admin_token = login(app, &id, "admin").await?;
    Ok(Tenant { id, admin_token })
}

/// Register a plain user in `tenant_id` and return its token.
pub async fn new_user(app: &Router, tenant_id: &str, username: &str) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/auth/register/user", None, Some(json!({
        "tenant_id": tenant_id,
        "username": username,
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
    }))).await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    login(app, tenant_id, username).await
}

pub async fn login(app: &Router, tenant_id: &str, username: &str) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/auth/login", None, Some(json!({
        "tenant_id": tenant_id,
        "username": username,
        "password": PASSWORD,
    }))).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body["access"].as_str().unwrap_or_default().to_string())
}

/// Create a service as staff and return its id.
pub async fn new_service(app: &Router, staff_token: &str, name: &str, duration_minutes: i32, cost_cents: i64) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/services/", Some(staff_token), Some(json!({
        "name": name,
        "description": "test",
        "duration_minutes": duration_minutes,
        "cost_cents": cost_cents,
    }))).await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    Ok(body["id"].as_str().unwrap_or_default().to_string())
}
