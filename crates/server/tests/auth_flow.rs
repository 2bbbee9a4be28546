mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::Service;
use uuid::Uuid;

use support::{build_app, login, new_tenant, new_user, send, PASSWORD};

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Happy Paws").await?;

    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"tenant_id": tenant.id, "username": "admin", "password": PASSWORD}))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    // Must set cookie
    let cookie = resp.headers().get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));

    let (status, me) = send(&app, "GET", "/auth/me", Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");
    assert_eq!(me["role"], "admin");
    assert_eq!(me["is_staff"], true);
    Ok(())
}

#[tokio::test]
async fn test_cookie_is_accepted_instead_of_bearer() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Cookie Clinic").await?;

    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("cookie", format!("auth_token={}", tenant.admin_token))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_missing_or_bad_token_is_401() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let (status, body) = send(&app, "GET", "/appointments/booked/", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    let (status, _) = send(&app, "GET", "/appointments/booked/", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Wrong Pass").await?;
    let (status, _) = send(&app, "POST", "/auth/login", None, Some(json!({"tenant_id": tenant.id, "username": "admin", "password": "wrong-password"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let (status, body) = send(&app, "POST", "/auth/register/admin", None, Some(json!({
        "tenant_name": "Short", "username": "a", "email": "a@b.com", "password": "short"
    }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn test_register_user_rules() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let (status, _) = send(&app, "POST", "/auth/register/user", None, Some(json!({
        "tenant_id": Uuid::new_v4(), "username": "lost", "password": PASSWORD
    }))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let tenant = new_tenant(&app, "Dupes").await?;
    new_user(&app, &tenant.id, "sam").await?;
    let (status, _) = send(&app, "POST", "/auth/register/user", None, Some(json!({
        "tenant_id": tenant.id, "username": "sam", "password": PASSWORD
    }))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_blocked_user_cannot_login_or_use_old_token() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Blockers").await?;
    let token = new_user(&app, &tenant.id, "mallory").await?;

    let (status, body) = send(&app, "POST", "/block-user/mallory/", Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "mallory has been blocked");

    let (status, _) = send(&app, "POST", "/auth/login", None, Some(json!({"tenant_id": tenant.id, "username": "mallory", "password": PASSWORD}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(&app, "POST", "/block-user/mallory/", Some(&tenant.admin_token), None).await?;
    assert_eq!(body["message"], "mallory has been unblocked");
    login(&app, &tenant.id, "mallory").await?;
    Ok(())
}

#[tokio::test]
async fn test_change_password_and_deactivate() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Self Service").await?;
    let token = new_user(&app, &tenant.id, "carol").await?;

    let (status, _) = send(&app, "POST", "/auth/change-password", Some(&token), Some(json!({"new_password": ""}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "POST", "/auth/change-password", Some(&token), Some(json!({"new_password": "An0therPass"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/auth/login", None, Some(json!({"tenant_id": tenant.id, "username": "carol", "password": "An0therPass"}))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/auth/deactivate", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_staff_management() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Staffing").await?;
    let user_token = new_user(&app, &tenant.id, "dave").await?;

    let (status, _) = send(&app, "GET", "/users/staff/", Some(&user_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, staff) = send(&app, "GET", "/users/staff/", Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let staff = staff.as_array().cloned().unwrap_or_default();
    assert_eq!(staff.len(), 2);
    let admin_id = staff.iter().find(|p| p["username"] == "admin").map(|p| p["id"].as_str().unwrap_or_default().to_string()).unwrap_or_default();
    let dave_id = staff.iter().find(|p| p["username"] == "dave").map(|p| p["id"].as_str().unwrap_or_default().to_string()).unwrap_or_default();

    let (status, _) = send(&app, "PATCH", &format!("/users/{dave_id}/update-profile/"), Some(&tenant.admin_token), Some(json!({"role": "wizard"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(&app, "PATCH", &format!("/users/{dave_id}/update-profile/"), Some(&tenant.admin_token), Some(json!({"role": "manager", "branch": "North"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "manager");

    // promotion applies to the token already issued
    let (status, _) = send(&app, "GET", "/users/staff/", Some(&user_token), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/users/{admin_id}/"), Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &format!("/users/{dave_id}/"), Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/users/{dave_id}/"), Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, logs) = send(&app, "GET", "/logs/?per_page=50", Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(logs.as_array().map(|l| !l.is_empty()).unwrap_or(false));
    Ok(())
}
