mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{build_app, new_service, new_tenant, new_user, send};

#[tokio::test]
async fn non_staff_cannot_manage_catalog() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Catalog").await?;
    let user = new_user(&app, &tenant.id, "shopper").await?;

    let (status, _) = send(&app, "POST", "/services/", Some(&user), Some(json!({"name": "Bath", "duration_minutes": 30, "cost_cents": 100}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", "/inventory/", Some(&user), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "POST", "/services/", Some(&tenant.admin_token), Some(json!({"name": "Bath", "duration_minutes": 0, "cost_cents": 100}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    Ok(())
}

#[tokio::test]
async fn service_and_product_lifecycle() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Lifecycle").await?;
    let user = new_user(&app, &tenant.id, "viewer").await?;
    let id = new_service(&app, &tenant.admin_token, "Nails", 15, 800).await?;

    let (status, list) = send(&app, "GET", "/services/", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, "PATCH", &format!("/services/{id}/toggle/"), Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availability"], false);

    let (status, body) = send(&app, "PUT", &format!("/services/{id}/"), Some(&tenant.admin_token), Some(json!({"name": "Nail Trim", "duration_minutes": 20, "cost_cents": 900}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost_cents"], 900);

    let (status, _) = send(&app, "DELETE", &format!("/services/{id}/"), Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/services/{id}/"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, product) = send(&app, "POST", "/products/", Some(&tenant.admin_token), Some(json!({"name": "Kibble", "price_cents": 1299, "stocks": 4}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["category"], "Food");
    assert_eq!(product["unit_of_measure"], "piece");
    let (status, inv) = send(&app, "GET", "/inventory/", Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inv[0]["stocks"], 4);
    Ok(())
}

#[tokio::test]
async fn order_total_equals_service_cost() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Orders").await?;
    let user = new_user(&app, &tenant.id, "buyer").await?;
    let other = new_user(&app, &tenant.id, "other").await?;
    let service = new_service(&app, &tenant.admin_token, "Deluxe", 120, 7250).await?;

    let (status, order) = send(&app, "POST", "/orders/", Some(&user), Some(json!({"service": service, "total_cost_cents": 1}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_cost_cents"], 7250);
    assert_eq!(order["status"], "Pending");
    send(&app, "POST", "/orders/", Some(&other), Some(json!({"service": service}))).await?;

    let (_, mine) = send(&app, "GET", "/orders/", Some(&user), None).await?;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    let (_, all) = send(&app, "GET", "/orders/", Some(&tenant.admin_token), None).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn feedback_rating_bounds_and_public_gallery() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Reviews").await?;
    let user = new_user(&app, &tenant.id, "critic").await?;

    let (status, body) = send(&app, "POST", "/feedback/", Some(&user), Some(json!({"rating": 6, "feedback_text": "too good"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["rating"].is_array());

    let (status, body) = send(&app, "POST", "/feedback/", Some(&user), Some(json!({"feedback_text": "no rating"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["rating"][0], "This field is required.");

    let (status, _) = send(&app, "POST", "/feedback/", Some(&user), Some(json!({"rating": 5, "feedback_text": "lovely"}))).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, wall) = send(&app, "GET", &format!("/feedback/gallery/?tenant_id={}", tenant.id), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wall[0]["feedback_text"], "lovely");
    assert_eq!(wall[0]["username"], "critic");
    Ok(())
}

#[tokio::test]
async fn pets_are_staff_managed() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let tenant = new_tenant(&app, "Pets").await?;
    let user = new_user(&app, &tenant.id, "owner").await?;
    let pet = json!({"pet_name": "Rex", "pet_breed": "Corgi", "age": "6 Months"});

    let (status, _) = send(&app, "POST", "/pets/", Some(&user), Some(pet.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, "POST", "/pets/", Some(&tenant.admin_token), Some(pet)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap_or_default().to_string();

    let (_, mine) = send(&app, "GET", "/pets/", Some(&user), None).await?;
    assert_eq!(mine.as_array().map(Vec::len), Some(0));
    let (status, _) = send(&app, "DELETE", &format!("/pets/{id}/"), Some(&tenant.admin_token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}
