use axum::{extract::{Path, State}, http::StatusCode, Extension, Json};
use uuid::Uuid;

use models::catalog::ServiceFields;
use models::product::ProductFields;
use models::{catalog, product};
use service::authz::Actor;
use service::{catalog_service, inventory_service};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/services/", tag = "catalog", responses((status = 200, description = "Services, newest first")))]
pub async fn list_services(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<catalog::Model>>, JsonApiError> {
    Ok(Json(catalog_service::list_services(&state.db, &actor).await?))
}

#[utoipa::path(post, path = "/services/", tag = "catalog", request_body = crate::openapi::ServiceRequest, responses((status = 201, description = "Created"), (status = 403, description = "Staff only")))]
pub async fn create_service(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(fields): ApiJson<ServiceFields>) -> Result<(StatusCode, Json<catalog::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(catalog_service::create_service(&state.db, &actor, fields).await?)))
}

#[utoipa::path(get, path = "/services/{id}/", tag = "catalog", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "Service"), (status = 404, description = "Not Found")))]
pub async fn get_service(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<Json<catalog::Model>, JsonApiError> {
    Ok(Json(catalog_service::get_service(&state.db, &actor, id).await?))
}

#[utoipa::path(put, path = "/services/{id}/", tag = "catalog", params(("id" = Uuid, Path, description = "Service id")), request_body = crate::openapi::ServiceRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Staff only")))]
pub async fn update_service(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ApiJson(fields): ApiJson<ServiceFields>,
) -> Result<Json<catalog::Model>, JsonApiError> {
    Ok(Json(catalog_service::update_service(&state.db, &actor, id, fields).await?))
}

#[utoipa::path(patch, path = "/services/{id}/toggle/", tag = "catalog", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "Availability flipped")))]
pub async fn toggle_service(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<Json<catalog::Model>, JsonApiError> {
    Ok(Json(catalog_service::toggle_service(&state.db, &actor, id).await?))
}

#[utoipa::path(delete, path = "/services/{id}/", tag = "catalog", params(("id" = Uuid, Path, description = "Service id")), responses((status = 204, description = "Deleted")))]
pub async fn delete_service(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    catalog_service::delete_service(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/products/", tag = "inventory", responses((status = 200, description = "Products, newest first")))]
pub async fn list_products(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<product::Model>>, JsonApiError> {
    Ok(Json(inventory_service::list_products(&state.db, &actor).await?))
}

#[utoipa::path(get, path = "/inventory/", tag = "inventory", responses((status = 200, description = "Stock levels"), (status = 403, description = "Staff only")))]
pub async fn inventory(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<product::Model>>, JsonApiError> {
    Ok(Json(inventory_service::inventory(&state.db, &actor).await?))
}

#[utoipa::path(post, path = "/products/", tag = "inventory", request_body = crate::openapi::ProductRequest, responses((status = 201, description = "Created"), (status = 403, description = "Staff only")))]
pub async fn create_product(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(fields): ApiJson<ProductFields>) -> Result<(StatusCode, Json<product::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(inventory_service::create_product(&state.db, &actor, fields).await?)))
}

#[utoipa::path(get, path = "/products/{id}/", tag = "inventory", params(("id" = Uuid, Path, description = "Product id")), responses((status = 200, description = "Product"), (status = 404, description = "Not Found")))]
pub async fn get_product(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(inventory_service::get_product(&state.db, &actor, id).await?))
}

#[utoipa::path(put, path = "/products/{id}/", tag = "inventory", params(("id" = Uuid, Path, description = "Product id")), request_body = crate::openapi::ProductRequest, responses((status = 200, description = "Updated")))]
pub async fn update_product(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ApiJson(fields): ApiJson<ProductFields>,
) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(inventory_service::update_product(&state.db, &actor, id, fields).await?))
}

#[utoipa::path(patch, path = "/products/{id}/toggle/", tag = "inventory", params(("id" = Uuid, Path, description = "Product id")), responses((status = 200, description = "Availability flipped")))]
pub async fn toggle_product(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(inventory_service::toggle_product(&state.db, &actor, id).await?))
}

#[utoipa::path(delete, path = "/products/{id}/", tag = "inventory", params(("id" = Uuid, Path, description = "Product id")), responses((status = 204, description = "Deleted")))]
pub async fn delete_product(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    inventory_service::delete_product(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
