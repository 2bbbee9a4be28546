//! Orders, pet profiles and feedback.

use axum::{extract::{Path, Query, State}, http::StatusCode, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use models::pet_profile::{self, PetFields};
use service::authz::Actor;
use service::feedback_service::{self, FeedbackView, SubmitFeedback};
use service::order_service::{self, CreateOrder, OrderView};
use service::pagination::Pagination;
use service::pet_service;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/orders/", tag = "orders", responses((status = 200, description = "Orders, newest first")))]
pub async fn list_orders(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<OrderView>>, JsonApiError> {
    Ok(Json(order_service::list_orders(&state.db, &actor).await?))
}

#[utoipa::path(post, path = "/orders/", tag = "orders", request_body = crate::openapi::CreateOrderRequest, responses((status = 201, description = "Order placed"), (status = 400, description = "Unknown service")))]
pub async fn create_order(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(input): ApiJson<CreateOrder>) -> Result<(StatusCode, Json<OrderView>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(order_service::create_order(&state.db, &actor, input).await?)))
}

#[utoipa::path(get, path = "/pets/", tag = "pets", responses((status = 200, description = "Pet profiles")))]
pub async fn list_pets(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<pet_profile::Model>>, JsonApiError> {
    Ok(Json(pet_service::list_pets(&state.db, &actor).await?))
}

#[utoipa::path(post, path = "/pets/", tag = "pets", request_body = crate::openapi::PetRequest, responses((status = 201, description = "Created"), (status = 403, description = "Staff only")))]
pub async fn create_pet(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(fields): ApiJson<PetFields>) -> Result<(StatusCode, Json<pet_profile::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(pet_service::create_pet(&state.db, &actor, fields).await?)))
}

#[utoipa::path(delete, path = "/pets/{id}/", tag = "pets", params(("id" = Uuid, Path, description = "Pet id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Staff only")))]
pub async fn delete_pet(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    pet_service::delete_pet(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/feedback/", tag = "feedback", request_body = crate::openapi::FeedbackRequest, responses((status = 201, description = "Submitted"), (status = 400, description = "Rating out of range")))]
pub async fn submit_feedback(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(input): ApiJson<SubmitFeedback>) -> Result<(StatusCode, Json<FeedbackView>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(feedback_service::submit(&state.db, &actor, input).await?)))
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub tenant_id: Uuid,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/feedback/gallery/", tag = "feedback", params(("tenant_id" = Uuid, Query, description = "Tenant whose feedback to show"), ("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Page size, at most 100")), responses((status = 200, description = "Public feedback, newest first")))]
pub async fn gallery(State(state): State<ServerState>, Query(q): Query<GalleryQuery>) -> Result<Json<Vec<FeedbackView>>, JsonApiError> {
    Ok(Json(feedback_service::gallery(&state.db, q.tenant_id, Pagination::new(q.page, q.per_page)).await?))
}
