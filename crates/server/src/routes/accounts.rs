use axum::{extract::{Path, Query, State}, http::StatusCode, Extension, Json};
use uuid::Uuid;

use common::types::Message;
use service::accounts_service::{self, LoginLogView, ProfileView, UpdateProfile};
use service::authz::Actor;
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/logs/", tag = "accounts", params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Page size, at most 100")), responses((status = 200, description = "Login activity, newest first"), (status = 403, description = "Staff only")))]
pub async fn login_logs(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Query(page): Query<Pagination>) -> Result<Json<Vec<LoginLogView>>, JsonApiError> {
    Ok(Json(accounts_service::login_logs(&state.db, &actor, page).await?))
}

#[utoipa::path(post, path = "/block-user/{username}/", tag = "accounts", params(("username" = String, Path, description = "Account to toggle")), responses((status = 200, description = "Toggled"), (status = 404, description = "Unknown user")))]
pub async fn block_user(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(username): Path<String>) -> Result<Json<Message>, JsonApiError> {
    let msg = accounts_service::toggle_block(&state.db, &actor, &username).await?;
    Ok(Json(Message::new(msg)))
}

#[utoipa::path(get, path = "/users/staff/", tag = "accounts", responses((status = 200, description = "Every profile in the tenant"), (status = 403, description = "Staff only")))]
pub async fn staff(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<ProfileView>>, JsonApiError> {
    Ok(Json(accounts_service::list_staff(&state.db, &actor).await?))
}

#[utoipa::path(patch, path = "/users/{id}/update-profile/", tag = "accounts", params(("id" = Uuid, Path, description = "User id")), request_body = crate::openapi::UpdateProfileRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Invalid role or status")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ApiJson(patch): ApiJson<UpdateProfile>,
) -> Result<Json<ProfileView>, JsonApiError> {
    Ok(Json(accounts_service::update_profile(&state.db, &actor, id, patch).await?))
}

#[utoipa::path(delete, path = "/users/{id}/", tag = "accounts", params(("id" = Uuid, Path, description = "User id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Self-deletion or not staff"), (status = 404, description = "Not Found")))]
pub async fn delete_user(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    accounts_service::delete_user(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
