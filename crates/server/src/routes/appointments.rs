use axum::{extract::{Path, State}, http::StatusCode, Extension, Json};
use uuid::Uuid;

use service::authz::Actor;
use service::booking::{self, AppointmentView, CreateAppointment};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/appointments/", tag = "appointments", request_body = crate::openapi::CreateAppointmentRequest, responses((status = 201, description = "Booked"), (status = 400, description = "Field errors"), (status = 409, description = "Slot overlaps an existing booking")))]
pub async fn create(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(input): ApiJson<CreateAppointment>) -> Result<(StatusCode, Json<AppointmentView>), JsonApiError> {
    let created = booking::service::create(&state.db, state.booking, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/appointments/booked/", tag = "appointments", responses((status = 200, description = "Confirmed bookings, earliest first")))]
pub async fn booked(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<AppointmentView>>, JsonApiError> {
    Ok(Json(booking::service::list_booked(&state.db, &actor).await?))
}

#[utoipa::path(get, path = "/appointments/my-upcoming/", tag = "appointments", responses((status = 200, description = "Caller's future confirmed bookings")))]
pub async fn my_upcoming(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<AppointmentView>>, JsonApiError> {
    Ok(Json(booking::service::list_my_upcoming(&state.db, &actor).await?))
}

#[utoipa::path(get, path = "/appointments/all/", tag = "appointments", responses((status = 200, description = "Every booking in the tenant"), (status = 403, description = "Staff only")))]
pub async fn all(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<Vec<AppointmentView>>, JsonApiError> {
    Ok(Json(booking::service::list_all(&state.db, &actor).await?))
}

#[utoipa::path(delete, path = "/appointments/{id}/", tag = "appointments", params(("id" = Uuid, Path, description = "Appointment id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Not the owner"), (status = 404, description = "Not Found")))]
pub async fn cancel(State(state): State<ServerState>, Extension(actor): Extension<Actor>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    booking::service::cancel(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
