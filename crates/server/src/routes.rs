use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod accounts;
pub mod appointments;
pub mod auth;
pub mod care;
pub mod catalog;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition of the default registry.
pub async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}

/// Build the full application router: public routes, token-protected routes and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/auth/register/admin", post(auth::register_admin))
        .route("/auth/register/user", post(auth::register_user))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/feedback/gallery/", get(care::gallery));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/change-password", post(auth::change_password))
        .route("/auth/deactivate", post(auth::deactivate))
        .route("/logs/", get(accounts::login_logs))
        .route("/block-user/:username/", post(accounts::block_user))
        .route("/users/staff/", get(accounts::staff))
        .route("/users/:id/update-profile/", patch(accounts::update_profile))
        .route("/users/:id/", delete(accounts::delete_user))
        .route("/services/", get(catalog::list_services).post(catalog::create_service))
        .route(
            "/services/:id/",
            get(catalog::get_service).put(catalog::update_service).delete(catalog::delete_service),
        )
        .route("/services/:id/toggle/", patch(catalog::toggle_service))
        .route("/products/", get(catalog::list_products).post(catalog::create_product))
        .route(
            "/products/:id/",
            get(catalog::get_product).put(catalog::update_product).delete(catalog::delete_product),
        )
        .route("/products/:id/toggle/", patch(catalog::toggle_product))
        .route("/inventory/", get(catalog::inventory))
        .route("/orders/", get(care::list_orders).post(care::create_order))
        .route("/pets/", get(care::list_pets).post(care::create_pet))
        .route("/pets/:id/", delete(care::delete_pet))
        .route("/feedback/", post(care::submit_feedback))
        .route("/appointments/", post(appointments::create))
        .route("/appointments/booked/", get(appointments::booked))
        .route("/appointments/my-upcoming/", get(appointments::my_upcoming))
        .route("/appointments/all/", get(appointments::all))
        .route("/appointments/:id/", delete(appointments::cancel))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
