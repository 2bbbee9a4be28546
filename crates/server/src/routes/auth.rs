use std::sync::Arc;

use axum::{extract::{Request, State}, http::{header, StatusCode}, middleware::Next, response::Response, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use common::metrics::{LOGINS_TOTAL, LOGIN_FAILURES_TOTAL};
use common::types::Message;
use service::accounts_service::{self, ProfileView};
use service::auth::domain::{AuthUser, LoginInput, RegisterAdminInput, RegisterUserInput};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::authz::Actor;
use service::booking::BookingPolicy;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: AuthConfig,
    pub booking: BookingPolicy,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        AuthService::new(Arc::new(SeaOrmAuthRepository { db: self.db.clone() }), self.auth.clone())
    }
}

#[derive(Serialize)]
pub struct RegisterOutput { pub user_id: Uuid, pub tenant_id: Uuid, pub username: String, pub role: String }

impl From<AuthUser> for RegisterOutput {
    fn from(u: AuthUser) -> Self {
        Self { user_id: u.id, tenant_id: u.tenant_id, username: u.username, role: u.role.as_str().to_string() }
    }
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_staff: bool,
    pub access: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordInput {
    #[serde(default)]
    pub new_password: String,
}

#[utoipa::path(post, path = "/auth/register/admin", tag = "auth", request_body = crate::openapi::RegisterAdminRequest, responses((status = 201, description = "Tenant and admin created"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register_admin(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterAdminInput>) -> Result<(StatusCode, Json<RegisterOutput>), JsonApiError> {
    let user = state.auth_service().register_admin(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(post, path = "/auth/register/user", tag = "auth", request_body = crate::openapi::RegisterUserRequest, responses((status = 201, description = "User created"), (status = 400, description = "Bad Request"), (status = 404, description = "Unknown tenant"), (status = 409, description = "Conflict")))]
pub async fn register_user(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterUserInput>) -> Result<(StatusCode, Json<RegisterOutput>), JsonApiError> {
    let user = state.auth_service().register_user(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

fn auth_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, ApiJson(input): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = match state.auth_service().login(input).await {
        Ok(s) => s,
        Err(e) => {
            LOGIN_FAILURES_TOTAL.inc();
            return Err(e.into());
        }
    };
    LOGINS_TOTAL.inc();
    let user = session.user;
    let jar = jar.add(auth_cookie(session.token.clone()));
    let out = LoginOutput {
        user_id: user.id,
        username: user.username,
        email: user.email,
        role: user.role.as_str().to_string(),
        is_staff: user.role.is_staff(),
        access: session.token,
    };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current profile"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<ProfileView>, JsonApiError> {
    Ok(Json(accounts_service::me(&state.db, &actor).await?))
}

#[utoipa::path(post, path = "/auth/change-password", tag = "auth", request_body = crate::openapi::ChangePasswordRequest, responses((status = 200, description = "Password changed"), (status = 400, description = "Bad Request")))]
pub async fn change_password(State(state): State<ServerState>, Extension(actor): Extension<Actor>, ApiJson(input): ApiJson<ChangePasswordInput>) -> Result<Json<Message>, JsonApiError> {
    state.auth_service().change_password(actor.user_id, &input.new_password).await?;
    Ok(Json(Message::new("Password changed successfully.")))
}

#[utoipa::path(post, path = "/auth/deactivate", tag = "auth", responses((status = 200, description = "Account deactivated"), (status = 400, description = "Already inactive")))]
pub async fn deactivate(State(state): State<ServerState>, Extension(user): Extension<AuthUser>, jar: CookieJar) -> Result<(CookieJar, Json<Message>), JsonApiError> {
    state.auth_service().deactivate(&user).await?;
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    Ok((jar.remove(cookie), Json(Message::new("Account deactivated."))))
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
fn extract_token(req: &Request) -> Result<String, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => Err(JsonApiError::unauthorized("Authorization header must be 'Bearer <token>'")),
        };
    }
    CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| JsonApiError::unauthorized("Authentication credentials were not provided."))
}

/// Bad or stale credentials are a 401; storage and crypto failures keep their 500.
fn authentication_failure(e: AuthError) -> JsonApiError {
    match e {
        AuthError::Unauthorized | AuthError::Inactive | AuthError::InvalidToken(_) | AuthError::NotFound(_) => {
            JsonApiError::unauthorized("Invalid or expired token.")
        }
        other => other.into(),
    }
}

/// Resolves the caller and stores both the [`Actor`] and the full [`AuthUser`] in request extensions.
pub async fn require_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let token = extract_token(&req).map_err(|e| {
        warn!(path = %path, "missing credentials");
        e
    })?;
    let user = state.auth_service().authenticate(&token).await.map_err(|e| {
        warn!(path = %path, code = e.code(), err = %e, "token rejected");
        authentication_failure(e)
    })?;
    req.extensions_mut().insert(Actor::from(user.clone()));
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
