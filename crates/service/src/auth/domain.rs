use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::Role;

/// Creates a tenant together with its first administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAdminInput {
    pub tenant_name: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

/// Joins an existing tenant as a regular user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserInput {
    pub tenant_id: Uuid,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub tenant_id: Uuid,
    pub username: String,
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<models::user::Model> for AuthUser {
    fn from(u: models::user::Model) -> Self {
        let role = u.role();
        Self { id: u.id, tenant_id: u.tenant_id, username: u.username, email: u.email, role, is_active: u.is_active }
    }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub tid: Uuid,
    pub role: Role,
    pub exp: usize,
}
