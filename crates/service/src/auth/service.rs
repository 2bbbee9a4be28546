use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, warn, instrument};
use uuid::Uuid;

use models::user::{self, Role};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterAdminInput, RegisterUserInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl_hours: cfg.token_ttl_hours, password_algorithm: "argon2id".into() }
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("password required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create a tenant and its first administrator.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterAdminInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12, password_algorithm: "argon2id".into() });
    /// let input = RegisterAdminInput { tenant_name: "Happy Paws".into(), username: "owner".into(), email: "owner@example.com".into(), password: "Secret123".into() };
    /// let admin = tokio_test::block_on(svc.register_admin(input)).unwrap();
    /// assert_eq!(admin.role, models::user::Role::Admin);
    /// ```
    #[instrument(skip(self, input), fields(tenant = %input.tenant_name, username = %input.username))]
    pub async fn register_admin(&self, input: RegisterAdminInput) -> Result<AuthUser, AuthError> {
        models::tenant::validate_name(&input.tenant_name)?;
        user::validate_username(&input.username)?;
        user::validate_email(&input.email)?;
        validate_password(&input.password)?;
        if self.repo.find_tenant_by_name(input.tenant_name.trim()).await?.is_some() {
            return Err(AuthError::Conflict("tenant name already taken".into()));
        }

        let tenant_id = self.repo.create_tenant(&input.tenant_name).await?;
        let user = self.create_account(tenant_id, &input.username, &input.email, &input.password, Role::Admin).await?;
        info!(user_id = %user.id, tenant_id = %tenant_id, "admin_registered");
        Ok(user)
    }

    /// Register a regular user inside an existing tenant.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterAdminInput, RegisterUserInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12, password_algorithm: "argon2id".into() });
    /// let admin = tokio_test::block_on(svc.register_admin(RegisterAdminInput { tenant_name: "T".into(), username: "boss".into(), email: String::new(), password: "Passw0rd!".into() })).unwrap();
    /// let input = RegisterUserInput { tenant_id: admin.tenant_id, username: "jane".into(), email: "jane@example.com".into(), password: "Passw0rd!".into() };
    /// let user = tokio_test::block_on(svc.register_user(input)).unwrap();
    /// assert!(!user.role.is_staff());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, tenant_id = %input.tenant_id))]
    pub async fn register_user(&self, input: RegisterUserInput) -> Result<AuthUser, AuthError> {
        user::validate_username(&input.username)?;
        user::validate_email(&input.email)?;
        validate_password(&input.password)?;
        if !self.repo.tenant_exists(input.tenant_id).await? {
            return Err(AuthError::NotFound("tenant not found".into()));
        }
        let user = self.create_account(input.tenant_id, &input.username, &input.email, &input.password, Role::User).await?;
        info!(user_id = %user.id, tenant_id = %user.tenant_id, "user_registered");
        Ok(user)
    }

    async fn create_account(&self, tenant_id: Uuid, username: &str, email: &str, password: &str, role: Role) -> Result<AuthUser, AuthError> {
        if let Some(existing) = self.repo.find_user(tenant_id, username.trim()).await? {
            debug!("user exists: {}", existing.username);
            return Err(AuthError::Conflict("username already taken".into()));
        }
        let hash = hash_password(password)?;
        self.repo.create_user(tenant_id, username, email, role, hash, self.cfg.password_algorithm.clone()).await
    }

    /// Authenticate a user and issue an access token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterAdminInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12, password_algorithm: "argon2id".into() });
    /// let admin = tokio_test::block_on(svc.register_admin(RegisterAdminInput { tenant_name: "T".into(), username: "u".into(), email: String::new(), password: "Passw0rd".into() })).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { tenant_id: admin.tenant_id, username: "u".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "u");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, tenant_id = %input.tenant_id))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user(input.tenant_id, input.username.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        if !user.is_active {
            warn!(user_id = %user.id, "login refused for inactive account");
            return Err(AuthError::Inactive);
        }

        self.repo.record_login(&user).await?;
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: user.username.clone(), uid: user.id, tid: user.tenant_id, role: user.role, exp };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(data.claims)
    }

    /// Resolve a bearer token to the current state of its account.
    ///
    /// Role and active flag come from storage, not from the token, so a block
    /// or role change applies to tokens already issued.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify_token(token)?;
        let user = self.repo
            .find_user_by_id(claims.uid)
            .await?
            .filter(|u| u.tenant_id == claims.tid)
            .ok_or_else(|| AuthError::InvalidToken("account no longer exists".into()))?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }

    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, user_id: Uuid, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        self.repo.upsert_password(user_id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user_id, "password_changed");
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn deactivate(&self, user: &AuthUser) -> Result<(), AuthError> {
        if !user.is_active {
            return Err(AuthError::Validation("account is already inactive".into()));
        }
        self.repo.deactivate_user(user.id).await?;
        info!("account_deactivated");
        Ok(())
    }
}
