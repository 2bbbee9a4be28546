use async_trait::async_trait;
use uuid::Uuid;

use models::user::Role;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn tenant_exists(&self, tenant_id: Uuid) -> Result<bool, AuthError>;
    async fn find_tenant_by_name(&self, name: &str) -> Result<Option<Uuid>, AuthError>;
    async fn create_tenant(&self, name: &str) -> Result<Uuid, AuthError>;

    async fn find_user(&self, tenant_id: Uuid, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    /// Inserts the account together with its password hash; neither row is kept if the other fails.
    async fn create_user(
        &self,
        tenant_id: Uuid,
        username: &str,
        email: &str,
        role: Role,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError>;
    /// Marks the account inactive and blocked.
    async fn deactivate_user(&self, user_id: Uuid) -> Result<(), AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;

    async fn record_login(&self, user: &AuthUser) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockAuthRepository {
        tenants: Mutex<HashMap<Uuid, String>>,
        users: Mutex<HashMap<Uuid, AuthUser>>,
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
        logins: Mutex<Vec<Uuid>>,
    }

    fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AuthError> {
        m.lock().map_err(|_| AuthError::Repository("mock lock poisoned".into()))
    }

    impl MockAuthRepository {
        /// Number of recorded logins.
        pub fn login_count(&self) -> usize {
            self.logins.lock().map(|l| l.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn tenant_exists(&self, tenant_id: Uuid) -> Result<bool, AuthError> {
            Ok(lock(&self.tenants)?.contains_key(&tenant_id))
        }

        async fn find_tenant_by_name(&self, name: &str) -> Result<Option<Uuid>, AuthError> {
            Ok(lock(&self.tenants)?.iter().find(|(_, n)| n.as_str() == name).map(|(id, _)| *id))
        }

        async fn create_tenant(&self, name: &str) -> Result<Uuid, AuthError> {
            let id = Uuid::new_v4();
            lock(&self.tenants)?.insert(id, name.to_string());
            Ok(id)
        }

        async fn find_user(&self, tenant_id: Uuid, username: &str) -> Result<Option<AuthUser>, AuthError> {
            Ok(lock(&self.users)?.values().find(|u| u.tenant_id == tenant_id && u.username == username).cloned())
        }

        async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            Ok(lock(&self.users)?.get(&user_id).cloned())
        }

        async fn create_user(
            &self,
            tenant_id: Uuid,
            username: &str,
            email: &str,
            role: Role,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<AuthUser, AuthError> {
            let mut users = lock(&self.users)?;
            if users.values().any(|u| u.tenant_id == tenant_id && u.username == username) {
                return Err(AuthError::Conflict("username already taken".into()));
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                tenant_id,
                username: username.to_string(),
                email: email.to_string(),
                role,
                is_active: true,
            };
            lock(&self.creds)?.insert(user.id, Credentials { user_id: user.id, password_hash, password_algorithm });
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn deactivate_user(&self, user_id: Uuid) -> Result<(), AuthError> {
            let mut users = lock(&self.users)?;
            let user = users.get_mut(&user_id).ok_or_else(|| AuthError::NotFound("user not found".into()))?;
            user.is_active = false;
            Ok(())
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            Ok(lock(&self.creds)?.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let c = Credentials { user_id, password_hash, password_algorithm };
            lock(&self.creds)?.insert(user_id, c.clone());
            Ok(c)
        }

        async fn record_login(&self, user: &AuthUser) -> Result<(), AuthError> {
            lock(&self.logins)?.push(user.id);
            Ok(())
        }
    }
}
