use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use models::user::{AccountStatus, Role};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn repo_err(e: sea_orm::DbErr) -> AuthError { AuthError::Repository(e.to_string()) }

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn tenant_exists(&self, tenant_id: Uuid) -> Result<bool, AuthError> {
        let found = models::tenant::Entity::find_by_id(tenant_id).one(&self.db).await.map_err(repo_err)?;
        Ok(found.is_some())
    }

    async fn find_tenant_by_name(&self, name: &str) -> Result<Option<Uuid>, AuthError> {
        Ok(models::tenant::find_by_name(&self.db, name).await?.map(|t| t.id))
    }

    async fn create_tenant(&self, name: &str) -> Result<Uuid, AuthError> {
        Ok(models::tenant::create(&self.db, name).await?.id)
    }

    async fn find_user(&self, tenant_id: Uuid, username: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(models::user::find_by_username(&self.db, tenant_id, username).await?.map(AuthUser::from))
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::Entity::find_by_id(user_id).one(&self.db).await.map_err(repo_err)?;
        Ok(res.map(AuthUser::from))
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
        // dropping `txn` on an early return rolls the user insert back
        let txn = self.db.begin().await.map_err(repo_err)?;
        let created = models::user::create(&txn, tenant_id, username, email, role).await?;
        models::user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm).await?;
        txn.commit().await.map_err(repo_err)?;
        Ok(created.into())
    }

    async fn deactivate_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        let mut am: models::user::ActiveModel = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| AuthError::NotFound("user not found".into()))?
            .into();
        am.is_active = Set(false);
        am.status = Set(AccountStatus::Blocked.as_str().to_string());
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(repo_err)?;
        Ok(())
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm).await?;
        Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
    }

    async fn record_login(&self, user: &AuthUser) -> Result<(), AuthError> {
        let model = models::user::Entity::find_by_id(user.id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| AuthError::NotFound("user not found".into()))?;
        models::login_activity::record(&self.db, &model).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::ConnectionTrait;

    use super::*;
    use crate::auth::domain::{LoginInput, RegisterUserInput};
    use crate::auth::service::{AuthConfig, AuthService};
    use crate::test_support::get_db;

    fn service(db: &DatabaseConnection) -> AuthService<SeaOrmAuthRepository> {
        let cfg = AuthConfig { jwt_secret: "repo-test-secret".into(), token_ttl_hours: 1, password_algorithm: "argon2id".into() };
        AuthService::new(Arc::new(SeaOrmAuthRepository { db: db.clone() }), cfg)
    }

    fn signup(tenant_id: Uuid) -> RegisterUserInput {
        RegisterUserInput { tenant_id, username: "fern".into(), email: "fern@example.com".into(), password: "Passw0rd!".into() }
    }

    #[tokio::test]
    async fn failed_credential_write_leaves_no_account() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let tenant = models::tenant::create(&db, "Rollback Vets").await?;
        db.execute_unprepared(
            "CREATE TRIGGER reject_credentials BEFORE INSERT ON user_credentials \
             BEGIN SELECT RAISE(ABORT, 'credentials unavailable'); END;",
        )
        .await?;

        let svc = service(&db);
        let err = svc.register_user(signup(tenant.id)).await.unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)), "{err:?}");
        assert!(models::user::find_by_username(&db, tenant.id, "fern").await?.is_none());

        db.execute_unprepared("DROP TRIGGER reject_credentials;").await?;
        svc.register_user(signup(tenant.id)).await?;
        let session = svc
            .login(LoginInput { tenant_id: tenant.id, username: "fern".into(), password: "Passw0rd!".into() })
            .await?;
        assert_eq!(session.user.username, "fern");
        Ok(())
    }
}
