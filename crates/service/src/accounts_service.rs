//! Staff-facing account management: login log, block toggle, profiles.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::login_activity;
use models::user::{self, AccountStatus, Role};

use crate::authz::{Actor, Permission};
use crate::errors::ServiceError;
use crate::pagination::Pagination;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub branch: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for ProfileView {
    fn from(u: user::Model) -> Self {
        let is_staff = u.is_staff();
        Self {
            id: u.id,
            tenant_id: u.tenant_id,
            username: u.username,
            email: u.email,
            role: u.role,
            status: u.status,
            branch: u.branch,
            is_active: u.is_active,
            is_staff,
            created_at: u.created_at.with_timezone(&Utc),
        }
    }
}

/// One login event joined with the account's current role and status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginLogView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub status: String,
    pub login_time: DateTime<Utc>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub role: Option<String>,
    pub branch: Option<String>,
    pub status: Option<String>,
}

async fn find_in_tenant(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .filter(user::Column::TenantId.eq(tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

pub async fn me(db: &DatabaseConnection, actor: &Actor) -> Result<ProfileView, ServiceError> {
    Ok(find_in_tenant(db, actor.tenant_id, actor.user_id).await?.into())
}

/// Login history for the tenant, newest first.
pub async fn login_logs(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<Vec<LoginLogView>, ServiceError> {
    actor.require(Permission::ViewLoginActivity)?;
    let (page_idx, per_page) = opts.window();
    let rows = login_activity::Entity::find()
        .filter(login_activity::Column::TenantId.eq(actor.tenant_id))
        .order_by_desc(login_activity::Column::LoginTime)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;

    let user_ids: Vec<Uuid> = rows.iter().map(|r| r.user_id).collect();
    let users: std::collections::HashMap<Uuid, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let u = users.get(&r.user_id)?;
            let status = if u.is_active { AccountStatus::Active } else { AccountStatus::Blocked };
            Some(LoginLogView {
                id: r.id,
                user_id: r.user_id,
                username: u.username.clone(),
                role: u.role.clone(),
                status: status.as_str().to_string(),
                login_time: r.login_time.with_timezone(&Utc),
            })
        })
        .collect())
}

/// Flip an account between active and blocked. Returns the confirmation message.
#[instrument(skip(db, actor), fields(actor = %actor.username))]
pub async fn toggle_block(db: &DatabaseConnection, actor: &Actor, username: &str) -> Result<String, ServiceError> {
    actor.require(Permission::BlockUsers)?;
    let target = user::find_by_username(db, actor.tenant_id, username)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if target.id == actor.user_id {
        return Err(ServiceError::Forbidden("You cannot block your own account.".into()));
    }

    let now_active = !target.is_active;
    let status = if now_active { AccountStatus::Active } else { AccountStatus::Blocked };
    let name = target.username.clone();
    let mut am: user::ActiveModel = target.into();
    am.is_active = Set(now_active);
    am.status = Set(status.as_str().to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;

    let verb = if now_active { "unblocked" } else { "blocked" };
    info!(target = %name, verb, "account_block_toggled");
    Ok(format!("{name} has been {verb}"))
}

/// Every profile in the tenant.
pub async fn list_staff(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<ProfileView>, ServiceError> {
    actor.require(Permission::ManageStaff)?;
    let rows = user::Entity::find()
        .filter(user::Column::TenantId.eq(actor.tenant_id))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ProfileView::from).collect())
}

#[instrument(skip(db, actor, patch), fields(actor = %actor.username))]
pub async fn update_profile(db: &DatabaseConnection, actor: &Actor, id: Uuid, patch: UpdateProfile) -> Result<ProfileView, ServiceError> {
    actor.require(Permission::ManageStaff)?;
    let role = patch.role.as_deref().map(str::parse::<Role>).transpose()?;
    let status = patch.status.as_deref().map(str::parse::<AccountStatus>).transpose()?;
    if let Some(branch) = patch.branch.as_deref() {
        user::validate_branch(branch)?;
    }

    let target = find_in_tenant(db, actor.tenant_id, id).await?;
    let mut am: user::ActiveModel = target.into();
    if let Some(role) = role {
        am.role = Set(role.as_str().to_string());
    }
    if let Some(status) = status {
        am.status = Set(status.as_str().to_string());
        am.is_active = Set(status == AccountStatus::Active);
    }
    if let Some(branch) = patch.branch {
        am.branch = Set(Some(branch).filter(|b| !b.trim().is_empty()));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(user_id = %updated.id, role = %updated.role, status = %updated.status, "profile_updated");
    Ok(updated.into())
}

/// Remove an account and everything it exclusively owns.
#[instrument(skip(db, actor), fields(actor = %actor.username))]
pub async fn delete_user(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManageStaff)?;
    if id == actor.user_id {
        return Err(ServiceError::Forbidden("You cannot delete your own account.".into()));
    }
    let target = find_in_tenant(db, actor.tenant_id, id).await?;
    user::hard_delete(db, target.id).await?;
    info!(user_id = %id, username = %target.username, "user_deleted");
    Ok(())
}
