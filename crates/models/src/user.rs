use std::{fmt, str::FromStr};

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::permission::Permission;
use crate::tenant;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub branch: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Tenant,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Tenant => Entity::belongs_to(tenant::Entity).from(Column::TenantId).to(tenant::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored role; unknown strings degrade to the least privileged role.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }

    pub fn is_staff(&self) -> bool { self.role().is_staff() }
}

/// Account role. Managers and admins are "staff".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    pub fn is_staff(&self) -> bool { matches!(self, Role::Manager | Role::Admin) }

    /// Whether this role holds `perm`. Every capability today is staff-only.
    pub fn grants(&self, perm: Permission) -> bool {
        match perm {
            Permission::ManageCatalog
            | Permission::ManageInventory
            | Permission::ManagePets
            | Permission::ViewAllOrders
            | Permission::ViewAllAppointments
            | Permission::CancelAnyAppointment
            | Permission::ManageStaff
            | Permission::ViewLoginActivity
            | Permission::BlockUsers => self.is_staff(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(ModelError::Validation(format!("\"{other}\" is not a valid role"))),
        }
    }
}

/// Profile status shown in staff management.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Blocked => "Blocked",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(AccountStatus::Active),
            "Blocked" => Ok(AccountStatus::Blocked),
            other => Err(ModelError::Validation(format!("\"{other}\" is not a valid status"))),
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    let trimmed = username.trim();
    if trimmed.is_empty() { return Err(ModelError::Validation("username required".into())); }
    if trimmed.chars().count() > 150 { return Err(ModelError::Validation("username too long (<=150)".into())); }
    if !trimmed.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
        return Err(ModelError::Validation("username may contain only letters, digits and @/./+/-/_".into()));
    }
    Ok(())
}

/// Email is optional; when given it must look like an address.
pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if email.is_empty() { return Ok(()); }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_branch(branch: &str) -> Result<(), errors::ModelError> {
    if branch.chars().count() > 100 { return Err(ModelError::Validation("branch too long (<=100)".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, tenant_id: Uuid, username: &str, email: &str, role: Role) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        username: Set(username.trim().to_string()),
        email: Set(email.to_string()),
        role: Set(role.as_str().to_string()),
        status: Set(AccountStatus::Active.as_str().to_string()),
        branch: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, tenant_id: Uuid, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await?)
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
