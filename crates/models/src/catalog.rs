//! Bookable services offered by a tenant.

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{tenant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: String,
    pub included: Option<String>,
    pub duration_minutes: i32,
    pub cost_cents: i64,
    pub availability: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Tenant, Creator }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tenant => Entity::belongs_to(tenant::Entity).from(Column::TenantId).to(tenant::Column::Id).into(),
            Relation::Creator => Entity::belongs_to(user::Entity).from(Column::CreatedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Writable fields of a service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub included: Option<String>,
    pub duration_minutes: i32,
    pub cost_cents: i64,
    #[serde(default = "default_true")]
    pub availability: bool,
}

fn default_true() -> bool { true }

impl ServiceFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        let name = self.name.trim();
        if name.is_empty() { return Err(ModelError::Validation("name required".into())); }
        if name.chars().count() > 100 { return Err(ModelError::Validation("name too long (<=100)".into())); }
        if self.duration_minutes <= 0 { return Err(ModelError::Validation("duration_minutes must be positive".into())); }
        if self.cost_cents < 0 { return Err(ModelError::Validation("cost_cents must not be negative".into())); }
        Ok(())
    }

    /// Copy the fields onto an existing row.
    pub fn apply(self, am: &mut ActiveModel) {
        am.name = Set(self.name.trim().to_string());
        am.description = Set(self.description);
        am.included = Set(self.included);
        am.duration_minutes = Set(self.duration_minutes);
        am.cost_cents = Set(self.cost_cents);
        am.availability = Set(self.availability);
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, tenant_id: Uuid, created_by: Option<Uuid>, fields: ServiceFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        created_by: Set(created_by),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    fields.apply(&mut am);
    Ok(am.insert(db).await?)
}

/// Look a service up inside one tenant.
pub async fn find_in_tenant<C: ConnectionTrait>(db: &C, tenant_id: Uuid, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id)
        .filter(Column::TenantId.eq(tenant_id))
        .one(db)
        .await?)
}
