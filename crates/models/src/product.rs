//! Shop inventory items.

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{tenant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub unit_of_measure: String,
    pub stocks: i32,
    pub price_cents: i64,
    pub is_available: bool,
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_unit")]
    pub unit_of_measure: String,
    #[serde(default)]
    pub stocks: i32,
    pub price_cents: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_category() -> String { "Food".into() }
fn default_unit() -> String { "piece".into() }
fn default_true() -> bool { true }

impl ProductFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        let name = self.name.trim();
        if name.is_empty() { return Err(ModelError::Validation("name required".into())); }
        if name.chars().count() > 100 { return Err(ModelError::Validation("name too long (<=100)".into())); }
        if self.category.trim().is_empty() { return Err(ModelError::Validation("category required".into())); }
        if self.unit_of_measure.chars().count() > 20 { return Err(ModelError::Validation("unit_of_measure too long (<=20)".into())); }
        if self.stocks < 0 { return Err(ModelError::Validation("stocks must not be negative".into())); }
        if self.price_cents < 0 { return Err(ModelError::Validation("price_cents must not be negative".into())); }
        Ok(())
    }

    pub fn apply(self, am: &mut ActiveModel) {
        am.name = Set(self.name.trim().to_string());
        am.description = Set(self.description);
        am.category = Set(self.category);
        am.unit_of_measure = Set(self.unit_of_measure);
        am.stocks = Set(self.stocks);
        am.price_cents = Set(self.price_cents);
        am.is_available = Set(self.is_available);
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, tenant_id: Uuid, created_by: Option<Uuid>, fields: ProductFields) -> Result<Model, errors::ModelError> {
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

pub async fn find_in_tenant<C: ConnectionTrait>(db: &C, tenant_id: Uuid, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id)
        .filter(Column::TenantId.eq(tenant_id))
        .one(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_deserializing() {
        let f: ProductFields = serde_json::from_str(r#"{"name":"Kibble","price_cents":1299}"#).unwrap();
        assert_eq!(f.category, "Food");
        assert_eq!(f.unit_of_measure, "piece");
        assert_eq!(f.stocks, 0);
        assert!(f.is_available);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn rejects_negative_stock() {
        let f: ProductFields = serde_json::from_str(r#"{"name":"Kibble","price_cents":1299,"stocks":-3}"#).unwrap();
        assert!(f.validate().is_err());
    }
}
