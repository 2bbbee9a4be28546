use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{tenant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pet_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub pet_name: String,
    pub pet_breed: String,
    pub age: String,
    pub allergies: Option<String>,
    pub notes: Option<String>,
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
pub struct PetFields {
    pub pet_name: String,
    pub pet_breed: String,
    /// Free text, e.g. "6 Months".
    pub age: String,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PetFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        for (field, value, max) in [("pet_name", &self.pet_name, 100), ("pet_breed", &self.pet_breed, 100), ("age", &self.age, 50)] {
            let v = value.trim();
            if v.is_empty() { return Err(ModelError::Validation(format!("{field} required"))); }
            if v.chars().count() > max { return Err(ModelError::Validation(format!("{field} too long (<={max})"))); }
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, tenant_id: Uuid, created_by: Option<Uuid>, fields: PetFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        pet_name: Set(fields.pet_name.trim().to_string()),
        pet_breed: Set(fields.pet_breed.trim().to_string()),
        age: Set(fields.age.trim().to_string()),
        allergies: Set(fields.allergies),
        notes: Set(fields.notes),
        created_by: Set(created_by),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let f = PetFields { pet_name: " ".into(), pet_breed: "Beagle".into(), age: "2 Years".into(), allergies: None, notes: None };
        assert!(f.validate().is_err());
    }
}
