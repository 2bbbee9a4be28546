use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;
use uuid::Uuid;

use models::pet_profile::{self, PetFields};

use crate::authz::{Actor, Permission};
use crate::errors::ServiceError;

/// Staff see all pet profiles, everyone else the ones they created.
pub async fn list_pets(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<pet_profile::Model>, ServiceError> {
    let mut q = pet_profile::Entity::find().filter(pet_profile::Column::TenantId.eq(actor.tenant_id));
    if !actor.can(Permission::ManagePets) {
        q = q.filter(pet_profile::Column::CreatedBy.eq(actor.user_id));
    }
    Ok(q.order_by_desc(pet_profile::Column::CreatedAt).all(db).await?)
}

pub async fn create_pet(db: &DatabaseConnection, actor: &Actor, fields: PetFields) -> Result<pet_profile::Model, ServiceError> {
    actor.require(Permission::ManagePets)?;
    let created = pet_profile::create(db, actor.tenant_id, Some(actor.user_id), fields).await?;
    info!(pet_id = %created.id, "pet_profile_created");
    Ok(created)
}

pub async fn delete_pet(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManagePets)?;
    let found = pet_profile::Entity::find_by_id(id)
        .filter(pet_profile::Column::TenantId.eq(actor.tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("pet profile"))?;
    pet_profile::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}
