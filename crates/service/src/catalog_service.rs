use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use models::catalog::{self, ServiceFields};

use crate::authz::{Actor, Permission};
use crate::errors::ServiceError;

/// Services of the caller's tenant, newest first.
pub async fn list_services(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<catalog::Model>, ServiceError> {
    Ok(catalog::Entity::find()
        .filter(catalog::Column::TenantId.eq(actor.tenant_id))
        .order_by_desc(catalog::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get_service(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<catalog::Model, ServiceError> {
    catalog::find_in_tenant(db, actor.tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}

#[instrument(skip(db, actor, fields), fields(actor = %actor.username, name = %fields.name))]
pub async fn create_service(db: &DatabaseConnection, actor: &Actor, fields: ServiceFields) -> Result<catalog::Model, ServiceError> {
    actor.require(Permission::ManageCatalog)?;
    let created = catalog::create(db, actor.tenant_id, Some(actor.user_id), fields).await?;
    info!(service_id = %created.id, "service_created");
    Ok(created)
}

pub async fn update_service(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: ServiceFields) -> Result<catalog::Model, ServiceError> {
    actor.require(Permission::ManageCatalog)?;
    fields.validate()?;
    let mut am: catalog::ActiveModel = get_service(db, actor, id).await?.into();
    fields.apply(&mut am);
    Ok(am.update(db).await?)
}

/// Flip the availability flag.
pub async fn toggle_service(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<catalog::Model, ServiceError> {
    actor.require(Permission::ManageCatalog)?;
    let current = get_service(db, actor, id).await?;
    let flipped = !current.availability;
    let mut am: catalog::ActiveModel = current.into();
    am.availability = Set(flipped);
    let updated = am.update(db).await?;
    info!(service_id = %id, availability = flipped, "service_toggled");
    Ok(updated)
}

pub async fn delete_service(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManageCatalog)?;
    let found = get_service(db, actor, id).await?;
    catalog::Entity::delete_by_id(found.id).exec(db).await?;
    info!(service_id = %id, "service_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{get_db, seed_actor};

    fn fields(name: &str) -> ServiceFields {
        ServiceFields { name: name.into(), description: "d".into(), included: None, duration_minutes: 30, cost_cents: 1500, availability: true }
    }

    #[tokio::test]
    async fn non_staff_cannot_create() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let user = seed_actor(&db, None, "u", Role::User).await?;
        assert!(matches!(create_service(&db, &user, fields("Bath")).await, Err(ServiceError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn crud_and_toggle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mgr = seed_actor(&db, None, "mgr", Role::Manager).await?;
        let s = create_service(&db, &mgr, fields("Bath")).await?;
        assert_eq!(s.created_by, Some(mgr.user_id));

        let toggled = toggle_service(&db, &mgr, s.id).await?;
        assert!(!toggled.availability);

        let updated = update_service(&db, &mgr, s.id, ServiceFields { cost_cents: 2000, ..fields("Deluxe Bath") }).await?;
        assert_eq!(updated.name, "Deluxe Bath");
        assert_eq!(updated.cost_cents, 2000);

        let bad = ServiceFields { duration_minutes: 0, ..fields("Bath") };
        assert!(matches!(update_service(&db, &mgr, s.id, bad).await, Err(ServiceError::Model(_))));

        assert_eq!(list_services(&db, &mgr).await?.len(), 1);
        delete_service(&db, &mgr, s.id).await?;
        assert!(matches!(get_service(&db, &mgr, s.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn other_tenants_services_are_invisible() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = seed_actor(&db, None, "a", Role::Admin).await?;
        let b = seed_actor(&db, None, "b", Role::Admin).await?;
        let s = create_service(&db, &a, fields("Bath")).await?;
        assert!(list_services(&db, &b).await?.is_empty());
        assert!(matches!(delete_service(&db, &b, s.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
