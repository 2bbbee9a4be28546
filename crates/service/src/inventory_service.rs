use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use models::product::{self, ProductFields};

use crate::authz::{Actor, Permission};
use crate::errors::ServiceError;

fn tenant_products(actor: &Actor) -> sea_orm::Select<product::Entity> {
    product::Entity::find()
        .filter(product::Column::TenantId.eq(actor.tenant_id))
        .order_by_desc(product::Column::CreatedAt)
}

/// Products visible to any authenticated caller.
pub async fn list_products(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<product::Model>, ServiceError> {
    Ok(tenant_products(actor).all(db).await?)
}

/// Stock view for staff.
pub async fn inventory(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<product::Model>, ServiceError> {
    actor.require(Permission::ManageInventory)?;
    Ok(tenant_products(actor).all(db).await?)
}

pub async fn get_product(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<product::Model, ServiceError> {
    product::find_in_tenant(db, actor.tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))
}

#[instrument(skip(db, actor, fields), fields(actor = %actor.username, name = %fields.name))]
pub async fn create_product(db: &DatabaseConnection, actor: &Actor, fields: ProductFields) -> Result<product::Model, ServiceError> {
    actor.require(Permission::ManageInventory)?;
    let created = product::create(db, actor.tenant_id, Some(actor.user_id), fields).await?;
    info!(product_id = %created.id, stocks = created.stocks, "product_created");
    Ok(created)
}

pub async fn update_product(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: ProductFields) -> Result<product::Model, ServiceError> {
    actor.require(Permission::ManageInventory)?;
    fields.validate()?;
    let mut am: product::ActiveModel = get_product(db, actor, id).await?.into();
    fields.apply(&mut am);
    Ok(am.update(db).await?)
}

pub async fn toggle_product(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<product::Model, ServiceError> {
    actor.require(Permission::ManageInventory)?;
    let current = get_product(db, actor, id).await?;
    let flipped = !current.is_available;
    let mut am: product::ActiveModel = current.into();
    am.is_available = Set(flipped);
    Ok(am.update(db).await?)
}

pub async fn delete_product(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManageInventory)?;
    let found = get_product(db, actor, id).await?;
    product::Entity::delete_by_id(found.id).exec(db).await?;
    info!(product_id = %id, "product_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{get_db, seed_actor};

    fn kibble() -> ProductFields {
        ProductFields {
            name: "Kibble".into(),
            description: String::new(),
            category: "Food".into(),
            unit_of_measure: "bag".into(),
            stocks: 12,
            price_cents: 1999,
            is_available: true,
        }
    }

    #[tokio::test]
    async fn inventory_requires_staff() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mgr = seed_actor(&db, None, "mgr", Role::Manager).await?;
        let user = seed_actor(&db, Some(mgr.tenant_id), "u", Role::User).await?;
        create_product(&db, &mgr, kibble()).await?;

        assert!(matches!(inventory(&db, &user).await, Err(ServiceError::Forbidden(_))));
        assert_eq!(list_products(&db, &user).await?.len(), 1);
        assert_eq!(inventory(&db, &mgr).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn negative_stock_is_rejected_and_toggle_flips() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mgr = seed_actor(&db, None, "mgr", Role::Manager).await?;
        assert!(create_product(&db, &mgr, ProductFields { stocks: -1, ..kibble() }).await.is_err());

        let p = create_product(&db, &mgr, kibble()).await?;
        assert!(!toggle_product(&db, &mgr, p.id).await?.is_available);
        let p = update_product(&db, &mgr, p.id, ProductFields { stocks: 3, ..kibble() }).await?;
        assert_eq!(p.stocks, 3);
        delete_product(&db, &mgr, p.id).await?;
        assert!(list_products(&db, &mgr).await?.is_empty());
        Ok(())
    }
}
