use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{catalog, order};

use crate::authz::{Actor, Permission};
use crate::errors::ServiceError;
use crate::lookup;

/// Order request. Owner, status and total are derived server-side.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateOrder {
    pub service: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub service_id: Uuid,
    pub service_name: Option<String>,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_cost_cents: i64,
}

async fn decorate(db: &DatabaseConnection, rows: Vec<order::Model>) -> Result<Vec<OrderView>, ServiceError> {
    let users = lookup::usernames(db, rows.iter().map(|o| o.user_id)).await?;
    let services = lookup::service_names(db, rows.iter().map(|o| o.service_id)).await?;
    Ok(rows
        .into_iter()
        .map(|o| OrderView {
            id: o.id,
            username: users.get(&o.user_id).cloned(),
            service_name: services.get(&o.service_id).cloned(),
            user_id: o.user_id,
            service_id: o.service_id,
            order_date: o.order_date.with_timezone(&Utc),
            status: o.status,
            total_cost_cents: o.total_cost_cents,
        })
        .collect())
}

/// Staff see every order in the tenant, everyone else only their own.
pub async fn list_orders(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<OrderView>, ServiceError> {
    let mut q = order::Entity::find().filter(order::Column::TenantId.eq(actor.tenant_id));
    if !actor.can(Permission::ViewAllOrders) {
        q = q.filter(order::Column::UserId.eq(actor.user_id));
    }
    let rows = q.order_by_desc(order::Column::OrderDate).all(db).await?;
    decorate(db, rows).await
}

#[instrument(skip(db, actor), fields(user_id = %actor.user_id))]
pub async fn create_order(db: &DatabaseConnection, actor: &Actor, input: CreateOrder) -> Result<OrderView, ServiceError> {
    let service = catalog::find_in_tenant(db, actor.tenant_id, input.service)
        .await?
        .ok_or_else(|| ServiceError::field("service", format!("Invalid service \"{}\" - object does not exist.", input.service)))?;
    let created = order::create(db, actor.user_id, &service).await?;
    info!(order_id = %created.id, total = created.total_cost_cents, "order_placed");
    decorate(db, vec![created])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::Db("created order vanished".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{get_db, seed_actor, seed_service};

    #[tokio::test]
    async fn total_matches_service_cost_and_visibility_is_scoped() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let staff = seed_actor(&db, None, "staff", Role::Admin).await?;
        let a = seed_actor(&db, Some(staff.tenant_id), "a", Role::User).await?;
        let b = seed_actor(&db, Some(staff.tenant_id), "b", Role::User).await?;
        let svc = seed_service(&db, staff.tenant_id, 60).await?;

        let o = create_order(&db, &a, CreateOrder { service: svc.id }).await?;
        assert_eq!(o.total_cost_cents, svc.cost_cents);
        assert_eq!(o.status, "Pending");
        assert_eq!(o.user_id, a.user_id);
        create_order(&db, &b, CreateOrder { service: svc.id }).await?;

        assert_eq!(list_orders(&db, &a).await?.len(), 1);
        assert_eq!(list_orders(&db, &staff).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_service_is_a_field_error() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = seed_actor(&db, None, "a", Role::User).await?;
        let err = create_order(&db, &a, CreateOrder { service: Uuid::new_v4() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::FieldValidation(f) if f.contains_key("service")));
        Ok(())
    }
}
