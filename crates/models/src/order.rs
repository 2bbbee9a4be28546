//! Service orders. The total is always copied from the service at creation.

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::status::BookingStatus;
use crate::{catalog, tenant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub order_date: DateTimeWithTimeZone,
    pub status: String,
    pub total_cost_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Tenant, User, Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tenant => Entity::belongs_to(tenant::Entity).from(Column::TenantId).to(tenant::Column::Id).into(),
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Service => Entity::belongs_to(catalog::Entity).from(Column::ServiceId).to(catalog::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Place a pending order for `service` on behalf of `user_id`.
pub async fn create<C: ConnectionTrait>(db: &C, user_id: Uuid, service: &catalog::Model) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(service.tenant_id),
        user_id: Set(user_id),
        service_id: Set(service.id),
        order_date: Set(Utc::now().into()),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        total_cost_cents: Set(service.cost_cents),
    };
    Ok(am.insert(db).await?)
}
