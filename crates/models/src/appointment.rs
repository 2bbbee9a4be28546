//! Appointment rows. End time is derived by the booking layer, never supplied by callers.

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::status::BookingStatus;
use crate::{catalog, tenant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub status: String,
    pub booked_at: DateTimeWithTimeZone,
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

/// A fully resolved booking ready to be stored.
#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewAppointment) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(new.tenant_id),
        user_id: Set(new.user_id),
        service_id: Set(new.service_id),
        start_time: Set(new.start_time.into()),
        end_time: Set(new.end_time.into()),
        status: Set(new.status.as_str().to_string()),
        booked_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Confirmed bookings of `service_id` intersecting the half-open slot `[start, end)`.
pub async fn find_overlapping<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    service_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Model>, errors::ModelError> {
    let start: DateTimeWithTimeZone = start.into();
    let end: DateTimeWithTimeZone = end.into();
    Ok(Entity::find()
        .filter(Column::TenantId.eq(tenant_id))
        .filter(Column::ServiceId.eq(service_id))
        .filter(Column::Status.eq(BookingStatus::Confirmed.as_str()))
        .filter(Column::StartTime.lt(end))
        .filter(Column::EndTime.gt(start))
        .all(db)
        .await?)
}
