use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::metrics::{APPOINTMENTS_CANCELLED_TOTAL, APPOINTMENTS_CREATED_TOTAL, APPOINTMENTS_REJECTED_TOTAL};
use models::appointment::{self, NewAppointment};
use models::catalog;
use models::status::BookingStatus;

use crate::authz::{Actor, Permission};
use crate::errors::{FieldErrors, ServiceError};
use crate::lookup;

use super::calculator::compute_end_time;
use super::start_time::parse_start_time;

/// Operator policy for new bookings.
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingPolicy {
    /// Refuse a booking whose slot intersects a confirmed booking of the same service.
    pub reject_overlaps: bool,
}

impl From<&configs::BookingConfig> for BookingPolicy {
    fn from(cfg: &configs::BookingConfig) -> Self { Self { reject_overlaps: cfg.reject_overlaps } }
}

/// Booking request. Owner, status and end time are never taken from the caller.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateAppointment {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub service_id: Uuid,
    pub service_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub booked_at: DateTime<Utc>,
}

async fn decorate(db: &DatabaseConnection, rows: Vec<appointment::Model>) -> Result<Vec<AppointmentView>, ServiceError> {
    let users = lookup::usernames(db, rows.iter().map(|a| a.user_id)).await?;
    let services = lookup::service_names(db, rows.iter().map(|a| a.service_id)).await?;
    Ok(rows
        .into_iter()
        .map(|a| AppointmentView {
            id: a.id,
            username: users.get(&a.user_id).cloned(),
            service_name: services.get(&a.service_id).cloned(),
            user_id: a.user_id,
            service_id: a.service_id,
            start_time: a.start_time.with_timezone(&Utc),
            end_time: a.end_time.with_timezone(&Utc),
            status: a.status,
            booked_at: a.booked_at.with_timezone(&Utc),
        })
        .collect())
}

/// Resolve the request into a service row and a start instant, collecting
/// every field problem before failing.
async fn resolve(db: &DatabaseConnection, tenant_id: Uuid, input: &CreateAppointment) -> Result<(catalog::Model, DateTime<Utc>), ServiceError> {
    let mut fields = FieldErrors::new();

    let service = match input.service.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            fields.entry("service".into()).or_default().push("This field is required.".into());
            None
        }
        Some(raw) => {
            let found = match Uuid::parse_str(raw) {
                Ok(id) => catalog::find_in_tenant(db, tenant_id, id).await?,
                Err(_) => None,
            };
            if found.is_none() {
                fields.entry("service".into()).or_default().push(format!("Invalid service \"{raw}\" - object does not exist."));
            }
            found
        }
    };

    let start = match input.start_time.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            fields.entry("start_time".into()).or_default().push("This field is required.".into());
            None
        }
        Some(raw) => {
            let parsed = parse_start_time(raw);
            if parsed.is_none() {
                fields.entry("start_time".into()).or_default().push(
                    "Datetime has wrong format. Use RFC 3339 or YYYY-MM-DDThh:mm[:ss].".into(),
                );
            }
            parsed
        }
    };

    match (service, start) {
        (Some(service), Some(start)) if fields.is_empty() => Ok((service, start)),
        _ => Err(ServiceError::FieldValidation(fields)),
    }
}

/// Book `input.service` at `input.start_time` for the caller.
#[instrument(skip(db, actor, input), fields(user_id = %actor.user_id, tenant_id = %actor.tenant_id))]
pub async fn create(db: &DatabaseConnection, policy: BookingPolicy, actor: &Actor, input: CreateAppointment) -> Result<AppointmentView, ServiceError> {
    let (service, start) = match resolve(db, actor.tenant_id, &input).await {
        Ok(ok) => ok,
        Err(e) => {
            APPOINTMENTS_REJECTED_TOTAL.inc();
            return Err(e);
        }
    };
    let end = compute_end_time(start, service.duration_minutes);

    if policy.reject_overlaps {
        // Read-then-insert; concurrent requests can still both pass.
        let clashes = appointment::find_overlapping(db, actor.tenant_id, service.id, start, end).await?;
        if !clashes.is_empty() {
            APPOINTMENTS_REJECTED_TOTAL.inc();
            warn!(service_id = %service.id, %start, %end, clashes = clashes.len(), "booking overlaps an existing slot");
            return Err(ServiceError::Conflict("The requested slot overlaps an existing booking for this service.".into()));
        }
    }

    let created = appointment::create(db, NewAppointment {
        tenant_id: actor.tenant_id,
        user_id: actor.user_id,
        service_id: service.id,
        start_time: start,
        end_time: end,
        status: BookingStatus::Confirmed,
    })
    .await?;
    APPOINTMENTS_CREATED_TOTAL.inc();
    info!(appointment_id = %created.id, service_id = %service.id, %start, %end, "appointment_booked");

    decorate(db, vec![created])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::Db("created appointment vanished".into()))
}

/// Calendar view: every confirmed booking in the tenant, earliest first.
pub async fn list_booked(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<AppointmentView>, ServiceError> {
    let rows = appointment::Entity::find()
        .filter(appointment::Column::TenantId.eq(actor.tenant_id))
        .filter(appointment::Column::Status.eq(BookingStatus::Confirmed.as_str()))
        .order_by_asc(appointment::Column::StartTime)
        .all(db)
        .await?;
    decorate(db, rows).await
}

pub async fn list_my_upcoming(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<AppointmentView>, ServiceError> {
    list_my_upcoming_at(db, actor, Utc::now()).await
}

/// The caller's confirmed bookings starting at or after `now`.
pub async fn list_my_upcoming_at(db: &DatabaseConnection, actor: &Actor, now: DateTime<Utc>) -> Result<Vec<AppointmentView>, ServiceError> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = now.into();
    let rows = appointment::Entity::find()
        .filter(appointment::Column::TenantId.eq(actor.tenant_id))
        .filter(appointment::Column::UserId.eq(actor.user_id))
        .filter(appointment::Column::Status.eq(BookingStatus::Confirmed.as_str()))
        .filter(appointment::Column::StartTime.gte(now))
        .order_by_asc(appointment::Column::StartTime)
        .all(db)
        .await?;
    decorate(db, rows).await
}

/// Every booking in the tenant regardless of status. Staff only.
pub async fn list_all(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<AppointmentView>, ServiceError> {
    actor.require(Permission::ViewAllAppointments)?;
    let rows = appointment::Entity::find()
        .filter(appointment::Column::TenantId.eq(actor.tenant_id))
        .order_by_asc(appointment::Column::StartTime)
        .all(db)
        .await?;
    decorate(db, rows).await
}

/// Delete a booking. Owners may cancel their own; staff may cancel any.
#[instrument(skip(db, actor), fields(user_id = %actor.user_id))]
pub async fn cancel(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let found = appointment::Entity::find_by_id(id)
        .filter(appointment::Column::TenantId.eq(actor.tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("appointment"))?;
    if found.user_id != actor.user_id {
        actor.require(Permission::CancelAnyAppointment)?;
    }
    appointment::Entity::delete_by_id(found.id).exec(db).await?;
    APPOINTMENTS_CANCELLED_TOTAL.inc();
    info!(appointment_id = %id, owner = %found.user_id, "appointment_cancelled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use models::user::Role;

    use crate::test_support::{get_db, seed_actor, seed_service};

    fn req(service: Uuid, start: &str) -> CreateAppointment {
        CreateAppointment { service: Some(service.to_string()), start_time: Some(start.into()) }
    }

    #[tokio::test]
    async fn end_time_is_start_plus_duration() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_actor(&db, None, "owner", Role::User).await?;
        for minutes in [15, 45, 90, 240] {
            let svc = seed_service(&db, owner.tenant_id, minutes).await?;
            let a = create(&db, BookingPolicy::default(), &owner, req(svc.id, "2031-05-06T09:15:00Z")).await?;
            assert_eq!(a.end_time - a.start_time, Duration::minutes(i64::from(minutes)));
            assert_eq!(a.status, "Confirmed");
            assert_eq!(a.user_id, owner.user_id);
        }
        Ok(())
    }

    #[tokio::test]
    async fn offsets_are_normalised_to_utc() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_actor(&db, None, "owner", Role::User).await?;
        let svc = seed_service(&db, owner.tenant_id, 30).await?;
        let a = create(&db, BookingPolicy::default(), &owner, req(svc.id, "2031-05-06T12:00:00+02:00")).await?;
        assert_eq!(a.start_time, Utc.with_ymd_and_hms(2031, 5, 6, 10, 0, 0).unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn missing_and_bad_fields_are_reported_together() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_actor(&db, None, "owner", Role::User).await?;
        let err = create(&db, BookingPolicy::default(), &owner, CreateAppointment { service: None, start_time: Some("soon".into()) })
            .await
            .unwrap_err();
        match err {
            ServiceError::FieldValidation(f) => {
                assert!(f.contains_key("service"));
                assert!(f.contains_key("start_time"));
            }
            other => panic!("unexpected {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn service_from_another_tenant_is_unknown() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mine = seed_actor(&db, None, "me", Role::User).await?;
        let theirs = seed_actor(&db, None, "them", Role::Admin).await?;
        let foreign = seed_service(&db, theirs.tenant_id, 30).await?;
        let err = create(&db, BookingPolicy::default(), &mine, req(foreign.id, "2031-01-01T10:00")).await.unwrap_err();
        assert!(matches!(err, ServiceError::FieldValidation(f) if f.contains_key("service")));
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_bookings_follow_policy() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = seed_actor(&db, None, "alice", Role::User).await?;
        let b = seed_actor(&db, Some(a.tenant_id), "bob", Role::User).await?;
        let svc = seed_service(&db, a.tenant_id, 60).await?;

        create(&db, BookingPolicy::default(), &a, req(svc.id, "2031-02-01T10:00:00Z")).await?;
        // Default policy keeps the historical double-booking behaviour.
        create(&db, BookingPolicy::default(), &b, req(svc.id, "2031-02-01T10:30:00Z")).await?;

        let strict = BookingPolicy { reject_overlaps: true };
        let err = create(&db, strict, &b, req(svc.id, "2031-02-01T10:59:00Z")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // Back-to-back slots are fine.
        create(&db, strict, &b, req(svc.id, "2031-02-01T11:30:00Z")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn booked_lists_only_confirmed_in_start_order() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_actor(&db, None, "owner", Role::User).await?;
        let svc = seed_service(&db, owner.tenant_id, 30).await?;
        for start in ["2031-03-03T15:00:00Z", "2031-03-01T09:00:00Z", "2031-03-02T12:00:00Z"] {
            create(&db, BookingPolicy::default(), &owner, req(svc.id, start)).await?;
        }
        let pending = appointment::create(&db, NewAppointment {
            tenant_id: owner.tenant_id,
            user_id: owner.user_id,
            service_id: svc.id,
            start_time: Utc.with_ymd_and_hms(2031, 2, 1, 8, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2031, 2, 1, 8, 30, 0).unwrap(),
            status: BookingStatus::Pending,
        })
        .await?;

        let booked = list_booked(&db, &owner).await?;
        assert_eq!(booked.len(), 3);
        assert!(booked.iter().all(|a| a.status == "Confirmed"));
        assert!(booked.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        assert!(booked.iter().all(|a| a.id != pending.id));
        assert_eq!(booked[0].service_name.as_deref(), Some(svc.name.as_str()));
        assert_eq!(booked[0].username.as_deref(), Some("owner"));
        Ok(())
    }

    #[tokio::test]
    async fn upcoming_excludes_past_and_other_users() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let me = seed_actor(&db, None, "me", Role::User).await?;
        let other = seed_actor(&db, Some(me.tenant_id), "other", Role::User).await?;
        let svc = seed_service(&db, me.tenant_id, 30).await?;

        create(&db, BookingPolicy::default(), &me, req(svc.id, "2031-01-01T09:00:00Z")).await?;
        create(&db, BookingPolicy::default(), &me, req(svc.id, "2031-06-01T09:00:00Z")).await?;
        create(&db, BookingPolicy::default(), &other, req(svc.id, "2031-07-01T09:00:00Z")).await?;

        let now = Utc.with_ymd_and_hms(2031, 3, 1, 0, 0, 0).unwrap();
        let mine = list_my_upcoming_at(&db, &me, now).await?;
        assert_eq!(mine.len(), 1);
        assert!(mine[0].start_time >= now);
        assert_eq!(mine[0].user_id, me.user_id);
        Ok(())
    }

    #[tokio::test]
    async fn list_all_is_staff_only_and_includes_every_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let staff = seed_actor(&db, None, "mgr", Role::Manager).await?;
        let user = seed_actor(&db, Some(staff.tenant_id), "u", Role::User).await?;
        let svc = seed_service(&db, staff.tenant_id, 30).await?;
        create(&db, BookingPolicy::default(), &user, req(svc.id, "2031-01-01T09:00:00Z")).await?;
        appointment::create(&db, NewAppointment {
            tenant_id: staff.tenant_id,
            user_id: user.user_id,
            service_id: svc.id,
            start_time: Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2030, 1, 1, 9, 30, 0).unwrap(),
            status: BookingStatus::Completed,
        })
        .await?;

        assert!(matches!(list_all(&db, &user).await, Err(ServiceError::Forbidden(_))));
        let all = list_all(&db, &staff).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].status, "Completed");
        Ok(())
    }

    #[tokio::test]
    async fn cancel_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_actor(&db, None, "owner", Role::User).await?;
        let stranger = seed_actor(&db, Some(owner.tenant_id), "stranger", Role::User).await?;
        let staff = seed_actor(&db, Some(owner.tenant_id), "staff", Role::Manager).await?;
        let svc = seed_service(&db, owner.tenant_id, 30).await?;

        let a1 = create(&db, BookingPolicy::default(), &owner, req(svc.id, "2031-01-01T09:00:00Z")).await?;
        let a2 = create(&db, BookingPolicy::default(), &owner, req(svc.id, "2031-01-02T09:00:00Z")).await?;

        assert!(matches!(cancel(&db, &stranger, a1.id).await, Err(ServiceError::Forbidden(_))));
        cancel(&db, &owner, a1.id).await?;
        cancel(&db, &staff, a2.id).await?;
        assert!(matches!(cancel(&db, &owner, a1.id).await, Err(ServiceError::NotFound(_))));
        assert!(list_booked(&db, &owner).await?.is_empty());
        Ok(())
    }
}
