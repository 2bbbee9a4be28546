//! Create `appointment` table.
//!
//! A booking reserves `[start_time, end_time)` of one service for one user.
//! Nothing at the schema level prevents overlapping slots.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Appointment::Table)
                    .if_not_exists()
                    .col(uuid(Appointment::Id).primary_key())
                    .col(uuid(Appointment::TenantId).not_null())
                    .col(uuid(Appointment::UserId).not_null())
                    .col(uuid(Appointment::ServiceId).not_null())
                    .col(timestamp_with_time_zone(Appointment::StartTime).not_null())
                    .col(timestamp_with_time_zone(Appointment::EndTime).not_null())
                    .col(string_len(Appointment::Status, 50).not_null())
                    .col(timestamp_with_time_zone(Appointment::BookedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_tenant")
                            .from(Appointment::Table, Appointment::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_user")
                            .from(Appointment::Table, Appointment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_service")
                            .from(Appointment::Table, Appointment::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Appointment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Appointment { Table, Id, TenantId, UserId, ServiceId, StartTime, EndTime, Status, BookedAt }

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
