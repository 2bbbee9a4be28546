//! Create `service` table: the bookable catalog.
//!
//! Cost is stored in minor units to keep money out of floating point.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid(Service::TenantId).not_null())
                    .col(string_len(Service::Name, 100).not_null())
                    .col(text(Service::Description).not_null())
                    .col(text_null(Service::Included))
                    .col(integer(Service::DurationMinutes).not_null())
                    .col(big_integer(Service::CostCents).not_null())
                    .col(boolean(Service::Availability).not_null())
                    .col(uuid_null(Service::CreatedBy))
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_tenant")
                            .from(Service::Table, Service::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_created_by")
                            .from(Service::Table, Service::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    Included,
    DurationMinutes,
    CostCents,
    Availability,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
