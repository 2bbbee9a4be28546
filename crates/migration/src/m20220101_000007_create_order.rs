//! Create `order` table: a purchase of one catalog service.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(uuid(Order::Id).primary_key())
                    .col(uuid(Order::TenantId).not_null())
                    .col(uuid(Order::UserId).not_null())
                    .col(uuid(Order::ServiceId).not_null())
                    .col(timestamp_with_time_zone(Order::OrderDate).not_null())
                    .col(string_len(Order::Status, 50).not_null())
                    .col(big_integer(Order::TotalCostCents).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_tenant")
                            .from(Order::Table, Order::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_service")
                            .from(Order::Table, Order::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Order::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Order { Table, Id, TenantId, UserId, ServiceId, OrderDate, Status, TotalCostCents }

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
