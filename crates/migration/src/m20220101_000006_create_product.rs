//! Create `product` table: shop inventory.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::TenantId).not_null())
                    .col(string_len(Product::Name, 100).not_null())
                    .col(text(Product::Description).not_null())
                    .col(string_len(Product::Category, 100).not_null())
                    .col(string_len(Product::UnitOfMeasure, 20).not_null())
                    .col(integer(Product::Stocks).not_null())
                    .col(big_integer(Product::PriceCents).not_null())
                    .col(boolean(Product::IsAvailable).not_null())
                    .col(uuid_null(Product::CreatedBy))
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_tenant")
                            .from(Product::Table, Product::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_created_by")
                            .from(Product::Table, Product::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    Category,
    UnitOfMeasure,
    Stocks,
    PriceCents,
    IsAvailable,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
