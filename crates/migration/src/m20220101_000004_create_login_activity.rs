//! Create `login_activity` table: one row per successful login.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginActivity::Table)
                    .if_not_exists()
                    .col(uuid(LoginActivity::Id).primary_key())
                    .col(uuid(LoginActivity::TenantId).not_null())
                    .col(uuid(LoginActivity::UserId).not_null())
                    .col(timestamp_with_time_zone(LoginActivity::LoginTime).not_null())
                    .col(string_len(LoginActivity::Status, 10).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_login_activity_tenant")
                            .from(LoginActivity::Table, LoginActivity::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_login_activity_user")
                            .from(LoginActivity::Table, LoginActivity::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LoginActivity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LoginActivity { Table, Id, TenantId, UserId, LoginTime, Status }

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
