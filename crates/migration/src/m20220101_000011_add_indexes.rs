use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: username unique within a tenant
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_tenant_username")
                    .table(User::Table)
                    .col(User::TenantId)
                    .col(User::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Appointments: calendar scans per tenant ordered by start
        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_tenant_start")
                    .table(Appointment::Table)
                    .col(Appointment::TenantId)
                    .col(Appointment::StartTime)
                    .to_owned(),
            )
            .await?;

        // Appointments: overlap lookups per service
        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_service_start")
                    .table(Appointment::Table)
                    .col(Appointment::ServiceId)
                    .col(Appointment::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_user")
                    .table(Appointment::Table)
                    .col(Appointment::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_login_activity_tenant_time")
                    .table(LoginActivity::Table)
                    .col(LoginActivity::TenantId)
                    .col(LoginActivity::LoginTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_user_tenant_username").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_appointment_tenant_start").table(Appointment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_appointment_service_start").table(Appointment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_appointment_user").table(Appointment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_login_activity_tenant_time").table(LoginActivity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, TenantId, Username }

#[derive(DeriveIden)]
enum Appointment { Table, TenantId, ServiceId, StartTime, UserId }

#[derive(DeriveIden)]
enum LoginActivity { Table, TenantId, LoginTime }
