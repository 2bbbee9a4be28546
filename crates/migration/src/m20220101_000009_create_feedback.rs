//! Create `feedback` table. Ratings stay after the author is deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(uuid(Feedback::Id).primary_key())
                    .col(uuid(Feedback::TenantId).not_null())
                    .col(uuid_null(Feedback::UserId))
                    .col(integer(Feedback::Rating).not_null())
                    .col(text(Feedback::FeedbackText).not_null())
                    .col(timestamp_with_time_zone(Feedback::SubmittedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_tenant")
                            .from(Feedback::Table, Feedback::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_user")
                            .from(Feedback::Table, Feedback::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Feedback::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Feedback { Table, Id, TenantId, UserId, Rating, FeedbackText, SubmittedAt }

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
