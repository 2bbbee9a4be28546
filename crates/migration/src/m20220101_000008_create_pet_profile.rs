//! Create `pet_profile` table.
//!
//! Profiles survive deletion of the staff member who created them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PetProfile::Table)
                    .if_not_exists()
                    .col(uuid(PetProfile::Id).primary_key())
                    .col(uuid(PetProfile::TenantId).not_null())
                    .col(string_len(PetProfile::PetName, 100).not_null())
                    .col(string_len(PetProfile::PetBreed, 100).not_null())
                    .col(string_len(PetProfile::Age, 50).not_null())
                    .col(text_null(PetProfile::Allergies))
                    .col(text_null(PetProfile::Notes))
                    .col(uuid_null(PetProfile::CreatedBy))
                    .col(timestamp_with_time_zone(PetProfile::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pet_profile_tenant")
                            .from(PetProfile::Table, PetProfile::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pet_profile_created_by")
                            .from(PetProfile::Table, PetProfile::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PetProfile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PetProfile { Table, Id, TenantId, PetName, PetBreed, Age, Allergies, Notes, CreatedBy, CreatedAt }

#[derive(DeriveIden)]
enum Tenant { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
