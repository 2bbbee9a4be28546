//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_tenant;
mod m20220101_000002_create_user;
mod m20220101_000003_create_user_credentials;
mod m20220101_000004_create_login_activity;
mod m20220101_000005_create_service;
mod m20220101_000006_create_product;
mod m20220101_000007_create_order;
mod m20220101_000008_create_pet_profile;
mod m20220101_000009_create_feedback;
mod m20220101_000010_create_appointment;
mod m20220101_000011_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_tenant::Migration),
            Box::new(m20220101_000002_create_user::Migration),
            Box::new(m20220101_000003_create_user_credentials::Migration),
            Box::new(m20220101_000004_create_login_activity::Migration),
            Box::new(m20220101_000005_create_service::Migration),
            Box::new(m20220101_000006_create_product::Migration),
            Box::new(m20220101_000007_create_order::Migration),
            Box::new(m20220101_000008_create_pet_profile::Migration),
            Box::new(m20220101_000009_create_feedback::Migration),
            Box::new(m20220101_000010_create_appointment::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000011_add_indexes::Migration),
        ]
    }
}
