#![cfg(test)]
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use uuid::Uuid;

use configs::DatabaseConfig;
use models::db::connect_with_config;
use models::user::Role;
use models::{catalog, tenant, user};

use crate::authz::Actor;

/// A private in-memory database with the schema applied.
///
/// Every call gets its own database, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Create a user (and a fresh tenant unless one is given) and return it as a caller.
pub async fn seed_actor(db: &DatabaseConnection, tenant_id: Option<Uuid>, username: &str, role: Role) -> Result<Actor, anyhow::Error> {
    let tenant_id = match tenant_id {
        Some(id) => id,
        None => tenant::create(db, &format!("tenant_{}", Uuid::new_v4())).await?.id,
    };
    let u = user::create(db, tenant_id, username, &format!("{username}@example.com"), role).await?;
    Ok(Actor { user_id: u.id, tenant_id, username: u.username, role })
}

pub async fn seed_service(db: &DatabaseConnection, tenant_id: Uuid, duration_minutes: i32) -> Result<catalog::Model, anyhow::Error> {
    let fields = catalog::ServiceFields {
        name: format!("Groom {duration_minutes}m"),
        description: String::new(),
        included: None,
        duration_minutes,
        cost_cents: 1000 + i64::from(duration_minutes),
        availability: true,
    };
    Ok(catalog::create(db, tenant_id, None, fields).await?)
}
