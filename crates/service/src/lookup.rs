//! Batched name lookups used to decorate list responses.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use models::{catalog, user};

use crate::errors::ServiceError;

pub async fn usernames(db: &DatabaseConnection, ids: impl IntoIterator<Item = Uuid>) -> Result<HashMap<Uuid, String>, ServiceError> {
    let ids: HashSet<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = user::Entity::find().filter(user::Column::Id.is_in(ids)).all(db).await?;
    Ok(rows.into_iter().map(|u| (u.id, u.username)).collect())
}

pub async fn service_names(db: &DatabaseConnection, ids: impl IntoIterator<Item = Uuid>) -> Result<HashMap<Uuid, String>, ServiceError> {
    let ids: HashSet<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = catalog::Entity::find().filter(catalog::Column::Id.is_in(ids)).all(db).await?;
    Ok(rows.into_iter().map(|s| (s.id, s.name)).collect())
}
