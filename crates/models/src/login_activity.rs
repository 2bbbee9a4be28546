use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, tenant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "login_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub login_time: DateTimeWithTimeZone,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Tenant, User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tenant => Entity::belongs_to(tenant::Entity).from(Column::TenantId).to(tenant::Column::Id).into(),
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Record a login for `account`, snapshotting its Active/Blocked state.
pub async fn record<C: ConnectionTrait>(db: &C, account: &user::Model) -> Result<Model, errors::ModelError> {
    let status = if account.is_active { user::AccountStatus::Active } else { user::AccountStatus::Blocked };
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(account.tenant_id),
        user_id: Set(account.id),
        login_time: Set(Utc::now().into()),
        status: Set(status.as_str().to_string()),
    };
    Ok(am.insert(db).await?)
}
