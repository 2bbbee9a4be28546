use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use models::feedback;

use crate::authz::Actor;
use crate::errors::ServiceError;
use crate::lookup;
use crate::pagination::Pagination;

#[derive(Clone, Debug, Deserialize)]
pub struct SubmitFeedback {
    pub rating: i32,
    #[serde(default)]
    pub feedback_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackView {
    pub id: Uuid,
    pub username: Option<String>,
    pub rating: i32,
    pub feedback_text: String,
    pub submitted_at: DateTime<Utc>,
}

pub async fn submit(db: &DatabaseConnection, actor: &Actor, input: SubmitFeedback) -> Result<FeedbackView, ServiceError> {
    if feedback::validate_rating(input.rating).is_err() {
        return Err(ServiceError::field(
            "rating",
            format!("Ensure this value is between {} and {}.", feedback::MIN_RATING, feedback::MAX_RATING),
        ));
    }
    let created = feedback::create(db, actor.tenant_id, actor.user_id, input.rating, &input.feedback_text).await?;
    info!(feedback_id = %created.id, rating = created.rating, "feedback_submitted");
    Ok(FeedbackView {
        id: created.id,
        username: Some(actor.username.clone()),
        rating: created.rating,
        feedback_text: created.feedback_text,
        submitted_at: created.submitted_at.with_timezone(&Utc),
    })
}

/// Public testimonial wall for a tenant, newest first.
pub async fn gallery(db: &DatabaseConnection, tenant_id: Uuid, opts: Pagination) -> Result<Vec<FeedbackView>, ServiceError> {
    let (page_idx, per_page) = opts.window();
    let rows = feedback::Entity::find()
        .filter(feedback::Column::TenantId.eq(tenant_id))
        .order_by_desc(feedback::Column::SubmittedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    let users = lookup::usernames(db, rows.iter().filter_map(|f| f.user_id)).await?;
    Ok(rows
        .into_iter()
        .map(|f| FeedbackView {
            id: f.id,
            username: f.user_id.and_then(|id| users.get(&id).cloned()),
            rating: f.rating,
            feedback_text: f.feedback_text,
            submitted_at: f.submitted_at.with_timezone(&Utc),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{get_db, seed_actor};

    #[tokio::test]
    async fn rating_out_of_range_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = seed_actor(&db, None, "u", Role::User).await?;
        for rating in [0, 6, -1] {
            let err = submit(&db, &u, SubmitFeedback { rating, feedback_text: "x".into() }).await.unwrap_err();
            assert!(matches!(err, ServiceError::FieldValidation(f) if f.contains_key("rating")));
        }
        Ok(())
    }

    #[tokio::test]
    async fn gallery_is_tenant_scoped_newest_first() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = seed_actor(&db, None, "u", Role::User).await?;
        let outsider = seed_actor(&db, None, "o", Role::User).await?;
        submit(&db, &u, SubmitFeedback { rating: 4, feedback_text: "first".into() }).await?;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        submit(&db, &u, SubmitFeedback { rating: 5, feedback_text: "second".into() }).await?;
        submit(&db, &outsider, SubmitFeedback { rating: 1, feedback_text: "elsewhere".into() }).await?;

        let wall = gallery(&db, u.tenant_id, Pagination::default()).await?;
        assert_eq!(wall.len(), 2);
        assert_eq!(wall[0].feedback_text, "second");
        assert_eq!(wall[0].username.as_deref(), Some("u"));
        Ok(())
    }
}
