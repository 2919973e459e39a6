use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::User;

use super::{QuotaOutcome, StoreError, UserStore};

/// Principal store over Postgres.
///
/// The quota decrement is a single statement with the floor check in the
/// WHERE clause, so concurrent requests from the same user can never drive
/// the counter below zero.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, quota, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn consume_quota(&self, id: Uuid) -> Result<QuotaOutcome, StoreError> {
        let remaining = sqlx::query_scalar::<_, i32>(
            "UPDATE users SET quota = quota - 1 WHERE id = $1 AND quota > 0 RETURNING quota",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(remaining) = remaining {
            return Ok(QuotaOutcome::Consumed(remaining));
        }

        // No row updated: either the counter hit the floor or the
        // principal no longer exists.
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            Ok(QuotaOutcome::Exhausted)
        } else {
            Ok(QuotaOutcome::UnknownUser)
        }
    }
}
