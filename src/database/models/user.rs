use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Principal row backing the bearer-token identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Remaining prompt-parse uses
    pub quota: i32,
    pub created_at: DateTime<Utc>,
}
