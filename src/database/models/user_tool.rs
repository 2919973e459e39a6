use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// User-owned tool instance derived from a template.
///
/// `template_id` is nullable: deleting a template detaches instances
/// instead of cascading. `created_at` is immutable once set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserTool {
    pub id: i64,
    pub user_id: Uuid,
    pub template_id: Option<i64>,
    pub config_json: Value,
    pub created_at: DateTime<Utc>,
}
