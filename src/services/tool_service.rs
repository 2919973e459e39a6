use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::UserTool;

use super::{StoreError, ToolStore};

const TOOL_COLUMNS: &str = "id, user_id, template_id, config_json, created_at";

/// Tool instance persistence over Postgres.
pub struct PgToolStore {
    pool: PgPool,
}

impl PgToolStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolStore for PgToolStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserTool>, StoreError> {
        let tools = sqlx::query_as::<_, UserTool>(&format!(
            "SELECT {TOOL_COLUMNS} FROM user_tools WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tools)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_tools WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find(&self, id: i64) -> Result<Option<UserTool>, StoreError> {
        let tool = sqlx::query_as::<_, UserTool>(&format!(
            "SELECT {TOOL_COLUMNS} FROM user_tools WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tool)
    }

    async fn find_owned(&self, id: i64, user_id: Uuid) -> Result<Option<UserTool>, StoreError> {
        let tool = sqlx::query_as::<_, UserTool>(&format!(
            "SELECT {TOOL_COLUMNS} FROM user_tools WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tool)
    }

    async fn create(
        &self,
        user_id: Uuid,
        template_id: i64,
        config_json: Value,
    ) -> Result<UserTool, StoreError> {
        let tool = sqlx::query_as::<_, UserTool>(&format!(
            "INSERT INTO user_tools (user_id, template_id, config_json) \
             VALUES ($1, $2, $3) RETURNING {TOOL_COLUMNS}"
        ))
        .bind(user_id)
        .bind(template_id)
        .bind(config_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(tool)
    }

    async fn update_config(&self, id: i64, config_json: Value) -> Result<UserTool, StoreError> {
        let tool = sqlx::query_as::<_, UserTool>(&format!(
            "UPDATE user_tools SET config_json = $2 WHERE id = $1 RETURNING {TOOL_COLUMNS}"
        ))
        .bind(id)
        .bind(config_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(tool)
    }

    async fn delete_owned(&self, id: i64, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM user_tools WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
