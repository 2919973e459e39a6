use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::ToolTemplate;

use super::{StoreError, TemplateStore};

/// Template catalog over Postgres. Templates are written out of band
/// (seeding, back office); this service only ever reads them.
pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn find(&self, id: i64) -> Result<Option<ToolTemplate>, StoreError> {
        let template = sqlx::query_as::<_, ToolTemplate>(
            "SELECT id, name, tool_type, description, config_json, language \
             FROM tool_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }
}
