pub mod template_service;
pub mod tool_service;
pub mod user_service;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{ToolTemplate, User, UserTool};
use crate::language::LanguageDetector;

pub use template_service::PgTemplateStore;
pub use tool_service::PgToolStore;
pub use user_service::PgUserStore;

/// Errors surfaced by store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Outcome of an atomic quota decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaOutcome {
    /// Decremented; remaining uses after this call
    Consumed(i32),
    /// Counter already at the floor; nothing was written
    Exhausted,
    /// No row for the principal (stale credential)
    UnknownUser,
}

/// Read access to the shared template catalog.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<ToolTemplate>, StoreError>;
}

/// Per-user tool instance persistence. Every read/update/delete that takes
/// a `user_id` applies the ownership filter at the store layer.
#[async_trait]
pub trait ToolStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserTool>, StoreError>;
    async fn count_for_user(&self, user_id: Uuid) -> Result<i64, StoreError>;
    /// Unfiltered lookup; callers must check ownership themselves.
    async fn find(&self, id: i64) -> Result<Option<UserTool>, StoreError>;
    async fn find_owned(&self, id: i64, user_id: Uuid) -> Result<Option<UserTool>, StoreError>;
    async fn create(
        &self,
        user_id: Uuid,
        template_id: i64,
        config_json: Value,
    ) -> Result<UserTool, StoreError>;
    async fn update_config(&self, id: i64, config_json: Value) -> Result<UserTool, StoreError>;
    /// Returns whether a row owned by `user_id` was deleted.
    async fn delete_owned(&self, id: i64, user_id: Uuid) -> Result<bool, StoreError>;
}

/// Principal rows: identity lookup plus the prompt-parse usage counter.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Atomic decrement-with-floor-check; never read-modify-write.
    async fn consume_quota(&self, id: Uuid) -> Result<QuotaOutcome, StoreError>;
}

/// Backing-store liveness probe for /health.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Shared handler state: store seams plus the language detector.
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<dyn TemplateStore>,
    pub tools: Arc<dyn ToolStore>,
    pub users: Arc<dyn UserStore>,
    pub detector: Arc<dyn LanguageDetector>,
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Production wiring: every seam backed by the Postgres pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            templates: Arc::new(PgTemplateStore::new(pool.clone())),
            tools: Arc::new(PgToolStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            detector: Arc::new(crate::language::WhatlangDetector),
            health: Arc::new(PgHealthProbe { pool }),
        }
    }
}

pub struct PgHealthProbe {
    pub pool: PgPool,
}

#[async_trait]
impl HealthProbe for PgHealthProbe {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::database::health_check(&self.pool).await?;
        Ok(())
    }
}
