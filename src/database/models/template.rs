use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Shared, immutable blueprint a user tool is derived from.
///
/// `config_json` holds arbitrary keys plus an optional `content` block,
/// either a flat value or a map of language code to localized value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolTemplate {
    pub id: i64,
    pub name: String,
    /// Tool kind tag: planner, checklist, etc.
    pub tool_type: String,
    pub description: String,
    pub config_json: Value,
    /// Authoring language code ('en', 'hi', ...)
    pub language: String,
}
