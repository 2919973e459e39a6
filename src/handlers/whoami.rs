use axum::extract::State;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::AppState;

/// GET /auth/whoami - Current principal as the store knows it
///
/// Resolves the token's subject against the user store so clients see the
/// live quota counter, not a stale claim.
pub async fn whoami(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .users
        .find(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "quota": user.quota,
        "created_at": user.created_at,
    })))
}
