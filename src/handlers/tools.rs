use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::database::models::UserTool;
use crate::derive::{derive_config, UpdateSource, DEFAULT_LANGUAGE};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateToolRequest {
    pub template_id: i64,
    /// Overrides the template's document as the derivation base
    pub config_json: Option<Value>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateToolRequest {
    /// Collection PATCH addresses the instance by body id
    pub id: Option<i64>,
    pub config_json: Option<Value>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteToolRequest {
    pub id: Option<i64>,
}

/// Instance fields exposed to clients (the owner column stays internal).
fn tool_body(tool: &UserTool) -> Value {
    json!({
        "id": tool.id,
        "template": tool.template_id,
        "config_json": tool.config_json,
        "created_at": tool.created_at,
    })
}

/// GET /user-tools/ - List the caller's tool instances
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let tools = state.tools.list_for_user(user.user_id).await?;
    let body: Vec<Value> = tools.iter().map(tool_body).collect();
    Ok(Json(json!(body)))
}

/// POST /user-tools/ - Create an instance from a template
///
/// Rejected with 403 once the caller owns the configured maximum of active
/// instances. The stored config is derived from the template document (or
/// the request's `config_json` override) for the requested language.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateToolRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let limit = config::config().api.max_active_tools;
    let owned = state.tools.count_for_user(user.user_id).await?;
    if owned >= limit {
        return Err(ApiError::forbidden(format!(
            "Active tool limit reached ({}). Please delete a tool to create a new one or upgrade to premium.",
            limit
        )));
    }

    let template = state
        .templates
        .find(payload.template_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Template not found."))?;

    let base = payload.config_json.unwrap_or_else(|| template.config_json.clone());
    let derived = derive_config(&base, payload.language.as_deref());

    let tool = state.tools.create(user.user_id, template.id, derived).await?;
    tracing::info!(user = %user.email, tool_id = tool.id, template_id = template.id, "tool created");

    Ok((StatusCode::CREATED, Json(tool_body(&tool))))
}

/// PATCH /user-tools/ - Update an owned instance addressed by body id
pub async fn update_collection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateToolRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id = payload
        .id
        .ok_or_else(|| ApiError::bad_request("Tool ID required."))?;

    // Ownership filter at the store layer: someone else's id reads as absent
    let tool = state
        .tools
        .find_owned(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tool not found."))?;

    let updated = apply_update(&state, tool, payload.config_json, payload.language).await?;
    Ok(Json(tool_body(&updated)))
}

/// DELETE /user-tools/ - Delete an owned instance addressed by body id
pub async fn delete_collection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<DeleteToolRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id = payload
        .id
        .ok_or_else(|| ApiError::bad_request("Tool ID required."))?;

    if state.tools.delete_owned(id, user.user_id).await? {
        Ok(Json(json!({"message": "Tool deleted successfully."})))
    } else {
        Err(ApiError::not_found("Tool not found."))
    }
}

/// GET /user-tools/:id/ - Retrieve a single owned instance
pub async fn retrieve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let tool = find_for_owner(&state, id, &user).await?;
    Ok(Json(tool_body(&tool)))
}

/// PUT/PATCH /user-tools/:id/ - Update a single owned instance
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateToolRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let tool = find_for_owner(&state, id, &user).await?;

    let updated = apply_update(&state, tool, payload.config_json, payload.language).await?;
    Ok(Json(tool_body(&updated)))
}

/// DELETE /user-tools/:id/ - Delete a single owned instance
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let tool = find_for_owner(&state, id, &user).await?;
    state.tools.delete_owned(tool.id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Detail routes split "absent" (404) from "owned by someone else" (403).
async fn find_for_owner(state: &AppState, id: i64, user: &AuthUser) -> Result<UserTool, ApiError> {
    let tool = state
        .tools
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tool not found."))?;

    if tool.user_id != user.user_id {
        return Err(ApiError::forbidden("Permission denied."));
    }
    Ok(tool)
}

/// Re-derive and persist an instance config.
///
/// The derivation base is, in order: the request's `config_json`, the
/// source template (default `UpdateSource::Template`, so repeated language
/// switches round-trip), or the instance's own config when configured so
/// or when the template reference has been nulled out.
async fn apply_update(
    state: &AppState,
    tool: UserTool,
    config_json: Option<Value>,
    language: Option<String>,
) -> Result<UserTool, ApiError> {
    let language = match language {
        Some(lang) if !lang.is_empty() => lang,
        _ => tool
            .config_json
            .get("language")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string(),
    };

    let base = match config_json {
        Some(config) => config,
        None => match config::config().derive.update_source {
            UpdateSource::Template => match tool.template_id {
                Some(template_id) => state
                    .templates
                    .find(template_id)
                    .await?
                    .map(|t| t.config_json)
                    .unwrap_or_else(|| tool.config_json.clone()),
                None => tool.config_json.clone(),
            },
            UpdateSource::Instance => tool.config_json.clone(),
        },
    };

    let derived = derive_config(&base, Some(&language));
    Ok(state.tools.update_config(tool.id, derived).await?)
}
