pub mod prompt;
pub mod tools;
pub mod whoami;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::jwt_auth_middleware;
use crate::services::AppState;

/// Assemble the full application router over the given state.
pub fn app(state: AppState) -> Router {
    let user_tools = get(tools::list)
        .post(tools::create)
        .patch(tools::update_collection)
        .delete(tools::delete_collection);
    let user_tool = get(tools::retrieve)
        .put(tools::update)
        .patch(tools::update)
        .delete(tools::destroy);

    // Existing clients use the trailing-slash form; accept both.
    let protected = Router::new()
        .route("/auth/whoami", get(whoami::whoami))
        .route("/parse-prompt", post(prompt::parse_prompt))
        .route("/parse-prompt/", post(prompt::parse_prompt))
        .route("/user-tools", user_tools.clone())
        .route("/user-tools/", user_tools)
        .route("/user-tools/:id", user_tool.clone())
        .route("/user-tools/:id/", user_tool)
        .layer(middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Bearer-token protected API
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Tooldeck API",
        "version": version,
        "description": "Backend for user-customized tool configurations derived from shared templates",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "whoami": "GET /auth/whoami (protected)",
            "parse_prompt": "POST /parse-prompt/ (protected)",
            "user_tools": "/user-tools/ (protected - GET, POST, PATCH, DELETE)",
            "user_tool": "/user-tools/:id/ (protected - GET, PUT, PATCH, DELETE)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
