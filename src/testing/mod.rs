//! In-memory store implementations and router helpers for the test suite.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::{ToolTemplate, User, UserTool};
use crate::language::LanguageDetector;
use crate::services::{
    AppState, HealthProbe, QuotaOutcome, StoreError, TemplateStore, ToolStore, UserStore,
};

#[derive(Default)]
pub struct MemoryTemplateStore {
    templates: Mutex<HashMap<i64, ToolTemplate>>,
    next_id: AtomicI64,
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn find(&self, id: i64) -> Result<Option<ToolTemplate>, StoreError> {
        Ok(self.templates.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryToolStore {
    tools: Mutex<HashMap<i64, UserTool>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ToolStore for MemoryToolStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserTool>, StoreError> {
        let mut tools: Vec<UserTool> = self
            .tools
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tools.sort_by_key(|t| t.id);
        Ok(tools)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64, StoreError> {
        Ok(self
            .tools
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .count() as i64)
    }

    async fn find(&self, id: i64) -> Result<Option<UserTool>, StoreError> {
        Ok(self.tools.lock().unwrap().get(&id).cloned())
    }

    async fn find_owned(&self, id: i64, user_id: Uuid) -> Result<Option<UserTool>, StoreError> {
        Ok(self
            .tools
            .lock()
            .unwrap()
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn create(
        &self,
        user_id: Uuid,
        template_id: i64,
        config_json: Value,
    ) -> Result<UserTool, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let tool = UserTool {
            id,
            user_id,
            template_id: Some(template_id),
            config_json,
            created_at: Utc::now(),
        };
        self.tools.lock().unwrap().insert(id, tool.clone());
        Ok(tool)
    }

    async fn update_config(&self, id: i64, config_json: Value) -> Result<UserTool, StoreError> {
        let mut tools = self.tools.lock().unwrap();
        let tool = tools.get_mut(&id).ok_or(StoreError::Sqlx(sqlx::Error::RowNotFound))?;
        tool.config_json = config_json;
        Ok(tool.clone())
    }

    async fn delete_owned(&self, id: i64, user_id: Uuid) -> Result<bool, StoreError> {
        let mut tools = self.tools.lock().unwrap();
        match tools.get(&id) {
            Some(tool) if tool.user_id == user_id => {
                tools.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn consume_quota(&self, id: Uuid) -> Result<QuotaOutcome, StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) if user.quota > 0 => {
                user.quota -= 1;
                Ok(QuotaOutcome::Consumed(user.quota))
            }
            Some(_) => Ok(QuotaOutcome::Exhausted),
            None => Ok(QuotaOutcome::UnknownUser),
        }
    }
}

/// Detector with a canned answer, keeping language assertions deterministic.
pub struct FixedDetector(pub &'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> String {
        self.0.to_string()
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthProbe for AlwaysHealthy {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Shared in-memory backend: seed fixtures, build routers, inspect rows.
pub struct TestBackend {
    pub templates: Arc<MemoryTemplateStore>,
    pub tools: Arc<MemoryToolStore>,
    pub users: Arc<MemoryUserStore>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            templates: Arc::new(MemoryTemplateStore::default()),
            tools: Arc::new(MemoryToolStore::default()),
            users: Arc::new(MemoryUserStore::default()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            templates: self.templates.clone(),
            tools: self.tools.clone(),
            users: self.users.clone(),
            detector: Arc::new(FixedDetector("en")),
            health: Arc::new(AlwaysHealthy),
        }
    }

    pub fn app(&self) -> Router {
        crate::handlers::app(self.state())
    }

    pub fn seed_template(&self, config_json: Value) -> i64 {
        let id = self.templates.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let template = ToolTemplate {
            id,
            name: format!("template-{}", id),
            tool_type: "planner".to_string(),
            description: String::new(),
            config_json,
            language: "en".to_string(),
        };
        self.templates.templates.lock().unwrap().insert(id, template);
        id
    }

    /// Seed (or reset) a principal row with the given quota.
    pub fn set_quota(&self, user_id: Uuid, quota: i32) {
        let user = User {
            id: user_id,
            email: "test@example.com".to_string(),
            quota,
            created_at: Utc::now(),
        };
        self.users.users.lock().unwrap().insert(user_id, user);
    }

    pub fn quota(&self, user_id: Uuid) -> Option<i32> {
        self.users
            .users
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|u| u.quota)
    }

    pub fn tool(&self, id: i64) -> Option<UserTool> {
        self.tools.tools.lock().unwrap().get(&id).cloned()
    }

    pub fn tool_count(&self, user_id: Uuid) -> usize {
        self.tools
            .tools
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .count()
    }
}

/// Authorization header value for a signed test principal.
pub fn bearer(user_id: Uuid) -> String {
    let token = generate_jwt(Claims::new(user_id, "test@example.com".to_string()))
        .expect("development config carries a JWT secret");
    format!("Bearer {}", token)
}

/// Drive one request through the router, returning status and JSON body.
pub async fn request(
    app: Router,
    method: Method,
    path: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}
