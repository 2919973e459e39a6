use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::derive::UpdateSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub derive: DeriveConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Maximum active tool instances one user may own.
    pub max_active_tools: i64,
    /// Prompt-parse uses granted to newly seeded users.
    pub default_quota: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveConfig {
    /// Document a PATCH re-derives the instance config from.
    pub update_source: UpdateSource,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, then specific env vars on top
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("API_MAX_ACTIVE_TOOLS") {
            self.api.max_active_tools = v.parse().unwrap_or(self.api.max_active_tools);
        }
        if let Ok(v) = env::var("API_DEFAULT_QUOTA") {
            self.api.default_quota = v.parse().unwrap_or(self.api.default_quota);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        if let Ok(v) = env::var("DERIVE_UPDATE_SOURCE") {
            self.derive.update_source = match v.to_lowercase().as_str() {
                "instance" => UpdateSource::Instance,
                "template" => UpdateSource::Template,
                _ => self.derive.update_source,
            };
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            api: ApiConfig {
                max_active_tools: 5,
                default_quota: 100,
            },
            security: SecurityConfig {
                jwt_secret: "tooldeck-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            derive: DeriveConfig {
                update_source: UpdateSource::Template,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            api: ApiConfig {
                max_active_tools: 5,
                default_quota: 100,
            },
            security: SecurityConfig {
                // Must be supplied via JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            derive: DeriveConfig {
                update_source: UpdateSource::Template,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            api: ApiConfig {
                max_active_tools: 5,
                default_quota: 100,
            },
            security: SecurityConfig {
                // Must be supplied via JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            derive: DeriveConfig {
                update_source: UpdateSource::Template,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.max_active_tools, 5);
        assert_eq!(config.api.default_quota, 100);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.derive.update_source, UpdateSource::Template);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.api.max_active_tools, 5);
        // Production refuses to ship a baked-in secret
        assert!(config.security.jwt_secret.is_empty());
    }
}
