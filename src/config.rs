//! Configuration management for the KBOeL client

use config::{Config, ConfigError, Environment, File};
use indexmap::IndexMap;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::models::claims::ClaimSchema;
use crate::session::guard::RoleMatchPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend REST API, e.g. "https://api.kboel.com/api/v1"
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Path of the persisted token file (the native analog of the browser's
    /// localStorage entry under the fixed "jwtToken" key)
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    /// Which claim layout to accept when resolving roles from a token
    #[serde(default = "default_claim_schema")]
    pub claim_schema: ClaimSchema,
    /// How a multi-role claim is matched against a route's allow-list
    #[serde(default = "default_role_policy")]
    pub role_policy: RoleMatchPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Where unauthenticated visitors are redirected
    #[serde(default = "default_sign_in")]
    pub sign_in: String,
    /// Where authenticated visitors with an insufficient role are redirected.
    /// Defaults to the not-found page, matching the historical behavior of
    /// sending forbidden visitors to /404; point it at a dedicated /403 view
    /// to separate the two outcomes.
    #[serde(default = "default_forbidden")]
    pub forbidden: String,
    /// Protected route -> allowed roles. Routes not listed here are public.
    #[serde(default = "crate::models::route::default_protected")]
    pub protected: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix KBOEL_). Keys use a
            // double-underscore separator so underscore-bearing field
            // names survive: KBOEL_SESSION__TOKEN_PATH -> session.token_path
            .add_source(
                Environment::with_prefix("KBOEL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override API base URL from API_BASE_URL env var if present
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            routes: RoutesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
            claim_schema: default_claim_schema(),
            role_policy: default_role_policy(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            sign_in: default_sign_in(),
            forbidden: default_forbidden(),
            protected: crate::models::route::default_protected(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_claim_schema() -> ClaimSchema {
    ClaimSchema::Auto
}

fn default_role_policy() -> RoleMatchPolicy {
    RoleMatchPolicy::First
}

fn default_sign_in() -> String {
    "/auth".to_string()
}

fn default_forbidden() -> String {
    "/404".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_token_path() -> PathBuf {
    dirs_fallback().join("kboel").join("jwt_token")
}

/// XDG-ish data directory without pulling in a platform crate
fn dirs_fallback() -> PathBuf {
    env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .unwrap_or_else(env::temp_dir)
}
