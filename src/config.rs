// ⚙️ Configuration
//
// Layers, later wins:
// 1. Built-in defaults (local development endpoints)
// 2. JSON file named by EXPENSE_PILOT_CONFIG
// 3. EXPENSE_PILOT_* environment variables

use crate::entities::{Category, CategoryRegistry};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "EXPENSE_PILOT_CONFIG";
const ENV_PREFIX: &str = "EXPENSE_PILOT_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the dashboard server listens on
    pub bind_addr: String,

    /// Authentication endpoint (POST {username, password} -> {token})
    pub auth_url: String,

    /// Expense registration endpoint (bearer-authenticated)
    pub register_expense_url: String,

    /// Base URL under which the AI flows are exposed
    pub ai_base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_api_key: Option<String>,

    pub request_timeout_secs: u64,

    /// Sessions without a request for this long are dropped
    pub session_idle_secs: u64,

    /// Mark the session cookie `Secure` (set when served behind HTTPS)
    pub secure_cookies: bool,

    /// Category seed list; None means the stock categories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "0.0.0.0:3000".to_string(),
            auth_url: "http://localhost:8080/auth/login".to_string(),
            register_expense_url: "http://localhost:8080/api/v1/register-expense".to_string(),
            ai_base_url: "http://localhost:3400".to_string(),
            ai_api_key: None,
            request_timeout_secs: 30,
            session_idle_secs: 1800,
            secure_cookies: false,
            categories: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional config file, then environment overrides
    pub fn load() -> AppResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => AppConfig::from_file(path.trim())?,
            _ => AppConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Apply overrides from a key lookup (keys without the prefix)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("AUTH_URL") {
            self.auth_url = value;
        }
        if let Some(value) = lookup("REGISTER_EXPENSE_URL") {
            self.register_expense_url = value;
        }
        if let Some(value) = lookup("AI_BASE_URL") {
            self.ai_base_url = value;
        }
        if let Some(value) = lookup("AI_API_KEY") {
            self.ai_api_key = Some(value).filter(|v| !v.is_empty());
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = value.trim().parse().map_err(|_| {
                AppError::Config(format!("REQUEST_TIMEOUT_SECS is not a number: {}", value))
            })?;
        }
        if let Some(value) = lookup("SESSION_IDLE_SECS") {
            self.session_idle_secs = value.trim().parse().map_err(|_| {
                AppError::Config(format!("SESSION_IDLE_SECS is not a number: {}", value))
            })?;
        }
        if let Some(value) = lookup("SECURE_COOKIES") {
            self.secure_cookies = value.trim().parse().map_err(|_| {
                AppError::Config(format!("SECURE_COOKIES must be true or false: {}", value))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config("request_timeout_secs must be positive".to_string()));
        }
        if self.session_idle_secs == 0 {
            return Err(AppError::Config("session_idle_secs must be positive".to_string()));
        }
        for (name, url) in [
            ("auth_url", &self.auth_url),
            ("register_expense_url", &self.register_expense_url),
            ("ai_base_url", &self.ai_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!("{} must be an http(s) URL: {}", name, url)));
            }
        }
        self.category_registry().map(|_| ())
    }

    /// Fresh registry for a new session
    pub fn category_registry(&self) -> AppResult<CategoryRegistry> {
        match &self.categories {
            Some(categories) => CategoryRegistry::from_categories(categories.clone()),
            None => Ok(CategoryRegistry::with_defaults()),
        }
    }
}
