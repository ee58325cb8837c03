// config.rs
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::errors::{AppError, Result};

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-this-in-production";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub cricapi_key: Option<String>,
    pub cricapi_base_url: String,
    pub cricapi_timeout: Duration,
    pub team_aliases: HashMap<String, String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = var("MONGODB_URI")
            .or_else(|| var("DATABASE_URL"))
            .unwrap_or_else(|| "mongodb://localhost:27017".to_string());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("⚠️ JWT_SECRET is not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::configuration(format!("PORT must be a number, got '{}'", raw)))?,
            None => 5000,
        };

        let timeout_secs: u64 = match var("CRICAPI_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::configuration(format!("CRICAPI_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            None => 10,
        };

        let bootstrap_admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(BootstrapAdmin {
                email: var("ADMIN_EMAIL").unwrap_or_else(|| format!("{}@localhost", username)),
                username,
                password,
            }),
            _ => None,
        };

        Ok(AppConfig {
            database_url,
            database_name: var("DATABASE_NAME").unwrap_or_else(|| "ipl-team-website".to_string()),
            jwt_secret,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origin: var("CORS_ORIGIN"),
            cricapi_key: var("CRICAPI_KEY"),
            cricapi_base_url: var("CRICAPI_BASE_URL")
                .unwrap_or_else(|| "https://api.cricapi.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            cricapi_timeout: Duration::from_secs(timeout_secs),
            team_aliases: parse_team_aliases(var("TEAM_ALIASES").as_deref().unwrap_or(""))?,
            bootstrap_admin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses `alias=canonical;alias=canonical`.
fn parse_team_aliases(raw: &str) -> Result<HashMap<String, String>> {
    let mut aliases = HashMap::new();

    for entry in raw.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (alias, canonical) = entry.split_once('=').ok_or_else(|| {
            AppError::configuration(format!("TEAM_ALIASES entry '{}' is not alias=canonical", entry))
        })?;
        aliases.insert(alias.trim().to_string(), canonical.trim().to_string());
    }

    Ok(aliases)
}
