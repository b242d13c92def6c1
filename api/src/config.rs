use std::env;

use thiserror::Error;

use crate::auth::hash_password;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("MANAGER_PASSWORD_SHA256 must be 64 hex characters")]
    InvalidPasswordDigest,

    #[error("SEED_DEMO_DATA must be true or false, got {0:?}")]
    InvalidFlag(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the in-memory store
    pub database_url: Option<String>,
    pub port: u16,
    pub manager_username: String,
    /// Lowercase hex SHA-256 of the manager password; None disables manager login
    pub manager_password_sha256: Option<String>,
    /// Register the starter catalog when the store has no books
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => 8080,
        };

        let manager_password_sha256 = match get("MANAGER_PASSWORD_SHA256") {
            Some(digest) => Some(parse_digest(&digest)?),
            None => get("MANAGER_PASSWORD").map(|p| hash_password(&p)),
        };

        let seed_demo_data = match get("SEED_DEMO_DATA") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::InvalidFlag(raw)),
            },
            None => true,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            port,
            manager_username: get("MANAGER_USERNAME").unwrap_or_else(|| "manager".to_string()),
            manager_password_sha256,
            seed_demo_data,
        })
    }

    /// Check if a manager credential is configured
    pub fn manager_login_enabled(&self) -> bool {
        self.manager_password_sha256.is_some()
    }
}

fn parse_digest(raw: &str) -> Result<String, ConfigError> {
    let digest = raw.trim().to_ascii_lowercase();
    match hex::decode(&digest) {
        Ok(bytes) if bytes.len() == 32 => Ok(digest),
        _ => Err(ConfigError::InvalidPasswordDigest),
    }
}
