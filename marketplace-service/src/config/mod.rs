use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const SERVICE_NAME: &str = "marketplace-service";

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub database: DatabaseConfig,
}

/// Store settings. The service runs without a store when either value is
/// missing; listing endpoints then answer with a database error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
}

impl DatabaseConfig {
    /// Connection string and database name, when both are configured.
    pub fn connection(&self) -> Option<(&str, &str)> {
        match (self.url.as_deref(), self.name.as_deref()) {
            (Some(url), Some(name)) => Some((url, name)),
            _ => None,
        }
    }
}

impl MarketplaceConfig {
    pub fn load() -> Result<Self, AppError> {
        // Loads .env and handles PORT / APP__PORT
        let common_config = core_config::Config::load()?;

        Ok(MarketplaceConfig {
            common: common_config,
            service_name: SERVICE_NAME.to_string(),
            database: DatabaseConfig {
                url: optional_env("DATABASE_URL"),
                name: optional_env("DATABASE_NAME"),
            },
        })
    }
}

/// Environment variable value, treating an empty string as unset.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
