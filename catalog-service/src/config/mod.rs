use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_MONGO_URI: &str = "mongodb://mongo:27017/music_db";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreBackend,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    /// Overrides the database named in the URI.
    pub database: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl CatalogConfig {
    /// Common settings come from `APP__*`; the store is chosen by
    /// `CATALOG_STORE` and reached through `MONGO_URI`.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let store = env::var("CATALOG_STORE")
            .unwrap_or_else(|_| "mongo".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(CatalogConfig {
            common,
            mongodb: MongoConfig {
                uri: Secret::new(
                    env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string()),
                ),
                database: non_empty_var("MONGODB_DATABASE"),
            },
            store,
            otlp_endpoint: non_empty_var("OTLP_ENDPOINT"),
        })
    }

    /// In-memory store on an ephemeral port.
    pub fn in_memory() -> Self {
        CatalogConfig {
            common: core_config::Config { port: 0 },
            mongodb: MongoConfig {
                uri: Secret::new(DEFAULT_MONGO_URI.to_string()),
                database: None,
            },
            store: StoreBackend::Memory,
            otlp_endpoint: None,
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
