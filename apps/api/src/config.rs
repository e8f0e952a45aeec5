use anyhow::{Context, Result};

use crate::search::mapper::ColumnMapping;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub typesense: TypesenseConfig,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Source CSV read by the importer on startup and via `/admin/import-data`.
    pub data_file: String,
    /// Column layout of `data_file`. Shared by every import path.
    pub columns: ColumnMapping,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct TypesenseConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub api_key: String,
    pub collection: String,
}

impl TypesenseConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let columns_profile = env_or("CSV_COLUMNS", "listing");
        let columns = ColumnMapping::from_profile(&columns_profile).with_context(|| {
            format!("CSV_COLUMNS must be 'listing' or 'normalized', got '{columns_profile}'")
        })?;

        Ok(Config {
            typesense: TypesenseConfig {
                host: env_or("TYPESENSE_HOST", "localhost"),
                port: env_or("TYPESENSE_PORT", "8108")
                    .parse::<u16>()
                    .context("TYPESENSE_PORT must be a valid port number")?,
                protocol: env_or("TYPESENSE_PROTOCOL", "http"),
                api_key: env_or("TYPESENSE_API_KEY", "xyz"),
                collection: env_or("TYPESENSE_COLLECTION", "jobs"),
            },
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: env_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            data_file: env_or("DATA_FILE", "data/job.csv"),
            columns,
            cors_origins: parse_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000",
            )),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
