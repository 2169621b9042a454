use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    pub max_jwt_expiration: u64,
}

/// Where the external analysis service lives and which vector store it reads.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub service_url: String,
    pub timeout_secs: u64,
    pub vector_db_path: String,
    pub vector_db_collection: String,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub report_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("DB_MAX_CONNECTIONS must be an integer")?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .context("DB_MIN_CONNECTIONS must be an integer")?,
            },
            auth: AuthConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
                max_jwt_expiration: env::var("MAX_JWT_EXPIRATION")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .context("MAX_JWT_EXPIRATION must be a number of seconds")?,
            },
            analysis: AnalysisConfig {
                service_url: env::var("ANALYSIS_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                timeout_secs: env::var("ANALYSIS_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .context("ANALYSIS_TIMEOUT_SECS must be a number of seconds")?,
                vector_db_path: env::var("VECTOR_DB_PATH")
                    .unwrap_or_else(|_| "./vector_db".to_string()),
                vector_db_collection: env::var("VECTOR_DB_COLLECTION")
                    .unwrap_or_else(|_| "companies".to_string()),
            },
            storage: StorageConfig {
                report_dir: env::var("REPORT_DIR")
                    .unwrap_or_else(|_| "./reports".to_string())
                    .into(),
            },
        })
    }
}
