use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for generated link hrefs. Empty keeps links relative.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `None` runs the API on the seeded in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub prefix: String,
    pub default_ttl_secs: u64,
    pub collection_ttl_secs: u64,
    /// Upper bound on stored entries; least recently used ones go first.
    pub max_entries: u64,
}

/// Largest `limit` a list request may ask for.
pub const PAGE_SIZE_LIMIT: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,

    #[error("Invalid page sizes: default {default} exceeds max {max}")]
    InvalidPageSize { default: u64, max: u64 },

    #[error("Invalid max page size {0}: must be between 1 and 100")]
    InvalidMaxPageSize(u64),

    #[error("CACHE_MAX_ENTRIES must be at least 1")]
    InvalidCacheCapacity,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn collection_ttl(&self) -> Duration {
        Duration::from_secs(self.collection_ttl_secs)
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("PUBLIC_BASE_URL") {
            self.server.public_base_url = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Cache overrides
        if let Ok(v) = env::var("CACHE_PREFIX") {
            self.cache.prefix = v;
        }
        if let Ok(v) = env::var("CACHE_DEFAULT_TTL") {
            self.cache.default_ttl_secs = v.parse().unwrap_or(self.cache.default_ttl_secs);
        }
        if let Ok(v) = env::var("CACHE_COLLECTION_TTL") {
            self.cache.collection_ttl_secs = v.parse().unwrap_or(self.cache.collection_ttl_secs);
        }
        if let Ok(v) = env::var("CACHE_MAX_ENTRIES") {
            self.cache.max_entries = v.parse().unwrap_or(self.cache.max_entries);
        }

        // API overrides
        if let Ok(v) = env::var("API_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.api.max_page_size == 0 || self.api.max_page_size > PAGE_SIZE_LIMIT {
            return Err(ConfigError::InvalidMaxPageSize(self.api.max_page_size));
        }
        if self.api.default_page_size == 0 || self.api.default_page_size > self.api.max_page_size {
            return Err(ConfigError::InvalidPageSize {
                default: self.api.default_page_size,
                max: self.api.max_page_size,
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                public_base_url: String::new(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            cache: CacheConfig {
                prefix: "app_api_".to_string(),
                default_ttl_secs: 3600,
                collection_ttl_secs: 1800,
                max_entries: 10_000,
            },
            api: ApiConfig {
                default_page_size: 10,
                max_page_size: PAGE_SIZE_LIMIT,
            },
            security: SecurityConfig {
                jwt_secret: "bilemo-development-secret".to_string(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.host = "0.0.0.0".to_string();
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.security.jwt_secret = String::new();
        config.security.jwt_expiry_hours = 4;
        config.security.cors_origins = vec!["https://staging.bilemo.com".to_string()];
        config
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                public_base_url: String::new(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            cache: CacheConfig {
                prefix: "app_api_".to_string(),
                default_ttl_secs: 3600,
                collection_ttl_secs: 1800,
                max_entries: 50_000,
            },
            api: ApiConfig {
                default_page_size: 10,
                max_page_size: PAGE_SIZE_LIMIT,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 1,
                enable_cors: true,
                cors_origins: vec!["https://app.bilemo.com".to_string()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.cache.prefix, "app_api_");
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(3600));
        assert_eq!(config.cache.collection_ttl(), Duration::from_secs(1800));
        assert_eq!(config.api.max_page_size, 100);
        assert!(config.database.url.is_none());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_default_production_config_requires_secret() {
        let config = AppConfig::production();
        assert!(!config.database.run_migrations);
        assert_eq!(config.validate(), Err(ConfigError::MissingJwtSecret));
    }

    #[test]
    fn test_staging_inherits_development_cache_settings() {
        let config = AppConfig::staging();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.cache.prefix, "app_api_");
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_page_size_validation() {
        let mut config = AppConfig::development();
        config.api.default_page_size = 500;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPageSize { default: 500, max: 100 })
        );
    }

    #[test]
    fn test_max_page_size_is_capped() {
        let mut config = AppConfig::development();
        config.api.max_page_size = 500;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxPageSize(500)));

        config.api.max_page_size = u64::MAX;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxPageSize(u64::MAX)));

        config.api.max_page_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxPageSize(0)));

        config.api.max_page_size = PAGE_SIZE_LIMIT;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_cache_capacity_must_be_positive() {
        let mut config = AppConfig::development();
        config.cache.max_entries = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidCacheCapacity));
    }
}
