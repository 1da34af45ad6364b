/// Configuration for the API server
///
/// Loaded once at startup from environment variables (a `.env` file is
/// honoured) and handed to [`AppState`](crate::app::AppState); nothing reads
/// the environment after that.
///
/// # Environment Variables
///
/// - `API_HOST` (default `0.0.0.0`), `API_PORT` (default `8000`)
/// - `CORS_ORIGINS`: comma separated origins, `*` for any (default `*`)
/// - `DATABASE_URL`: PostgreSQL connection string; unset selects the in-memory store
/// - `DATABASE_MAX_CONNECTIONS` (default 10)
/// - `SECRET_KEY`: token signing key, at least 32 characters (required)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES` (default 30)
/// - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`, `PASSWORD_HASH_PARALLELISM`
///   (defaults 65536, 3, 4)
/// - `OPENLIBRARY_BASE_URL`, `OPENLIBRARY_COVERS_URL`, `CATALOG_TIMEOUT_SECONDS` (default 10)
/// - `LOG_FORMAT`: `pretty` or `json` (default `pretty`)
///
/// # Example
///
/// ```no_run
/// use solin_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::{bail, Context};
use chrono::Duration;
use solin_shared::auth::{jwt::DEFAULT_TOKEN_TTL_MINUTES, password::HashingParams, AuthSettings};
use solin_shared::catalog::CatalogConfig;
use std::str::FromStr;

/// Shortest accepted signing key
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    /// `None` runs against the in-memory store
    pub database: Option<DatabaseConfig>,

    pub auth: AuthConfig,

    pub catalog: CatalogSettings,

    pub log_format: LogFormat,
}

/// HTTP listener and CORS
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing key
    pub secret: String,

    pub token_ttl_minutes: i64,

    pub hashing: HashingParams,
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
    pub covers_url: String,
    pub timeout_seconds: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: '{}'", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = CatalogConfig::default();
        let default_hashing = HashingParams::default();

        let secret = lookup("SECRET_KEY")
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;
        if secret.chars().count() < MIN_SECRET_LEN {
            bail!("SECRET_KEY must be at least {} characters long", MIN_SECRET_LEN);
        }

        let token_ttl_minutes = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        if token_ttl_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let database = match lookup("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            }),
            None => None,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Pretty,
        };

        Ok(Self {
            api: ApiConfig {
                host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "API_PORT", 8000)?,
                cors_origins,
            },
            database,
            auth: AuthConfig {
                secret,
                token_ttl_minutes,
                hashing: HashingParams {
                    memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", default_hashing.memory_kib)?,
                    iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", default_hashing.iterations)?,
                    parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", default_hashing.parallelism)?,
                },
            },
            catalog: CatalogSettings {
                base_url: lookup("OPENLIBRARY_BASE_URL").unwrap_or(defaults.base_url),
                covers_url: lookup("OPENLIBRARY_COVERS_URL").unwrap_or(defaults.covers_url),
                timeout_seconds: parse_or(&lookup, "CATALOG_TIMEOUT_SECONDS", defaults.timeout.as_secs())?,
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Settings for the identity flows and the access gate
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.auth.secret.clone(),
            token_ttl: Duration::minutes(self.auth.token_ttl_minutes),
            hashing: self.auth.hashing,
        }
    }

    /// Settings for the Open Library client
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog.base_url.clone(),
            covers_url: self.catalog.covers_url.clone(),
            timeout: std::time::Duration::from_secs(self.catalog.timeout_seconds),
        }
    }
}
