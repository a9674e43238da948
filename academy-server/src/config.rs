//! Server configuration

use crate::ordering::HealPolicy;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL; `None` runs against the in-memory store
    pub database_url: Option<String>,
    /// Run ordering transactions at SERIALIZABLE isolation
    pub db_serializable: bool,
    /// Consistency pass after committed moves and removals
    pub heal_policy: HealPolicy,
    /// Log level for this crate (overridden by RUST_LOG)
    pub log_level: Option<String>,
    /// Directory for daily rolling log files; stdout when unset
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let database_url = var("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let http_port = match var("HTTP_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| format!("HTTP_PORT is not a valid port: {p}"))?,
            None => 8080,
        };

        let db_serializable = match var("DB_SERIALIZABLE") {
            Some(v) => parse_bool(&v).ok_or_else(|| format!("DB_SERIALIZABLE is not a bool: {v}"))?,
            None => true,
        };

        let heal_policy = match var("HEAL_POLICY") {
            Some(v) => v.parse::<HealPolicy>()?,
            None => HealPolicy::default(),
        };

        Ok(Self {
            environment,
            http_port,
            database_url,
            db_serializable,
            heal_policy,
            log_level: var("LOG_LEVEL"),
            log_dir: var("LOG_DIR"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
