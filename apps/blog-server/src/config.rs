//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blog_infra::StorageConfig;
use blog_infra::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_OP_TIMEOUT};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// `DATABASE_URL` unset (or blank) selects the in-memory backend.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut storage = StorageConfig::new(lookup("DATABASE_URL").unwrap_or_default());
        storage.max_connections = parsed::<u32, _>(&lookup, "DB_MAX_CONNECTIONS")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        storage.min_connections = parsed::<u32, _>(&lookup, "DB_MIN_CONNECTIONS").unwrap_or(1);
        storage.op_timeout = parsed::<u64, _>(&lookup, "DB_OP_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_OP_TIMEOUT);
        // Any set value seeds; unparseable ones clamp like zero does.
        storage.seed_posts = lookup("BLOG_SEED_POSTS").map(|v| parse_trimmed::<i64>(&v).unwrap_or(0));
        storage.clear_storage = lookup("BLOG_CLEAR_STORAGE")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed::<u16, _>(&lookup, "PORT").unwrap_or(8080),
            storage,
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| parse_trimmed(&v))
}

fn parse_trimmed<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
