use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings for the MySQL backend.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl DatabaseConfig {
    /// Builds a `mysql://` URL; user and password are percent-encoded.
    pub fn url(&self) -> Result<String, ConfigError> {
        let invalid = |name: &'static str| ConfigError::Invalid {
            name,
            reason: "cannot be used in a connection url".to_string(),
        };

        let mut url = Url::parse("mysql://localhost").map_err(|e| ConfigError::Invalid {
            name: "MYSQL_HOST",
            reason: e.to_string(),
        })?;
        url.set_host(Some(&self.host)).map_err(|e| ConfigError::Invalid {
            name: "MYSQL_HOST",
            reason: e.to_string(),
        })?;
        url.set_port(Some(self.port)).map_err(|_| invalid("MYSQL_PORT"))?;
        url.set_username(&self.user).map_err(|_| invalid("MYSQL_USER"))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| invalid("MYSQL_PASSWORD"))?;
        }
        url.set_path(&self.name);
        Ok(url.into())
    }
}

/// Pool sizing. `acquire_timeout` also bounds how long a single probe may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_connections: 5, acquire_timeout: Duration::from_secs(5) }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub pool: PoolConfig,
    pub retry: RetryPolicy,
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

impl Config {
    /// Legge la configurazione dalle variabili d'ambiente del processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading through `lookup`, so tests
    /// don't have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let database = DatabaseConfig {
            host: required("MYSQL_HOST")?,
            port: parse_or(&lookup, "MYSQL_PORT", 3306)?,
            user: required("MYSQL_USER")?,
            password: required("MYSQL_PASSWORD")?,
            name: required("MYSQL_DB")?,
        };

        let defaults = PoolConfig::default();
        let pool = PoolConfig {
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
        };
        if pool.max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".to_string(),
            });
        }

        let default_retry = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse_or(&lookup, "DB_MAX_RETRIES", default_retry.max_attempts)?,
            delay: Duration::from_secs(parse_or(
                &lookup,
                "DB_RETRY_DELAY_SECS",
                default_retry.delay.as_secs(),
            )?),
        };

        let bind_addr = parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 5000)))?;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self { database, pool, retry, bind_addr, log_level })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("'{raw}': {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 4] = [
        ("MYSQL_HOST", "db"),
        ("MYSQL_USER", "board"),
        ("MYSQL_PASSWORD", "s3cr3t"),
        ("MYSQL_DB", "bacheca"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = Config::from_lookup(env(&BASE)).expect("config");

        assert_eq!(config.database.port, 3306);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.retry.delay, Duration::from_secs(5));
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn each_required_var_is_fatal_when_absent() {
        for (missing, _) in BASE {
            let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != missing).collect();
            match Config::from_lookup(env(&pairs)) {
                Err(ConfigError::Missing(name)) => assert_eq!(name, missing),
                other => panic!("expected Missing({missing}), got {other:?}"),
            }
        }
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("MYSQL_PORT", "3307"),
            ("DB_MAX_RETRIES", "3"),
            ("DB_RETRY_DELAY_SECS", "0"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "2"),
        ]);
        let config = Config::from_lookup(env(&pairs)).expect("config");

        assert_eq!(config.database.port, 3307);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::ZERO);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.pool.max_connections, 2);
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let mut pairs = BASE.to_vec();
        pairs.push(("DB_MAX_RETRIES", "ten"));
        let err = Config::from_lookup(env(&pairs)).expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid { name: "DB_MAX_RETRIES", .. }));
    }

    #[test]
    fn url_encodes_credentials_and_debug_hides_password() {
        let db = DatabaseConfig {
            host: "db".to_string(),
            port: 3306,
            user: "board".to_string(),
            password: "p@ss/word".to_string(),
            name: "bacheca".to_string(),
        };

        let url = db.url().expect("url");
        assert_eq!(url, "mysql://board:p%40ss%2Fword@db:3306/bacheca");
        assert!(!format!("{db:?}").contains("p@ss"));
    }
}
