// Service configuration
// Read once at startup from the environment (after .env is merged by dotenv)

use argon2::Params;

use crate::auth::token::DEFAULT_TOKEN_TTL_SECONDS;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Argon2 defaults (argon2 crate's recommended parameters)
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Process-wide configuration values
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

// Keep the secret out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .field("hash_parallelism", &self.hash_parallelism)
            .finish()
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let token_ttl_seconds = parse_or(&lookup, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        if token_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_SECONDS",
                value: token_ttl_seconds.to_string(),
            });
        }

        let hash_memory_kib = parse_or(&lookup, "HASH_MEMORY_KIB", DEFAULT_HASH_MEMORY_KIB)?;
        let hash_iterations = parse_or(&lookup, "HASH_ITERATIONS", DEFAULT_HASH_ITERATIONS)?;
        let hash_parallelism = parse_or(&lookup, "HASH_PARALLELISM", DEFAULT_HASH_PARALLELISM)?;

        // Reject cost combinations argon2 would refuse later
        if Params::new(hash_memory_kib, hash_iterations, hash_parallelism, None).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "HASH_*",
                value: format!(
                    "m={},t={},p={}",
                    hash_memory_kib, hash_iterations, hash_parallelism
                ),
            });
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_seconds,
            hash_memory_kib,
            hash_iterations,
            hash_parallelism,
        })
    }

    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
