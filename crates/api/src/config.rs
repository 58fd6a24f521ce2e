use std::path::PathBuf;

use axum::http::HeaderValue;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Invalid CORS origin '{0}'")]
    CorsOrigin(String),
}

/// Server configuration loaded from environment variables.
///
/// Built once in `main` and shared through [`crate::state::AppState`].
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Directory served under `/static` (default: `static`).
    pub static_dir: PathBuf,
    /// Sample folder relative to `static_dir` (default: `sound_files`).
    pub sound_folder: String,
    /// Batch size when `/get-sounds` is called without `count` (default: `10`).
    pub default_batch_size: usize,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `DATABASE_URL`         | built from `DB_*` below    |
    /// | `DB_USER`              | `postgres`                 |
    /// | `DB_PASSWORD`          | `postgres`                 |
    /// | `DB_HOST`              | `localhost`                |
    /// | `DB_PORT`              | `5432`                     |
    /// | `DB_NAME`              | `sound_test_db`            |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `STATIC_DIR`           | `static`                   |
    /// | `SOUND_FOLDER`         | `sound_files`              |
    /// | `DEFAULT_BATCH_SIZE`   | `10`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USER", "postgres"),
                var("DB_PASSWORD", "postgres"),
                var("DB_HOST", "localhost"),
                var("DB_PORT", "5432"),
                var("DB_NAME", "sound_test_db"),
            ),
        };

        let cors_origins = var("CORS_ORIGINS", "http://localhost:5000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::CorsOrigin(o.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", &var("PORT", "5000"), "u16")?,
            database_url,
            db_max_connections: parse("DB_MAX_CONNECTIONS", &var("DB_MAX_CONNECTIONS", "20"), "u32")?,
            static_dir: PathBuf::from(var("STATIC_DIR", "static")),
            sound_folder: var("SOUND_FOLDER", "sound_files"),
            default_batch_size: parse(
                "DEFAULT_BATCH_SIZE",
                &var("DEFAULT_BATCH_SIZE", "10"),
                "usize",
            )?,
            cors_origins,
            request_timeout_secs: parse(
                "REQUEST_TIMEOUT_SECS",
                &var("REQUEST_TIMEOUT_SECS", "30"),
                "u64",
            )?,
        })
    }

    /// Directory holding the audio samples.
    pub fn sample_dir(&self) -> PathBuf {
        self.static_dir.join(&self.sound_folder)
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    })
}
