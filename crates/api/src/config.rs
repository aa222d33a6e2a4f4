use axum::http::HeaderValue;

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Path prefix the annotator routes are nested under, without a trailing
    /// slash. Empty means the routes sit at the root.
    pub mount_path: String,
    /// Name reported by the describe endpoint.
    pub service_name: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `DB_MAX_CONNECTIONS`     | `20`                    |
    /// | `ANNOTATOR_MOUNT`        | `/annotator`            |
    /// | `ANNOTATOR_SERVICE_NAME` | `Annotator JS API`      |
    /// | `LOG_FORMAT`             | `text`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse_var("PORT", var("PORT", "3000"), "a valid u16")?;

        let cors_origins = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                let invalid = || ConfigError::InvalidValue {
                    var: "CORS_ORIGINS",
                    expected: "a list of explicit origins (no '*')",
                    value: origin.to_string(),
                };
                // Credentialed CORS cannot use the wildcard origin.
                if origin == "*" {
                    return Err(invalid());
                }
                origin.parse::<HeaderValue>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = parse_var(
            "REQUEST_TIMEOUT_SECS",
            var("REQUEST_TIMEOUT_SECS", "30"),
            "a valid u64",
        )?;
        let db_max_connections = parse_var(
            "DB_MAX_CONNECTIONS",
            var("DB_MAX_CONNECTIONS", "20"),
            "a valid u32",
        )?;

        let mount_path = normalize_mount_path(&var("ANNOTATOR_MOUNT", "/annotator"));
        let service_name = var("ANNOTATOR_SERVICE_NAME", "Annotator JS API");

        let log_format = match var("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidValue {
                    var: "LOG_FORMAT",
                    expected: "'text' or 'json'",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_max_connections,
            mount_path,
            service_name,
            log_format,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            expected,
            value,
        })
}

/// Normalize a mount path to `/segment[/segment...]` with no trailing slash.
///
/// `""` and `"/"` both normalize to the empty string (mount at root).
pub fn normalize_mount_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
