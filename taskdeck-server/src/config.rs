//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for taskdeck-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// SQLite database URL (default: `"sqlite://taskdeck.db"`).
    /// Any sqlx-compatible SQLite connection string works, including
    /// `"sqlite::memory:"` for throwaway instances.
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origin allow-list; `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default: on).
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("TASKDECK_BIND", "0.0.0.0:5000"),
            database_url: env_or("TASKDECK_DATABASE_URL", "sqlite://taskdeck.db"),
            log_level: env_or("TASKDECK_LOG", "info"),
            log_json: env_flag("TASKDECK_LOG_JSON", false),
            cors_allowed_origins: std::env::var("TASKDECK_CORS_ORIGINS").ok(),
            enable_swagger: env_flag("TASKDECK_ENABLE_SWAGGER", true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
