//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for therapy-server.
///
/// Every field has a fallback so the server starts without any environment
/// variables set. The secrets have no usable default; a missing provider key
/// surfaces as an authentication failure on the first model call.
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://ai_therapy.db"`).
    pub database_url: String,

    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,

    /// Process secret key (`SESSION_SECRET`).
    pub secret_key: Option<String>,

    /// Credential for the chat-completion provider (`GROQ_API_KEY`).
    pub llm_api_key: Option<String>,

    /// Root of the OpenAI-compatible API.
    pub llm_base_url: String,

    /// Model id sent with every completion request.
    pub llm_model: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("THERAPY_BIND", "0.0.0.0:5000"),
            database_url: env_or("DATABASE_URL", "sqlite://ai_therapy.db"),
            db_max_connections: parse_env("THERAPY_DB_MAX_CONNECTIONS", 5),
            secret_key: env_opt("SESSION_SECRET"),
            llm_api_key: env_opt("GROQ_API_KEY"),
            llm_base_url: env_or("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
            llm_model: env_or("THERAPY_MODEL", "llama3-8b-8192"),
            log_level: env_or("THERAPY_LOG", "info"),
            log_json: std::env::var("THERAPY_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origins: env_opt("THERAPY_CORS_ORIGINS"),
        }
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_url", &self.database_url)
            .field("db_max_connections", &self.db_max_connections)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
impl Config {
    /// Configuration for in-process tests: in-memory database, no secrets.
    pub fn for_tests() -> Self {
        Self {
            bind_address: "127.0.0.1:0".into(),
            database_url: "sqlite::memory:".into(),
            db_max_connections: 1,
            secret_key: None,
            llm_api_key: None,
            llm_base_url: "http://127.0.0.1:9".into(),
            llm_model: "test-model".into(),
            log_level: "debug".into(),
            log_json: false,
            cors_allowed_origins: None,
        }
    }
}
