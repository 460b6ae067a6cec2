//! Commonly used constants

/// Prefix for environment variable overrides of the gateway configuration
pub const ENV_PREFIX: &str = "FORTIS_GATEWAY";

/// Environment variable selecting the runtime environment
pub const RUN_ENV: &str = "RUN_ENV";

/// Fortis sandbox API host
pub const FORTIS_SANDBOX_BASE_URL: &str = "https://api.sandbox.fortis.tech";
/// Fortis production API host
pub const FORTIS_PRODUCTION_BASE_URL: &str = "https://api.fortis.tech";

/// Default network timeout towards the processor, in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub const CONTENT_TYPE: &str = "content-type";
pub const ACCEPT: &str = "accept";
pub const DEVELOPER_ID: &str = "developer-id";
pub const USER_ID: &str = "user-id";
pub const USER_API_KEY: &str = "user-api-key";
pub const APPLICATION_JSON: &str = "application/json";

/// Error key used when the fallback HTTP transport fails
pub const HTTP_ERROR_KEY: &str = "http";
/// Error key used for structured client exceptions without a processor body
pub const API_ERROR_KEY: &str = "api";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Runtime environment from `RUN_ENV`, development when unset or unknown
    pub fn current_env() -> Self {
        match std::env::var(RUN_ENV).as_deref() {
            Ok("production") => Self::Production,
            Ok("sandbox") => Self::Sandbox,
            _ => Self::Development,
        }
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}
