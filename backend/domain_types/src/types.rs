use std::time::Duration;

use common_utils::consts;
use hyperswitch_masking::Secret;
use serde::Deserialize;

/// Processor credentials and connection settings of one gateway configuration.
///
/// Built once at startup and shared read-only between requests. The API key is
/// held as a [`Secret`] so `Debug` output and logs never show it.
#[derive(Clone, Debug, Deserialize)]
pub struct FortisCredentials {
    pub developer_id: String,
    pub user_id: String,
    pub user_api_key: Secret<String>,
    /// Location used when a transaction does not name its own
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default = "default_sandbox")]
    pub sandbox: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Propagate structured-client credential failures instead of falling back to HTTP
    #[serde(default)]
    pub strict: bool,
    /// Overrides the sandbox/production host, used against local fakes
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_sandbox() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    consts::DEFAULT_TIMEOUT_SECONDS
}

impl FortisCredentials {
    pub fn new(developer_id: &str, user_id: &str, user_api_key: Secret<String>) -> Self {
        Self {
            developer_id: developer_id.to_string(),
            user_id: user_id.to_string(),
            user_api_key,
            location_id: None,
            sandbox: default_sandbox(),
            timeout_seconds: default_timeout_seconds(),
            strict: false,
            base_url: None,
        }
    }

    pub fn with_location_id(mut self, location_id: Option<String>) -> Self {
        self.location_id = location_id;
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Host every processor path is resolved against, without a trailing slash
    pub fn base_url(&self) -> &str {
        match self.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/'),
            _ if self.sandbox => consts::FORTIS_SANDBOX_BASE_URL,
            _ => consts::FORTIS_PRODUCTION_BASE_URL,
        }
    }

    /// Configured default location; an empty string counts as absent
    pub fn default_location_id(&self) -> Option<&str> {
        self.location_id
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

impl Proxy {
    pub fn is_configured(&self) -> bool {
        self.http_url.is_some() || self.https_url.is_some()
    }
}
