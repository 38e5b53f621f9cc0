use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Identity presented to third-party sites when fetching their HTML.
    pub user_agent: String,
    pub max_urls_per_request: usize,
    /// Bearer token for the chat-completion API. `None` turns every
    /// page analysis into the "Analysis failed" sentinel.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    /// `None` forces synthetic performance metrics.
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_base_url: String,
    pub use_mock_performance: bool,
    pub screenshots_enabled: bool,
    pub screenshot_base_url: String,
    pub known_domains_path: Option<PathBuf>,
    /// Bearer tokens accepted by the HTTP server, deduplicated and sorted.
    /// Empty disables auth in development and fails startup elsewhere.
    pub api_keys: Vec<String>,
}

impl AppConfig {
    /// Whether performance data must come from the synthetic generator.
    ///
    /// True when mock mode is requested or no credential is configured.
    #[must_use]
    pub fn synthetic_performance(&self) -> bool {
        self.use_mock_performance || self.pagespeed_api_key.is_none()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_urls_per_request", &self.max_urls_per_request)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field(
                "pagespeed_api_key",
                &self.pagespeed_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("pagespeed_base_url", &self.pagespeed_base_url)
            .field("use_mock_performance", &self.use_mock_performance)
            .field("screenshots_enabled", &self.screenshots_enabled)
            .field("screenshot_base_url", &self.screenshot_base_url)
            .field("known_domains_path", &self.known_domains_path)
            .field(
                "api_keys",
                &format!("[{} redacted]", self.api_keys.len()),
            )
            .finish()
    }
}
