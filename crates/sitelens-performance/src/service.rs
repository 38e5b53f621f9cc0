use sitelens_core::{AppConfig, PerformanceSignal};

use crate::error::PerformanceError;
use crate::known_domains::KnownDomains;
use crate::pagespeed::PageSpeedClient;
use crate::synthetic::synthesize;

/// Measures pages live when possible, synthetically otherwise.
#[derive(Debug, Clone)]
pub struct PerformanceService {
    live: Option<PageSpeedClient>,
    known: KnownDomains,
}

impl PerformanceService {
    #[must_use]
    pub fn new(live: Option<PageSpeedClient>, known: KnownDomains) -> Self {
        Self { live, known }
    }

    /// A service that only ever produces synthetic signals.
    #[must_use]
    pub fn synthetic(known: KnownDomains) -> Self {
        Self::new(None, known)
    }

    /// Builds the service from application config.
    ///
    /// The live client is only constructed when a credential is configured
    /// and mock mode is off.
    ///
    /// # Errors
    ///
    /// Returns [`PerformanceError`] if the known-domains file cannot be
    /// loaded or the live client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, PerformanceError> {
        let known = match &config.known_domains_path {
            Some(path) => KnownDomains::load(path)?,
            None => KnownDomains::builtin(),
        };

        let live = match (&config.pagespeed_api_key, config.synthetic_performance()) {
            (Some(key), false) => Some(PageSpeedClient::with_base_url(
                key,
                config.request_timeout_secs,
                &config.pagespeed_base_url,
            )?),
            _ => None,
        };

        Ok(Self::new(live, known))
    }

    /// Whether a live client is configured.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Measures `url`. Never fails: any live-path error falls back to a
    /// synthetic signal for the same URL.
    pub async fn measure(&self, url: &str) -> PerformanceSignal {
        let Some(client) = &self.live else {
            tracing::debug!(url, "using synthetic performance data");
            return synthesize(url, &self.known);
        };

        match client.measure(url).await {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!(url, error = %e, "live performance measurement failed, using synthetic data");
                synthesize(url, &self.known)
            }
        }
    }
}
