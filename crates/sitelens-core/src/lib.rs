//! Shared types and configuration for SiteLens.
//!
//! Everything here is plain data: the signals produced per analyzed URL,
//! the insights derived from comparing them, and the environment-driven
//! [`AppConfig`] that every other crate receives at construction time.

pub mod app_config;
pub mod config;
pub mod domain;
pub mod signals;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::domain_label;
pub use signals::{
    ComparisonInsight, CoreMetrics, InsightKind, PageAnalysis, PageSignal, PerformanceComparison,
    PerformanceSignal, PerformanceWinner,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("validation error: {0}")]
    Validation(String),
}
