//! Page-performance measurement with a deterministic synthetic fallback.
//!
//! [`PerformanceService::measure`] never fails: when the live PageSpeed API
//! is not configured, rate-limited, or misbehaving, the measurement comes
//! from [`synthetic::synthesize`] instead, in exactly the same shape.

pub mod error;
pub mod known_domains;
pub mod pagespeed;
pub mod service;
pub mod synthetic;

pub use error::PerformanceError;
pub use known_domains::{KnownDomains, ScoreBand};
pub use pagespeed::PageSpeedClient;
pub use service::PerformanceService;
pub use synthetic::synthesize;
