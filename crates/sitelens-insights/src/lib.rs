//! Comparators that turn two or more signals into classified insights.
//!
//! Every function here is pure: the same inputs always yield the same
//! ordered list of [`ComparisonInsight`](sitelens_core::ComparisonInsight)s,
//! and every site an insight mentions is named by its domain label.

pub mod conversion;
pub mod performance;
pub mod price;

mod phrasing;

pub use conversion::compare_page_signals;
pub use performance::compare_performance;
pub use price::parse_price;
