//! Financial summaries computed from the bike and sale collections.
//!
//! The reducers in [`rollup`] are pure; [`service::AnalyticsService`] only fetches and delegates.

pub mod rollup;
pub mod service;

pub use rollup::{kpi_summary, monthly_rollup, KpiSummary, MonthlyBucket, ReportWindow, MONTH_LABELS};
pub use service::AnalyticsService;
