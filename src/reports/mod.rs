//! Reports module for TallyCLI
//!
//! Aggregations over transaction lists and the views built on them: the
//! dashboard, filtered financial reports, period summaries and spending
//! insights.

pub mod aggregation;
pub mod dashboard;
pub mod insights;
pub mod period_summary;
pub mod report;

pub use aggregation::{
    category_breakdown, monthly_series, totals, totals_for_account, CategoryTotal, MonthlyPoint,
    Totals,
};
pub use dashboard::Dashboard;
pub use insights::{Anomaly, SpendingInsights, TopCategory};
pub use period_summary::{periods_covered, CategoryFlow, DailyPoint, PeriodSummary};
pub use report::{CategorySummary, FinancialReport, ReportFilter, ReportSummary};
