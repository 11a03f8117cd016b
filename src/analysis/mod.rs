//! Read-only aggregation over a record snapshot: revenue targets, pending payables and
//! chart series. Nothing in here mutates records.

pub mod charts;
pub mod pending;
pub mod targets;
pub mod window;

pub use charts::{
    category_breakdown, kind_totals, monthly_comparison, pending_breakdown, CategoryTotal,
    ChartFilter, KindTotals, MonthlySeries, PendingBucket, UNCATEGORIZED,
};
pub use pending::{filter_pending, pending_expenses, Period, PendingFilter, PendingSummary};
pub use targets::{
    daily_target, daily_target_report, monthly_target, monthly_target_report, weekly_target,
    weekly_target_report, TargetReport, TargetService, TargetSettings, TargetSnapshot,
};
pub use window::{DateRange, LookbackWindow, WeekNumbering};
