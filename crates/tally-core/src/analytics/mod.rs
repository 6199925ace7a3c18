//! Spending analytics
//!
//! Pure aggregation over caller-supplied snapshots:
//!
//! - **Windows** - week/month/year calendar ranges and their predecessors
//! - **Aggregation** - per-category/vendor/payment-method totals, shares and trends
//! - **Summary** - headline totals, averages and period-over-period change

pub mod aggregate;
pub mod summary;
pub mod window;

pub use aggregate::{
    aggregate, aggregate_refs, spending_patterns, GroupBy, SpendingPattern, Trend,
};
pub use summary::{change_percent, summarize, SpendingSummary};
pub use window::{Period, Window};
