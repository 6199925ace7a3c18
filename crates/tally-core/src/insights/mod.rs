//! Insight Engine - Rule-Based Spending Observations
//!
//! Turns a transaction snapshot into a short, ordered list of human-readable
//! insights. Each rule inspects the current calendar month against the one
//! before it; rules run in registration order, duplicates (same id) are
//! dropped and the list is capped.
//!
//! ## Built-in Rules
//!
//! - **Top category** - one category takes an outsized share
//! - **Period change** - total spend moved versus last month
//! - **Frequent vendor** - repeat visits that add up
//! - **Large transactions** - purchases well above the average
//! - **Weekend concentration** - spend piling up on weekends
//! - **Payment concentration** - one payment method dominates
//! - **Category shift** - per-category moves versus last month
//! - **Subscriptions** - recurring charges worth reviewing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::{InsightConfig, InsightEngine};
//!
//! let engine = InsightEngine::new(InsightConfig::default());
//! let insights = engine.generate(&transactions, today);
//! ```

pub mod category_rules;
pub mod engine;
pub mod pattern_rules;
pub mod period_change;
pub mod types;
pub mod vendor_rules;

pub use category_rules::{CategoryShiftRule, TopCategoryRule};
pub use engine::{generate_insights, AnalysisContext, InsightConfig, InsightEngine, InsightRule};
pub use pattern_rules::{LargeTransactionRule, PaymentConcentrationRule, WeekendRule};
pub use period_change::PeriodChangeRule;
pub use types::{Impact, Insight, InsightType};
pub use vendor_rules::{FrequentVendorRule, SubscriptionRule};
