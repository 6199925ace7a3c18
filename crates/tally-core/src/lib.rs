//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Keyword category classifier
//! - Period windows, grouped spending patterns and summaries
//! - Rule-based spending insights
//! - Budget and large-purchase notifications with an inbox
//! - Budget ledger (spent recomputation, health)
//! - Receipt extraction through a pluggable vision backend
//! - Layered configuration (embedded defaults, override file, environment)

pub mod analytics;
pub mod categorize;
pub mod config;
pub mod error;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod money;
pub mod notifications;
pub mod receipts;

/// Test utilities including fixtures and a mock vision server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    aggregate, spending_patterns, summarize, GroupBy, Period, SpendingPattern, SpendingSummary,
    Trend, Window,
};
pub use categorize::{classify, CategoryClassifier, CategoryRule};
pub use config::{AiConfig, Config, ReceiptConfig};
pub use error::{Error, Result};
pub use insights::{generate_insights, Impact, Insight, InsightConfig, InsightEngine, InsightType};
pub use ledger::{budget_health, recompute_spent, BudgetHealth};
pub use models::{Budget, BudgetPeriod, PaymentMethod, Transaction, TransactionDraft};
pub use notifications::{
    derive_notifications, derive_with_preferences, Notification, NotificationInbox,
    NotificationPreferences, NotificationType, Priority,
};
pub use receipts::{
    MockBackend, OpenAICompatibleBackend, ReceiptAnalysis, ReceiptExtractor, VisionBackend,
    VisionClient,
};
