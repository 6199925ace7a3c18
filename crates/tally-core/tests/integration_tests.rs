//! Integration tests for tally-core
//!
//! These tests exercise the snapshot → analytics → insights → notifications
//! workflow and the receipt → draft → transaction workflow.

use std::time::Duration;

use axum::{routing::post, Json, Router};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde::Deserialize;

use tally_core::{
    analytics::{summarize, GroupBy, Period},
    config::Config,
    insights::{InsightEngine, InsightType},
    ledger::{budget_health, recompute_spent},
    notifications::{derive_notifications, NotificationInbox, NotificationType, Priority},
    receipts::{MockBackend, OpenAICompatibleBackend, ReceiptExtractor, VisionClient},
    Budget, Error, Transaction,
};

#[derive(Deserialize)]
struct Snapshot {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

/// Two months of spending in the shape the app stores it
fn snapshot_json() -> &'static str {
    r#"{
  "transactions": [
    {"id": "1", "date": "2024-02-15", "vendor": "Whole Foods Market", "amount": 87.45, "category": "Groceries", "description": "Weekly groceries", "paymentMethod": "Credit Card"},
    {"id": "2", "date": "2024-02-14", "vendor": "Starbucks", "amount": 6.75, "category": "Food & Drink", "description": "Latte", "paymentMethod": "Digital Wallet"},
    {"id": "3", "date": "2024-02-12", "vendor": "Shell", "amount": 45.20, "category": "Transportation", "description": "Gas", "paymentMethod": "Credit Card"},
    {"id": "4", "date": "2024-02-10", "vendor": "Apple Store", "amount": 899.00, "category": "Shopping", "description": "New iPad", "paymentMethod": "Credit Card"},
    {"id": "5", "date": "2024-02-08", "vendor": "Starbucks", "amount": 5.95, "category": "Food & Drink", "description": "Coffee", "paymentMethod": "Digital Wallet"},
    {"id": "6", "date": "2024-02-05", "vendor": "Netflix", "amount": 15.99, "category": "Entertainment", "description": "Monthly subscription", "paymentMethod": "Credit Card"},
    {"id": "7", "date": "2024-02-03", "vendor": "Starbucks", "amount": 7.10, "category": "Food & Drink", "description": "Coffee", "paymentMethod": "Digital Wallet"},
    {"id": "8", "date": "2024-01-20", "vendor": "Kroger", "amount": 120.00, "category": "Groceries", "description": "Groceries", "paymentMethod": "Debit Card"},
    {"id": "9", "date": "2024-01-15", "vendor": "Amazon", "amount": 64.99, "category": "Shopping", "description": "Household", "paymentMethod": "Credit Card"},
    {"id": "10", "date": "2024-01-05", "vendor": "Netflix", "amount": 15.99, "category": "Entertainment", "description": "Monthly subscription", "paymentMethod": "Credit Card"}
  ],
  "budgets": [
    {"id": "b1", "category": "Groceries", "limit": 300, "spent": 245.67, "period": "monthly"},
    {"id": "b2", "category": "Entertainment", "limit": 300, "spent": 320, "period": "monthly"},
    {"id": "b3", "category": "Overall Budget", "limit": 2000, "spent": 0, "period": "monthly", "isOverall": true}
  ]
}"#
}

fn load_snapshot() -> Snapshot {
    serde_json::from_str(snapshot_json()).expect("Failed to parse snapshot")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()
}

// =============================================================================
// Analytics
// =============================================================================

#[test]
fn test_month_summary_from_snapshot() {
    let snapshot = load_snapshot();
    let summary = summarize(&snapshot.transactions, Period::Month, today());

    assert_eq!(summary.transaction_count, 7);
    assert_eq!(summary.total_spent, dec!(1067.44));
    assert_eq!(summary.top_category.as_ref().unwrap().key, "Shopping");
    assert_eq!(summary.top_vendors[0].key, "Apple Store");
    assert!(summary.change_percent.unwrap() > 400.0);
}

#[test]
fn test_grouping_by_payment_method() {
    let snapshot = load_snapshot();
    let patterns = tally_core::aggregate(&snapshot.transactions, GroupBy::PaymentMethod, None);
    assert_eq!(patterns[0].key, "Credit Card");
    let total: f64 = patterns.iter().map(|p| p.percentage).sum();
    assert!((total - 100.0).abs() < 1e-6);
}

// =============================================================================
// Insights
// =============================================================================

#[test]
fn test_insights_from_snapshot() {
    let snapshot = load_snapshot();
    let config = Config::default();
    let engine = InsightEngine::new(config.insights.clone());

    let insights = engine.generate(&snapshot.transactions, today());
    assert!(!insights.is_empty());
    assert!(insights.len() <= config.insights.max_insights);

    // Apple Store dominates February
    let top = &insights[0];
    assert_eq!(top.id, "top-category:Shopping");
    assert_eq!(top.insight_type, InsightType::Spending);

    assert!(insights.iter().any(|i| i.id == "period-change"));
    assert!(insights.iter().any(|i| i.id == "large-transactions"));
    assert!(insights.iter().any(|i| i.id == "weekend-spending"));
    assert!(insights.iter().any(|i| i.id == "category-shift:Shopping"));
    assert!(insights.iter().any(|i| i.id == "subscriptions"));
    // Three coffees stay below the 152.49 average transaction
    assert!(insights.iter().all(|i| i.id != "frequent-vendor:Starbucks"));

    let mut ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), insights.len());
}

#[test]
fn test_insights_deterministic() {
    let snapshot = load_snapshot();
    let engine = InsightEngine::default();
    assert_eq!(
        engine.generate(&snapshot.transactions, today()),
        engine.generate(&snapshot.transactions, today())
    );
}

// =============================================================================
// Notifications and Ledger
// =============================================================================

#[test]
fn test_notifications_from_snapshot() {
    let snapshot = load_snapshot();
    let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
    let notifications = derive_notifications(&snapshot.transactions, &snapshot.budgets, now);

    assert!(notifications.len() <= 10);
    assert_eq!(notifications[0].id, "budget-over-b2");
    assert!(notifications[0].message.contains("$20.00"));

    let warning = notifications
        .iter()
        .find(|n| n.id == "budget-warning-b1")
        .expect("Groceries warning");
    assert!(warning.message.contains("81.9%"));

    let large: Vec<_> = notifications
        .iter()
        .filter(|n| n.notification_type == NotificationType::LargeTransaction)
        .collect();
    assert_eq!(large.len(), 1);
    assert_eq!(large[0].id, "large-transaction-4");

    assert!(notifications
        .windows(2)
        .all(|w| w[0].priority.rank() >= w[1].priority.rank()));
    assert_eq!(notifications.last().unwrap().priority, Priority::Low);
}

#[test]
fn test_inbox_workflow() {
    let snapshot = load_snapshot();
    let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();

    let mut inbox = NotificationInbox::new();
    inbox.refresh(derive_notifications(&snapshot.transactions, &snapshot.budgets, now));
    let initial = inbox.unread_count();

    assert!(inbox.mark_as_read("budget-over-b2"));
    assert!(inbox.clear("weekly-report"));

    // Recompute an hour later: same ids, state carried over
    let later = now + chrono::Duration::hours(1);
    inbox.refresh(derive_notifications(&snapshot.transactions, &snapshot.budgets, later));

    assert_eq!(inbox.unread_count(), initial - 2);
    assert!(inbox.notifications().iter().all(|n| n.id != "weekly-report"));
}

#[test]
fn test_inbox_state_survives_notifications_pushed_past_cap() {
    let snapshot = load_snapshot();
    let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();

    let mut inbox = NotificationInbox::new();
    inbox.refresh(derive_notifications(&snapshot.transactions, &snapshot.budgets, now));
    assert!(inbox.mark_as_read("ai-insights"));
    assert!(inbox.clear("weekly-report"));

    // Ten overspent budgets fill the cap with high-priority alerts
    let overspent: Vec<Budget> = (0..10)
        .map(|i| {
            serde_json::from_value(serde_json::json!({
                "id": format!("over-{}", i),
                "category": "Shopping",
                "limit": 100,
                "spent": 150,
                "period": "monthly"
            }))
            .unwrap()
        })
        .collect();
    inbox.refresh(derive_notifications(&snapshot.transactions, &overspent, now));
    assert!(inbox
        .notifications()
        .iter()
        .all(|n| n.id != "ai-insights" && n.id != "weekly-report"));

    // Back to the original budgets: state from before is still applied
    inbox.refresh(derive_notifications(&snapshot.transactions, &snapshot.budgets, now));
    assert!(inbox.notifications().iter().all(|n| n.id != "weekly-report"));
    let insights = inbox
        .notifications()
        .iter()
        .find(|n| n.id == "ai-insights")
        .expect("insight announcement");
    assert!(insights.read);
}

#[test]
fn test_ledger_recompute_feeds_notifications() {
    let snapshot = load_snapshot();
    let budgets = recompute_spent(&snapshot.budgets, &snapshot.transactions, today());

    // February only: groceries 87.45, entertainment 15.99, overall 1067.44
    assert_eq!(budgets[0].spent, dec!(87.45));
    assert_eq!(budgets[1].spent, dec!(15.99));
    assert_eq!(budgets[2].spent, dec!(1067.44));

    let health = budget_health(&budgets);
    assert_eq!(health.over_count, 0);
    assert_eq!(health.remaining, dec!(932.56));

    let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
    let notifications = derive_notifications(&snapshot.transactions, &budgets, now);
    assert!(notifications
        .iter()
        .all(|n| n.notification_type != NotificationType::Budget));
}

// =============================================================================
// Receipt Extraction
// =============================================================================

#[tokio::test]
async fn test_receipt_to_transaction() {
    let extractor = ReceiptExtractor::new(VisionClient::Mock(MockBackend::new()))
        .unwrap()
        .with_fallback_delay(Duration::ZERO);

    let draft = extractor
        .extract_draft(b"\x89PNG fake", "image/png", today())
        .await
        .unwrap();
    let tx = draft.into_transaction("receipt-1");

    let mut snapshot = load_snapshot();
    snapshot.transactions.push(tx);
    let summary = summarize(&snapshot.transactions, Period::All, today());
    assert_eq!(summary.transaction_count, 11);
}

#[tokio::test]
async fn test_extraction_against_http_server() {
    async fn completions() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "```json\n{\"vendor\":\"Target\",\"amount\":42.5,\"category\":\"Shopping\",\"description\":\"Household items\",\"date\":\"2024-02-18\",\"paymentMethod\":\"Debit Card\"}\n```"
                }
            }]
        }))
    }

    let app = Router::new().route("/v1/chat/completions", post(completions));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = OpenAICompatibleBackend::new(&format!("http://{}", addr), "gpt-4o");
    let extractor = ReceiptExtractor::new(VisionClient::OpenAICompatible(backend))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_fallback_delay(Duration::ZERO);

    let analysis = extractor.extract(b"jpeg", "image/jpeg").await.unwrap();
    assert_eq!(analysis.vendor, "Target");
    assert_eq!(analysis.amount, dec!(42.5));
    assert_eq!(analysis.payment_method.as_deref(), Some("Debit Card"));
    assert_eq!(analysis.date, NaiveDate::from_ymd_opt(2024, 2, 18));
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    let backend = OpenAICompatibleBackend::new("http://127.0.0.1:9", "gpt-4o");
    let extractor = ReceiptExtractor::new(VisionClient::OpenAICompatible(backend))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_fallback_delay(Duration::ZERO);

    let err = extractor.extract(b"jpeg", "image/jpeg").await.unwrap_err();
    assert!(err.is_transport());
    assert!(!matches!(err, Error::MalformedResponse(_)));

    let draft = extractor.extract_or_fallback(b"jpeg", "image/jpeg", today()).await;
    assert_eq!(draft.category, "Other");
    assert_eq!(draft.vendor, "");
}
