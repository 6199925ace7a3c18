//! Test utilities for tally-core
//!
//! Fixture builders for transactions and budgets, plus a mock
//! OpenAI-compatible vision server for extraction tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::models::{Budget, BudgetPeriod, Transaction};

/// Transaction fixture; `date` is `YYYY-MM-DD`, payment method is Credit Card
pub fn tx(id: &str, date: &str, vendor: &str, amount: Decimal, category: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        vendor: vendor.to_string(),
        amount,
        category: category.to_string(),
        description: String::new(),
        payment_method: "Credit Card".to_string(),
        receipt_url: None,
        is_manually_adjusted: false,
    }
}

/// Monthly budget fixture
pub fn budget(id: &str, category: &str, limit: Decimal, spent: Decimal) -> Budget {
    Budget {
        id: id.to_string(),
        category: category.to_string(),
        limit,
        spent,
        period: BudgetPeriod::Monthly,
        is_overall: None,
    }
}

struct MockState {
    status: StatusCode,
    body: serde_json::Value,
    delay: Duration,
    hits: AtomicUsize,
    last_request: Mutex<Option<serde_json::Value>>,
    last_auth: Mutex<Option<String>>,
}

/// Mock OpenAI-compatible server answering `/v1/chat/completions`
pub struct MockVisionServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockVisionServer {
    /// Reply 200 with `content` as the assistant message
    pub async fn start(content: &str) -> Self {
        Self::spawn(StatusCode::OK, completion_body(content), Duration::ZERO).await
    }

    /// Reply with `content` after sleeping for `delay`
    pub async fn start_delayed(content: &str, delay: Duration) -> Self {
        Self::spawn(StatusCode::OK, completion_body(content), delay).await
    }

    /// Reply with an error status and a plain error body
    pub async fn start_with_status(status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        let body = serde_json::json!({ "error": { "message": "mock failure" } });
        Self::spawn(status, body, Duration::ZERO).await
    }

    async fn spawn(status: StatusCode, body: serde_json::Value, delay: Duration) -> Self {
        let state = Arc::new(MockState {
            status,
            body,
            delay,
            hits: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_auth: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of completion requests received
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Body of the most recent request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// Authorization header of the most recent request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_auth.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockVisionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn handle_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(request);
    *state.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (state.status, Json(state.body.clone()))
}
