//! Shared utilities for integration testing.
//!
//! A stateful mock of the discovery service and a network access gateway,
//! served by axum on an ephemeral loopback port.

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use circular_enterprise_apis::config::SdkConfig;
use circular_enterprise_apis::CepAccount;

pub const TEST_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Programmable gateway behaviour.
#[derive(Debug)]
pub struct GatewayBehaviour {
    /// Last nonce the gateway has seen for the account.
    pub wallet_nonce: i64,
    /// `Result` code answered to nonce queries.
    pub nonce_result: i64,
    /// `Result` code answered to submissions.
    pub submit_result: i64,
    /// Lookups answered `Pending` before a transaction is `Executed`.
    pub pending_polls: u32,
    /// Answer every gateway call with this HTTP status.
    pub http_status: Option<u16>,
    /// Answer every gateway call with this raw 200 body.
    pub raw_body: Option<String>,
}

impl Default for GatewayBehaviour {
    fn default() -> Self {
        Self {
            wallet_nonce: 0,
            nonce_result: 200,
            submit_result: 200,
            pending_polls: 0,
            http_status: None,
            raw_body: None,
        }
    }
}

#[derive(Default)]
pub struct GatewayState {
    pub behaviour: Mutex<GatewayBehaviour>,
    /// Accepted transactions, in submission order.
    pub transactions: Mutex<Vec<Value>>,
    /// Every `cep` endpoint called, in order.
    pub calls: Mutex<Vec<String>>,
    polls: Mutex<HashMap<String, u32>>,
    base_url: Mutex<String>,
}

pub struct MockGateway {
    pub addr: SocketAddr,
    pub state: Arc<GatewayState>,
}

impl MockGateway {
    pub fn discovery_url(&self) -> String {
        format!("http://{}/network/getNAG", self.addr)
    }

    pub fn gateway_url(&self) -> String {
        format!("http://{}/NAG.php?cep=", self.addr)
    }

    pub fn behave(&self, f: impl FnOnce(&mut GatewayBehaviour)) {
        let mut behaviour = self.state.behaviour.lock().unwrap();
        f(&mut *behaviour);
    }

    pub fn transactions(&self) -> Vec<Value> {
        self.state.transactions.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Configuration pointing at this gateway with short polling.
    pub fn config(&self) -> SdkConfig {
        let mut config = SdkConfig::default();
        config.network.discovery_url = self.discovery_url();
        config.timeouts.connect_secs = 2;
        config.timeouts.request_secs = 5;
        config.polling.timeout_secs = 5;
        config.polling.interval_secs = 1;
        config
    }

    pub fn account(&self) -> CepAccount {
        CepAccount::from_config(&self.config()).unwrap()
    }
}

/// Start the mock on `127.0.0.1:0`.
pub async fn start_mock_gateway() -> MockGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(GatewayState::default());
    *state.base_url.lock().unwrap() = format!("http://{}/NAG.php?cep=", addr);

    let app = Router::new()
        .route("/network/getNAG", get(discovery))
        .route("/NAG.php", post(gateway))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // Give the server a moment to start polling the listener.
    tokio::time::sleep(Duration::from_millis(10)).await;

    MockGateway { addr, state }
}

async fn discovery(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    match query.get("network").map(String::as_str) {
        Some("testnet") | Some("devnet") => Json(json!({
            "status": "success",
            "url": state.base_url.lock().unwrap().clone(),
            "message": "OK"
        })),
        _ => Json(json!({"status": "error", "url": "", "message": "Unsupported network"})),
    }
}

async fn gateway(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let endpoint = query.get("cep").cloned().unwrap_or_default();
    state.calls.lock().unwrap().push(endpoint.clone());

    {
        let behaviour = state.behaviour.lock().unwrap();
        if let Some(status) = behaviour.http_status {
            let status = StatusCode::from_u16(status).unwrap();
            return (status, "gateway failure").into_response();
        }
        if let Some(raw) = &behaviour.raw_body {
            return (StatusCode::OK, raw.clone()).into_response();
        }
    }

    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return Json(json!({"Result": 400, "Response": "Bad request"})).into_response(),
    };

    let reply = if endpoint.starts_with("Circular_GetWalletNonce_") {
        wallet_nonce(&state)
    } else if endpoint.starts_with("Circular_AddTransaction_") {
        add_transaction(&state, request)
    } else if endpoint.starts_with("Circular_GetTransactionbyID_") {
        transaction_by_id(&state, &request)
    } else {
        json!({"Result": 404, "Response": "Unknown endpoint"})
    };
    Json(reply).into_response()
}

fn wallet_nonce(state: &GatewayState) -> Value {
    let behaviour = state.behaviour.lock().unwrap();
    match behaviour.nonce_result {
        200 => json!({"Result": 200, "Response": {"Nonce": behaviour.wallet_nonce}}),
        code => json!({"Result": code, "Response": "Rejected"}),
    }
}

fn add_transaction(state: &GatewayState, request: Value) -> Value {
    let mut behaviour = state.behaviour.lock().unwrap();
    if behaviour.submit_result != 200 {
        return json!({"Result": behaviour.submit_result, "Response": "Transaction Rejected"});
    }

    let nonce: i64 = request["Nonce"].as_str().and_then(|n| n.parse().ok()).unwrap_or(-1);
    if nonce != behaviour.wallet_nonce + 1 {
        return json!({"Result": 117, "Response": "Invalid Nonce"});
    }
    behaviour.wallet_nonce = nonce;

    let id = request["ID"].as_str().unwrap_or_default().to_string();
    state.transactions.lock().unwrap().push(request);
    json!({"Result": 200, "Response": {"TxID": id, "Timestamp": "2024:01:15-10:30:00"}})
}

fn transaction_by_id(state: &GatewayState, request: &Value) -> Value {
    let id = request["ID"].as_str().unwrap_or_default().to_string();
    let known = state
        .transactions
        .lock()
        .unwrap()
        .iter()
        .any(|tx| tx["ID"].as_str() == Some(id.as_str()));
    if !known {
        return json!({"Result": 404, "Response": "Transaction Not Found"});
    }

    let pending_polls = state.behaviour.lock().unwrap().pending_polls;
    let mut polls = state.polls.lock().unwrap();
    let seen = polls.entry(id.clone()).or_insert(0);
    *seen += 1;

    let status = if *seen <= pending_polls { "Pending" } else { "Executed" };
    json!({
        "Result": 200,
        "Response": {
            "ID": id,
            "Status": status,
            "BlockID": "7",
            "Type": "C_TYPE_CERTIFICATE"
        }
    })
}
