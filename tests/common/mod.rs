#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nfd_payout::domain::account::mnemonic_from_seed;
use rmpv::Value;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub const TEST_SEED: [u8; 32] = [11u8; 32];

pub fn test_mnemonic() -> String {
    mnemonic_from_seed(&TEST_SEED)
}

/// An unsigned transaction whose note carries `note`, so the mock node can tell groups apart.
pub fn unsigned_txn(note: &str) -> Vec<u8> {
    let value = Value::Map(vec![
        (Value::from("note"), Value::from(note)),
        (Value::from("type"), Value::from("axfer")),
    ]);
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &value).unwrap();
    buf
}

/// Binds `router` to an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct RecordedCall {
    pub handle: String,
    pub body: serde_json::Value,
    pub content_type: Option<String>,
    pub at: Instant,
}

/// Naming service double. Unknown handles get a 404.
#[derive(Default)]
pub struct NfdState {
    pub groups: Mutex<HashMap<String, Vec<Vec<u8>>>>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl NfdState {
    pub fn with_group(self, handle: &str, txns: Vec<Vec<u8>>) -> Self {
        self.groups.lock().unwrap().insert(handle.to_string(), txns);
        self
    }
}

async fn send_to(
    State(state): State<Arc<NfdState>>,
    Path(handle): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.calls.lock().unwrap().push(RecordedCall {
        handle: handle.clone(),
        body,
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        at: Instant::now(),
    });

    let groups = state.groups.lock().unwrap();
    match groups.get(&handle) {
        Some(txns) => {
            let pairs: Vec<(&str, String)> = txns
                .iter()
                .map(|txn| ("u", STANDARD.encode(txn)))
                .collect();
            Json(pairs).into_response()
        }
        None => (StatusCode::NOT_FOUND, "nfd not found").into_response(),
    }
}

pub async fn spawn_nfd(state: NfdState) -> (String, Arc<NfdState>) {
    let state = Arc::new(state);
    let router = Router::new()
        .route("/nfd/vault/sendTo/:handle", post(send_to))
        .with_state(state.clone());
    (serve(router).await, state)
}

/// Ledger node double keyed by the note of each group's first transaction.
///
/// Confirms at round 100 unless the note is listed in `reject`,
/// `pool_errors` or `never_confirm`.
#[derive(Default)]
pub struct AlgodState {
    pub reject: Mutex<HashMap<String, String>>,
    pub pool_errors: Mutex<HashMap<String, String>>,
    pub never_confirm: Mutex<HashSet<String>>,
    pub submissions: Mutex<Vec<Vec<u8>>>,
    pub tokens: Mutex<Vec<String>>,
}

impl AlgodState {
    pub fn rejecting(self, note: &str, message: &str) -> Self {
        self.reject
            .lock()
            .unwrap()
            .insert(note.to_string(), message.to_string());
        self
    }
}

fn map_get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value
        .as_map()?
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

/// Note of the first signed transaction in a submitted group.
pub fn first_note(bytes: &[u8]) -> String {
    let signed = rmpv::decode::read_value(&mut &bytes[..]).unwrap();
    let txn = map_get(&signed, "txn").unwrap();
    map_get(txn, "note").unwrap().as_str().unwrap().to_string()
}

async fn submit(State(state): State<Arc<AlgodState>>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(token) = headers.get("x-algo-api-token").and_then(|v| v.to_str().ok()) {
        state.tokens.lock().unwrap().push(token.to_string());
    }
    state.submissions.lock().unwrap().push(body.to_vec());

    let note = first_note(&body);
    if let Some(message) = state.reject.lock().unwrap().get(&note) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response();
    }
    Json(json!({ "txId": format!("TX-{note}") })).into_response()
}

async fn status() -> Json<serde_json::Value> {
    Json(json!({ "last-round": 99 }))
}

async fn wait_for_block(Path(round): Path<u64>) -> Json<serde_json::Value> {
    Json(json!({ "last-round": round + 1 }))
}

async fn pending(State(state): State<Arc<AlgodState>>, Path(tx_id): Path<String>) -> Json<serde_json::Value> {
    let note = tx_id.trim_start_matches("TX-");
    if let Some(message) = state.pool_errors.lock().unwrap().get(note) {
        return Json(json!({ "pool-error": message }));
    }
    if state.never_confirm.lock().unwrap().contains(note) {
        return Json(json!({ "pool-error": "" }));
    }
    Json(json!({ "confirmed-round": 100, "pool-error": "" }))
}

pub async fn spawn_algod(state: AlgodState) -> (String, Arc<AlgodState>) {
    let state = Arc::new(state);
    let router = Router::new()
        .route("/v2/transactions", post(submit))
        .route("/v2/status", get(status))
        .route("/v2/status/wait-for-block-after/:round", get(wait_for_block))
        .route("/v2/transactions/pending/:tx_id", get(pending))
        .with_state(state.clone());
    (serve(router).await, state)
}
