//! In-process HTTP stand-in for the ledger REST API, for tests only.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use crate::{addressing, codec, models::{Game, GameState}};

#[derive(Default)]
struct Recorded {
    batches: Vec<Vec<u8>>,
    content_types: Vec<String>,
    status_queries: Vec<(String, u64)>,
}

pub struct StubGateway {
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
    server_handle: tokio::task::JoinHandle<()>,
}

pub fn stub_game(name: &str, state: GameState, player1: &str) -> Game {
    Game {
        name: name.to_string(),
        board: "---------".to_string(),
        game_state: state,
        player1: player1.to_string(),
        player2: String::new(),
    }
}

async fn submit(
    State(recorded): State<Arc<Mutex<Recorded>>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let mut recorded = recorded.lock().unwrap();
    recorded.batches.push(body.to_vec());
    recorded.content_types.push(
        headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    );
    (
        StatusCode::ACCEPTED,
        Json(json!({ "link": "http://x/batch_statuses?id=abc123" })),
    )
}

async fn batch_statuses(
    State(recorded): State<Arc<Mutex<Recorded>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let id = params.get("id").cloned().unwrap_or_default();
    let wait = params
        .get("wait")
        .and_then(|w| w.parse().ok())
        .unwrap_or_default();
    recorded.lock().unwrap().status_queries.push((id.clone(), wait));

    let data = match id.as_str() {
        "missing" => json!([]),
        "invalid-batch" => json!([{
            "id": id,
            "status": "INVALID",
            "invalid_transactions": [{
                "id": "txn-1",
                "message": "Invalid Action: Space already taken",
                "extended_data": null
            }]
        }]),
        "second-of-two" => json!([
            { "id": "other-batch", "status": "COMMITTED", "invalid_transactions": [] },
            { "id": id, "status": "INVALID", "invalid_transactions": [] }
        ]),
        _ => json!([{ "id": id, "status": "COMMITTED", "invalid_transactions": [] }]),
    };
    Json(json!({ "data": data, "link": format!("http://x/batch_statuses?id={id}") }))
}

async fn state(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let address = params.get("address").cloned().unwrap_or_default();
    let games = [
        stub_game("game-42", GameState::P1Next, "pub1"),
        stub_game("Alpha", GameState::Unset, "pub2"),
    ];
    let data: Vec<Value> = games
        .iter()
        .map(|game| (addressing::record_address(&game.name), game))
        .filter(|(game_address, _)| game_address.starts_with(&address))
        .map(|(game_address, game)| {
            json!({ "address": game_address, "data": codec::encode_game_record(game) })
        })
        .collect();

    Json(json!({
        "data": data,
        "head": "head-1",
        "link": format!("http://x/state?address={address}"),
        "paging": { "start": null, "limit": null, "next_position": null, "next": null }
    }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "validator unavailable")
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "no such route")
}

async fn garbled() -> &'static str {
    "not json"
}

impl StubGateway {
    pub async fn start() -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let router = Router::new()
            .route("/batches", post(submit))
            .route("/batch_statuses", get(batch_statuses))
            .route("/state", get(state))
            .route("/broken/batches", post(broken))
            .route("/broken/state", get(broken))
            .route("/garbled/state", get(garbled))
            .route("/missing/state", get(not_found))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url,
            recorded,
            server_handle,
        }
    }

    pub fn received_batches(&self) -> Vec<Vec<u8>> {
        self.recorded.lock().unwrap().batches.clone()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.recorded.lock().unwrap().content_types.clone()
    }

    pub fn status_queries(&self) -> Vec<(String, u64)> {
        self.recorded.lock().unwrap().status_queries.clone()
    }
}

impl Drop for StubGateway {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}
