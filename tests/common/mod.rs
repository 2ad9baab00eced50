//! Stub adventure server and helpers for driving the network worker.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use academy_escape::client::GameClient;
use academy_escape::networking::{ExitResult, Request, run_session};
use academy_escape::state::State;
use arc_swap::ArcSwap;
use axum::extract::State as Shared;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const TITLE: &str = "Hello, this is the Academy adventure game!";
pub const SESSION_COOKIE: &str = "academy-adventure-session=abc123";

/// Everything the stub saw, in arrival order.
#[derive(Clone, Default)]
pub struct Recorder {
    pub turns: Arc<Mutex<Vec<Value>>>,
    pub cookies: Arc<Mutex<Vec<Option<String>>>>,
}

impl Recorder {
    pub fn turns(&self) -> Vec<Value> {
        self.turns.lock().unwrap().clone()
    }

    pub fn cookies(&self) -> Vec<Option<String>> {
        self.cookies.lock().unwrap().clone()
    }
}

/// Answers like the real backend. `drop` always fails with a 500 so tests can
/// provoke a failed turn mid-game; `exit` ends the game.
pub fn game_server(recorder: Recorder) -> Router {
    Router::new()
        .route("/", get(|| async { TITLE }))
        .route("/GameResponse", post(game_response))
        .route("/CommandOptions", post(command_options))
        .with_state(recorder)
}

/// Title works, every game request fails.
pub fn broken_server() -> Router {
    Router::new()
        .route("/", get(|| async { TITLE }))
        .route(
            "/GameResponse",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
}

async fn game_response(
    Shared(recorder): Shared<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    recorder.turns.lock().unwrap().push(body.clone());
    recorder.cookies.lock().unwrap().push(
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    );

    let command = body["command"].as_str().unwrap_or_default().to_owned();
    let (message, game_over) = match command.as_str() {
        "start" => ("Welcome to the Academy.".to_owned(), false),
        "exit" => ("Thank you for playing!".to_owned(), true),
        "drop" => return (StatusCode::INTERNAL_SERVER_ERROR, "Bad Request Body").into_response(),
        other => (format!("You {other}."), false),
    };

    (
        [(header::SET_COOKIE, SESSION_COOKIE)],
        Json(json!({ "message": message, "game_over": game_over })),
    )
        .into_response()
}

async fn command_options(Json(body): Json<Value>) -> Response {
    match body["command"].as_str() {
        Some("take") => Json(json!(["cd"])).into_response(),
        _ => (StatusCode::NOT_FOUND, "No game found").into_response(),
    }
}

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing is listening on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub struct Session {
    pub state: Arc<ArcSwap<State>>,
    pub tx: mpsc::UnboundedSender<Request>,
    pub handle: JoinHandle<ExitResult>,
}

impl Session {
    pub fn start(base: &str) -> Self {
        let client = GameClient::new(base, Some(Duration::from_secs(5))).unwrap();
        let state = Arc::new(ArcSwap::from_pointee(State::default()));
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_session(client, Arc::clone(&state), rx));
        Self { state, tx, handle }
    }

    pub fn send(&self, request: Request) {
        self.tx.send(request).unwrap();
    }

    /// Poll the published state until `pred` holds, panicking after 5s.
    pub async fn wait_for(&self, pred: impl Fn(&State) -> bool) -> Arc<State> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let current = self.state.load_full();
            if pred(&current) {
                return current;
            }
            if tokio::time::Instant::now() > deadline {
                panic!("timed out waiting for state, last seen: {current:?}");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
