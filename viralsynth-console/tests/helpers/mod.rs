//! Test helper utilities
//!
//! An in-process stub of the ViralSynth backend. Behavior is steered by
//! request content so tests need no setup calls:
//! - niche `slow` (read endpoints) or a prompt starting with `slow` sleeps before answering
//! - niche `broken` or prompt `fail` answers HTTP 500
//! - niche `garbage` answers 200 with a body that is not a list

#![allow(dead_code)]

use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use viralsynth_common::ApiBase;
use viralsynth_console::client::BackendClient;

pub const SLOW_DELAY: Duration = Duration::from_millis(300);

#[derive(Default)]
pub struct StubRecord {
    pub audio_hits: AtomicUsize,
    pub pattern_hits: AtomicUsize,
    pub generate_hits: AtomicUsize,
    pub ingest_hits: AtomicUsize,
    /// Raw query strings received by the read endpoints, in arrival order
    pub queries: Mutex<Vec<String>>,
    /// JSON bodies received by the write endpoints, in arrival order
    pub bodies: Mutex<Vec<Value>>,
}

impl StubRecord {
    pub fn audio(&self) -> usize {
        self.audio_hits.load(Ordering::SeqCst)
    }

    pub fn patterns(&self) -> usize {
        self.pattern_hits.load(Ordering::SeqCst)
    }

    pub fn generate(&self) -> usize {
        self.generate_hits.load(Ordering::SeqCst)
    }

    pub fn ingest(&self) -> usize {
        self.ingest_hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.queries.lock().unwrap().last().cloned()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

pub struct StubBackend {
    pub base: ApiBase,
    pub record: Arc<StubRecord>,
}

impl StubBackend {
    /// Start the stub on an ephemeral port
    pub async fn start() -> Self {
        let record = Arc::new(StubRecord::default());

        let app = Router::new()
            .route("/", get(welcome))
            .route("/api/audio/trending", get(trending_audio))
            .route("/api/patterns", get(patterns))
            .route("/api/generate", post(generate))
            .route("/api/ingest", post(ingest))
            .with_state(Arc::clone(&record));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: ApiBase::parse(&format!("http://{}", addr)).unwrap(),
            record,
        }
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(self.base.clone()).unwrap()
    }
}

/// Client pointed at a port nobody listens on
pub fn unreachable_client() -> BackendClient {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = ApiBase::parse(&format!("http://127.0.0.1:{}", port)).unwrap();
    BackendClient::with_timeout(base, Duration::from_secs(2)).unwrap()
}

type Shared = State<Arc<StubRecord>>;

async fn welcome() -> Json<Value> {
    Json(json!({"message": "Welcome to the ViralSynth API"}))
}

/// Common failure modes for the read endpoints; `None` means answer normally
async fn read_behavior(niche: &str) -> Option<Response> {
    match niche {
        "slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            None
        }
        "broken" => Some(StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        "garbage" => Some(Json(json!({"not": "a list"})).into_response()),
        _ => None,
    }
}

async fn trending_audio(
    State(record): Shared,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record.audio_hits.fetch_add(1, Ordering::SeqCst);
    record.queries.lock().unwrap().push(raw.unwrap_or_default());

    let niche = params.get("niche").cloned().unwrap_or_default();
    if let Some(response) = read_behavior(&niche).await {
        return response;
    }

    Json(json!([
        {"audio_id": "a1", "count": 12, "avg_engagement": 45.5, "niche": niche}
    ]))
    .into_response()
}

async fn patterns(
    State(record): Shared,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record.pattern_hits.fetch_add(1, Ordering::SeqCst);
    record.queries.lock().unwrap().push(raw.unwrap_or_default());

    let niche = params.get("niche").cloned().unwrap_or_default();
    if let Some(response) = read_behavior(&niche).await {
        return response;
    }

    Json(json!([
        {"id": 1, "hook": format!("{}-rare", niche), "prevalence": 0.2, "engagement_score": 0.9},
        {"id": 2, "hook": format!("{}-common", niche), "prevalence": 0.8, "engagement_score": 0.5}
    ]))
    .into_response()
}

async fn generate(State(record): Shared, Json(body): Json<Value>) -> Response {
    record.generate_hits.fetch_add(1, Ordering::SeqCst);
    record.bodies.lock().unwrap().push(body.clone());

    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
    if prompt == "fail" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if prompt.starts_with("slow") {
        tokio::time::sleep(SLOW_DELAY).await;
    }

    Json(json!({
        "script": format!("Script for {}", prompt),
        "storyboard": ["https://example.com/frame-1.png"],
        "notes": ["Keep it short"],
        "variations": {"tiktok": {"hook": "TikTok Hook", "cta": "TikTok CTA"}},
        "package_id": 1
    }))
    .into_response()
}

async fn ingest(State(record): Shared, Json(body): Json<Value>) -> Response {
    record.ingest_hits.fetch_add(1, Ordering::SeqCst);
    record.bodies.lock().unwrap().push(body);

    Json(json!({
        "message": "Ingestion complete",
        "video_ids": [1, 2],
        "patterns": ["Problem-Agitate-Solve"],
        "pattern_ids": [5],
        "videos": [{"id": 1}]
    }))
    .into_response()
}
