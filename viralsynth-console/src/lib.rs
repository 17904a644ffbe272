//! viralsynth-console library
//!
//! Browser console for the ViralSynth backend: trending-audio and pattern
//! dashboards, content-package generation, and ingestion.

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use viralsynth_common::models::{AudioRanking, Pattern};

pub mod api;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod render;

use client::BackendClient;
use fetcher::CollectionFetcher;
use orchestrator::{GenerationOrchestrator, IngestOrchestrator};

/// Application state shared across HTTP handlers
///
/// Every view owns its fetcher or orchestrator; nothing is shared between
/// views except the HTTP client's connection pool.
#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
    pub audio: Arc<CollectionFetcher<AudioRanking>>,
    pub patterns: Arc<CollectionFetcher<Pattern>>,
    pub generation: Arc<GenerationOrchestrator>,
    pub ingest: Arc<IngestOrchestrator>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(client: BackendClient) -> Self {
        Self {
            audio: Arc::new(CollectionFetcher::new(client.clone())),
            patterns: Arc::new(CollectionFetcher::new(client.clone())),
            generation: Arc::new(GenerationOrchestrator::generation(client.clone())),
            ingest: Arc::new(IngestOrchestrator::ingestion(client.clone())),
            client,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    let dashboard = Router::new()
        .route("/", get(api::index))
        .route("/dashboard/audio", get(api::audio_view))
        .route("/dashboard/patterns", get(api::patterns_view))
        .route(
            "/dashboard/generate",
            get(api::generate_view).post(api::generate_submit),
        )
        .route(
            "/dashboard/ingest",
            get(api::ingest_view).post(api::ingest_submit),
        );

    let json = Router::new()
        .route("/api/generate", post(api::generate_json))
        .route("/api/generate/status", get(api::generate_status))
        .route("/api/generate/reset", post(api::generate_reset))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(dashboard)
        .merge(json)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
