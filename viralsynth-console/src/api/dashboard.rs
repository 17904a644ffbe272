//! Dashboard page handlers
//!
//! Each handler turns request input into view state through the library
//! (query builder, fetcher, orchestrator) and hands it to `render`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Form,
};
use serde::Deserialize;
use viralsynth_common::models::{GenerationRequest, IngestRequest};
use viralsynth_common::query::{build_query, Collection, FilterState};
use viralsynth_common::{time, Error};

use crate::render;
use crate::render::generate::GenerateForm;
use crate::render::ingest::IngestForm;
use crate::AppState;

/// Filter inputs shared by the read views; absent fields take view defaults
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub niche: Option<String>,
    pub limit: Option<String>,
    pub days: Option<String>,
    pub sort: Option<String>,
    /// Present on retry links: re-fetch even if the filters are unchanged
    pub refresh: Option<String>,
}

impl ViewQuery {
    fn filter(&self, collection: Collection) -> FilterState {
        FilterState::from_inputs(
            collection,
            self.niche.as_deref(),
            self.limit.as_deref(),
            self.days.as_deref(),
            self.sort.as_deref(),
        )
    }

    fn wants_refresh(&self) -> bool {
        self.refresh.is_some()
    }
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let backend = state.client.ping().await;
    Html(render::index::index_page(state.client.base().as_str(), &backend))
}

/// GET /dashboard/audio
pub async fn audio_view(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Html<String> {
    let filter = query.filter(Collection::TrendingAudio);
    let descriptor = build_query(Collection::TrendingAudio, &filter, time::now());

    let fetched = if query.wants_refresh() {
        state.audio.reload(descriptor).await
    } else {
        state.audio.load(descriptor).await
    };

    Html(render::audio::audio_page(&filter, &fetched))
}

/// GET /dashboard/patterns
pub async fn patterns_view(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Html<String> {
    let filter = query.filter(Collection::Patterns);
    let descriptor = build_query(Collection::Patterns, &filter, time::now());

    let fetched = if query.wants_refresh() {
        state.patterns.reload(descriptor).await
    } else {
        state.patterns.load(descriptor).await
    };

    Html(render::patterns::patterns_page(&filter, &fetched))
}

/// GET /dashboard/generate
pub async fn generate_view(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.generation.snapshot().await;
    let form = snapshot.request.as_ref().map(generate_form_from).unwrap_or_default();
    Html(render::generate::generate_page(&form, &snapshot, None))
}

/// POST /dashboard/generate
pub async fn generate_submit(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .generation
        .submit_form(&form.prompt, &form.niche, &form.pattern_ids)
        .await;
    let (status, notice) = submission_status(outcome.err());

    let snapshot = state.generation.snapshot().await;
    let html = render::generate::generate_page(&form, &snapshot, notice.as_deref());
    (status, Html(html))
}

/// GET /dashboard/ingest
pub async fn ingest_view(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.ingest.snapshot().await;
    let form = snapshot.request.as_ref().map(ingest_form_from).unwrap_or_default();
    Html(render::ingest::ingest_page(&form, &snapshot, None))
}

/// POST /dashboard/ingest
pub async fn ingest_submit(
    State(state): State<AppState>,
    Form(form): Form<IngestForm>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .ingest
        .submit_form(&form.niches, &form.top_percentile, &form.provider)
        .await;
    let (status, notice) = submission_status(outcome.err());

    let snapshot = state.ingest.snapshot().await;
    let html = render::ingest::ingest_page(&form, &snapshot, notice.as_deref());
    (status, Html(html))
}

/// Page status and inline notice for a submission outcome
///
/// Backend failures are already recorded in the view's state machine and
/// rendered from the snapshot, so they carry no separate notice.
fn submission_status(error: Option<Error>) -> (StatusCode, Option<String>) {
    match error {
        None => (StatusCode::OK, None),
        Some(Error::Validation(msg)) => (StatusCode::BAD_REQUEST, Some(msg)),
        Some(Error::Busy(_)) => (
            StatusCode::CONFLICT,
            Some("A submission is already in progress. Wait for it to finish.".to_string()),
        ),
        Some(Error::Fetch(_)) => (StatusCode::BAD_GATEWAY, None),
        Some(other) => (StatusCode::INTERNAL_SERVER_ERROR, Some(other.to_string())),
    }
}

fn generate_form_from(request: &GenerationRequest) -> GenerateForm {
    GenerateForm {
        prompt: request.prompt.clone(),
        niche: request.niche.clone().unwrap_or_default(),
        pattern_ids: request
            .pattern_ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", "))
            .unwrap_or_default(),
    }
}

fn ingest_form_from(request: &IngestRequest) -> IngestForm {
    IngestForm {
        niches: request.niches.join(", "),
        top_percentile: request.top_percentile.to_string(),
        provider: request.provider.clone().unwrap_or_default(),
    }
}
