//! JSON generation endpoint
//!
//! Same orchestrator as the dashboard form, so a JSON client and the form
//! share one in-flight guard.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use viralsynth_common::models::GenerationResult;

use crate::error::ApiResult;
use crate::orchestrator::{build_payload, GenerationSnapshot, Phase};
use crate::AppState;

/// Body of `POST /api/generate`
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub niche: Option<String>,
    #[serde(default)]
    pub pattern_ids: Option<Vec<i64>>,
}

/// POST /api/generate
///
/// 400 on validation, 409 while a submission is in flight, 502 when the
/// backend call fails.
pub async fn generate_json(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> ApiResult<Json<GenerationResult>> {
    let mut request = build_payload(&body.prompt, body.niche.as_deref().unwrap_or(""), "")?;
    request.pattern_ids = body.pattern_ids.filter(|ids| !ids.is_empty());

    let result = state.generation.submit(request).await?;
    Ok(Json(GenerationResult::clone(&result)))
}

#[derive(Debug, Serialize)]
pub struct GenerationStatus {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,
}

impl GenerationStatus {
    fn from_snapshot(snapshot: GenerationSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            started_at: snapshot.started_at,
            error: snapshot.error,
            result: snapshot.result.map(|r| GenerationResult::clone(&r)),
        }
    }
}

/// GET /api/generate/status
pub async fn generate_status(State(state): State<AppState>) -> Json<GenerationStatus> {
    Json(GenerationStatus::from_snapshot(state.generation.snapshot().await))
}

/// POST /api/generate/reset
///
/// Clears a finished outcome back to idle; 409 while submitting.
pub async fn generate_reset(State(state): State<AppState>) -> ApiResult<Json<GenerationStatus>> {
    state.generation.reset().await?;
    Ok(Json(GenerationStatus::from_snapshot(state.generation.snapshot().await)))
}
