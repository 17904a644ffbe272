//! Backend data model
//!
//! Value types exchanged with the ViralSynth backend. Every optional field is
//! an `Option` so consumers must handle absence explicitly; fields the backend
//! is known to omit on partial records default instead of failing the decode.
//! Structurally wrong payloads (wrong JSON types, missing identity fields)
//! still fail to decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::query::SortKey;

// ========================================
// Read models
// ========================================

/// One entry of the trending-audio ranking, in server order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRanking {
    pub audio_id: String,
    #[serde(default)]
    pub audio_hash: String,
    /// Number of videos using this audio
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub avg_engagement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
}

/// Mined narrative pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub hook: String,
    #[serde(default)]
    pub core_value_loop: String,
    #[serde(default)]
    pub narrative_arc: String,
    #[serde(default)]
    pub visual_formula: String,
    #[serde(default)]
    pub cta: String,
    /// Share of the corpus following this pattern (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevalence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
}

/// Identity of a pattern for display keys
///
/// Hooks are not unique; `Hook` is only a best-effort fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternKey {
    Id(i64),
    Hook(String),
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKey::Id(id) => write!(f, "pattern-{}", id),
            PatternKey::Hook(hook) => write!(f, "hook-{}", hook),
        }
    }
}

impl Pattern {
    /// Ranking metric for `key`; absent metrics rank as zero
    pub fn metric(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Prevalence => self.prevalence.unwrap_or(0.0),
            SortKey::Engagement => self.engagement_score.unwrap_or(0.0),
        }
    }

    pub fn key(&self) -> PatternKey {
        match self.id {
            Some(id) => PatternKey::Id(id),
            None => PatternKey::Hook(self.hook.clone()),
        }
    }
}

// ========================================
// Generation
// ========================================

/// Body of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_ids: Option<Vec<i64>>,
}

/// Hook and call-to-action tailored to one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformVariation {
    pub hook: String,
    pub cta: String,
}

/// Why a pattern was selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternWhy {
    #[serde(default)]
    pub pattern_id: Option<i64>,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub prevalence: f64,
    #[serde(default)]
    pub engagement_score: f64,
    pub score: f64,
    pub explanation: String,
}

/// Why an audio track was selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioWhy {
    #[serde(default)]
    pub audio_id: String,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub avg_engagement: f64,
    pub score: f64,
    pub explanation: String,
}

/// Explainability block attached to a generated package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationWhy {
    pub pattern: PatternWhy,
    pub audio: AudioWhy,
}

/// Generated content package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub script: String,
    /// Storyboard frame image URLs, in frame order
    #[serde(default)]
    pub storyboard: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Platform name -> variation, sorted by platform name
    #[serde(default)]
    pub variations: BTreeMap<String, PlatformVariation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<GenerationWhy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_ids: Option<Vec<i64>>,
}

// ========================================
// Ingestion
// ========================================

/// Body of `POST /api/ingest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub niches: Vec<String>,
    /// Top-percentile threshold (0-1] for selecting high performers
    pub top_percentile: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Ingestion outcome
///
/// The backend also embeds enriched video records and a sample package; the
/// console does not display them and ignores those fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    #[serde(default)]
    pub video_ids: Vec<i64>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub pattern_ids: Vec<i64>,
}

/// Welcome payload of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audio_ranking_partial_record() {
        let audio: AudioRanking =
            serde_json::from_value(json!({"audio_id": "a1", "count": 12, "avg_engagement": 45.5}))
                .unwrap();
        assert_eq!(audio.audio_id, "a1");
        assert_eq!(audio.count, 12);
        assert_eq!(audio.audio_hash, "");
        assert!(audio.url.is_none());
        assert!(audio.niche.is_none());
    }

    #[test]
    fn test_audio_ranking_requires_id() {
        let result = serde_json::from_value::<AudioRanking>(json!({"count": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn test_audio_ranking_rejects_wrong_types() {
        let result =
            serde_json::from_value::<AudioRanking>(json!({"audio_id": "a1", "count": "many"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_pattern_missing_metrics_rank_as_zero() {
        let pattern: Pattern = serde_json::from_value(json!({"hook": "Stop scrolling"})).unwrap();
        assert_eq!(pattern.metric(SortKey::Prevalence), 0.0);
        assert_eq!(pattern.metric(SortKey::Engagement), 0.0);
        assert_eq!(pattern.key(), PatternKey::Hook("Stop scrolling".to_string()));
    }

    #[test]
    fn test_pattern_key_prefers_id() {
        let pattern: Pattern =
            serde_json::from_value(json!({"id": 7, "hook": "h", "prevalence": 0.4})).unwrap();
        assert_eq!(pattern.key(), PatternKey::Id(7));
        assert_eq!(pattern.metric(SortKey::Prevalence), 0.4);
    }

    #[test]
    fn test_generation_request_omits_absent_fields() {
        let request = GenerationRequest {
            prompt: "Explain RAG".to_string(),
            niche: None,
            pattern_ids: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"prompt": "Explain RAG"}));
    }

    #[test]
    fn test_generation_result_without_why_or_variations() {
        let result: GenerationResult = serde_json::from_value(json!({
            "script": "s",
            "storyboard": ["https://example.com/frame-1"],
            "notes": []
        }))
        .unwrap();
        assert!(result.why.is_none());
        assert!(result.variations.is_empty());
        assert!(result.package_id.is_none());
    }

    #[test]
    fn test_generation_result_with_why() {
        let result: GenerationResult = serde_json::from_value(json!({
            "script": "Test script",
            "storyboard": [],
            "notes": ["Note one"],
            "variations": {"tiktok": {"hook": "TikTok Hook", "cta": "TikTok CTA"}},
            "why": {
                "pattern": {"pattern_id": null, "hook": "Hook", "prevalence": 0.5,
                            "engagement_score": 0.7, "score": 0.6,
                            "explanation": "Most balanced pattern"},
                "audio": {"audio_id": "audio-1", "usage_count": 10, "avg_engagement": 75,
                          "score": 45, "explanation": "High engagement audio"}
            },
            "package_id": 3
        }))
        .unwrap();
        let why = result.why.unwrap();
        assert_eq!(why.pattern.pattern_id, None);
        assert_eq!(why.audio.usage_count, 10);
        assert_eq!(why.audio.avg_engagement, 75.0);
        assert_eq!(result.variations["tiktok"].cta, "TikTok CTA");
        assert_eq!(result.package_id, Some(3));
    }

    #[test]
    fn test_generation_result_requires_script() {
        let result = serde_json::from_value::<GenerationResult>(json!({"storyboard": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_ingest_response_ignores_embedded_records() {
        let response: IngestResponse = serde_json::from_value(json!({
            "message": "Ingestion complete",
            "patterns": ["Problem-Agitate-Solve"],
            "videos": [{"id": 1}],
            "generated": {"script": "x", "variations": {"tiktok": "legacy"}}
        }))
        .unwrap();
        assert_eq!(response.message, "Ingestion complete");
        assert_eq!(response.patterns.len(), 1);
        assert!(response.video_ids.is_empty());
    }
}
