//! Ingestion view

use serde::Deserialize;
use viralsynth_common::models::IngestResponse;

use super::{error_notice, escape, page, Nav};
use crate::orchestrator::{IngestSnapshot, Phase, DEFAULT_TOP_PERCENTILE};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestForm {
    /// Comma-separated niches
    #[serde(default)]
    pub niches: String,
    #[serde(default)]
    pub top_percentile: String,
    #[serde(default)]
    pub provider: String,
}

pub fn ingest_page(form: &IngestForm, snapshot: &IngestSnapshot, notice: Option<&str>) -> String {
    let mut sections = vec![request_form(form, snapshot.is_submitting())];

    if let Some(message) = notice {
        sections.push(error_notice(message));
    }

    match snapshot.phase {
        Phase::Submitting => sections.push(
            r#"<div class="notice loading">Ingesting&hellip; <a href="/dashboard/ingest">Refresh</a></div>"#
                .to_string(),
        ),
        Phase::Failed => {
            sections.push(error_notice(snapshot.error.as_deref().unwrap_or("Ingestion failed")))
        }
        Phase::Idle | Phase::Succeeded => {}
    }

    if let Some(outcome) = snapshot.result.as_deref() {
        sections.push(outcome_section(outcome));
    }

    page("Ingest", Nav::Ingest, &sections.join("\n"))
}

fn request_form(form: &IngestForm, submitting: bool) -> String {
    let disabled = if submitting { " disabled" } else { "" };
    format!(
        r#"<form method="post" action="/dashboard/ingest" class="card">
    <label>Niches <input type="text" name="niches" value="{niches}" placeholder="tech, fitness" required></label>
    <label>Top percentile <input type="text" name="top_percentile" value="{percentile}" placeholder="{default_percentile}"></label>
    <label>Provider <input type="text" name="provider" value="{provider}" placeholder="Backend default"></label>
    <button type="submit"{disabled}>Start ingestion</button>
</form>"#,
        niches = escape(&form.niches),
        percentile = escape(&form.top_percentile),
        default_percentile = DEFAULT_TOP_PERCENTILE,
        provider = escape(&form.provider),
        disabled = disabled,
    )
}

fn outcome_section(outcome: &IngestResponse) -> String {
    let patterns = if outcome.patterns.is_empty() {
        "<p class=\"empty\">No patterns mined.</p>".to_string()
    } else {
        let items: String = outcome
            .patterns
            .iter()
            .map(|p| format!("<li>{}</li>", escape(p)))
            .collect();
        format!("<ul>{}</ul>", items)
    };

    format!(
        r#"<section class="card ingest-outcome">
    <h3>{message}</h3>
    <p>Videos ingested: {videos} &middot; Patterns stored: {stored}</p>
    {patterns}
</section>"#,
        message = escape(&outcome.message),
        videos = outcome.video_ids.len(),
        stored = outcome.pattern_ids.len(),
        patterns = patterns,
    )
}
