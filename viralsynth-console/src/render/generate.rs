//! Generation view: request form plus the generated package

use serde::Deserialize;
use viralsynth_common::models::{GenerationResult, GenerationWhy};

use super::{empty_notice, error_notice, escape, is_web_url, page, Nav};
use crate::orchestrator::{GenerationSnapshot, Phase};

/// Raw generate-form fields, echoed back into the form on re-render
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub niche: String,
    /// Comma-separated pattern id overrides
    #[serde(default)]
    pub pattern_ids: String,
}

/// Render the generation view
///
/// `notice` carries a rejection that never reached the state machine
/// (validation error, busy).
pub fn generate_page(form: &GenerateForm, snapshot: &GenerationSnapshot, notice: Option<&str>) -> String {
    let mut sections = vec![request_form(form, snapshot.is_submitting())];

    if let Some(message) = notice {
        sections.push(error_notice(message));
    }

    match snapshot.phase {
        Phase::Submitting => sections.push(
            r#"<div class="notice loading">Generating&hellip; <a href="/dashboard/generate">Refresh</a></div>"#
                .to_string(),
        ),
        Phase::Failed => {
            let message = snapshot.error.as_deref().unwrap_or("Generation failed");
            sections.push(error_notice(message));
        }
        Phase::Idle | Phase::Succeeded => {}
    }

    // While submitting the previous package stays on screen
    if let Some(result) = snapshot.result.as_deref() {
        sections.push(result_section(result));
    }

    page("Generate", Nav::Generate, &sections.join("\n"))
}

fn request_form(form: &GenerateForm, submitting: bool) -> String {
    let disabled = if submitting { " disabled" } else { "" };
    let label = if submitting { "Generating..." } else { "Generate" };
    format!(
        r#"<form method="post" action="/dashboard/generate" class="card">
    <label>Prompt <textarea name="prompt" rows="4" cols="60" required>{prompt}</textarea></label>
    <label>Niche <input type="text" name="niche" value="{niche}" placeholder="Optional"></label>
    <label>Pattern overrides <input type="text" name="pattern_ids" value="{ids}" placeholder="e.g. 12, 7"></label>
    <button type="submit"{disabled}>{label}</button>
</form>"#,
        prompt = escape(&form.prompt),
        niche = escape(&form.niche),
        ids = escape(&form.pattern_ids),
        disabled = disabled,
        label = label,
    )
}

fn result_section(result: &GenerationResult) -> String {
    let mut out = String::from("<section class=\"result\">\n");

    if let Some(id) = result.package_id {
        out.push_str(&format!("<p class=\"package-id\">Package #{}</p>\n", id));
    }

    out.push_str(&format!(
        "<div class=\"card\"><h3>Script</h3><pre>{}</pre></div>\n",
        escape(&result.script)
    ));

    out.push_str("<div class=\"card\"><h3>Storyboard</h3>\n");
    if result.storyboard.is_empty() {
        out.push_str(&empty_notice("No storyboard frames returned."));
    } else {
        for (i, frame) in result.storyboard.iter().enumerate() {
            if is_web_url(frame) {
                out.push_str(&format!(
                    r#"<img src="{}" alt="Frame {}" width="180">"#,
                    escape(frame),
                    i + 1
                ));
            } else {
                out.push_str(&format!("<p>Frame {}: {}</p>", i + 1, escape(frame)));
            }
            out.push('\n');
        }
    }
    out.push_str("</div>\n");

    if !result.notes.is_empty() {
        out.push_str("<div class=\"card\"><h3>Notes</h3><ul>\n");
        for note in &result.notes {
            out.push_str(&format!("<li>{}</li>\n", escape(note)));
        }
        out.push_str("</ul></div>\n");
    }

    if let Some(why) = &result.why {
        out.push_str(&why_section(why));
    }

    out.push_str("<div class=\"card\"><h3>Platform Variations</h3>\n");
    if result.variations.is_empty() {
        out.push_str(&empty_notice("No platform variations returned."));
    } else {
        for (platform, variation) in &result.variations {
            out.push_str(&format!(
                "<div class=\"variation\"><h4>{}</h4><p><strong>Hook:</strong> {}</p><p><strong>CTA:</strong> {}</p></div>\n",
                escape(platform),
                escape(&variation.hook),
                escape(&variation.cta)
            ));
        }
    }
    out.push_str("</div>\n");

    if let Some(url) = result.audio_url.as_deref().filter(|u| is_web_url(u)) {
        let label = result.audio_id.as_deref().unwrap_or("audio");
        out.push_str(&format!(
            "<p>Suggested audio: <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></p>\n",
            escape(url),
            escape(label)
        ));
    }

    out.push_str("</section>");
    out
}

fn why_section(why: &GenerationWhy) -> String {
    let pattern_id = why
        .pattern
        .pattern_id
        .map(|id| format!(" (#{})", id))
        .unwrap_or_default();

    format!(
        r#"<div class="card why">
    <h3>Why these choices?</h3>
    <h4>Pattern: {hook}{pattern_id}</h4>
    <p>Prevalence {prevalence:.2} &middot; Engagement {engagement:.2} &middot; Score {pscore:.2}</p>
    <p>{pexplain}</p>
    <h4>Audio: {audio_id}</h4>
    <p>Used {usage} times &middot; Avg engagement {avg:.1} &middot; Score {ascore:.2}</p>
    <p>{aexplain}</p>
</div>
"#,
        hook = escape(&why.pattern.hook),
        pattern_id = pattern_id,
        prevalence = why.pattern.prevalence,
        engagement = why.pattern.engagement_score,
        pscore = why.pattern.score,
        pexplain = escape(&why.pattern.explanation),
        audio_id = escape(&why.audio.audio_id),
        usage = why.audio.usage_count,
        avg = why.audio.avg_engagement,
        ascore = why.audio.score,
        aexplain = escape(&why.audio.explanation),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use viralsynth_common::models::{AudioWhy, PatternWhy, PlatformVariation};

    fn snapshot(phase: Phase, result: Option<GenerationResult>, error: Option<&str>) -> GenerationSnapshot {
        GenerationSnapshot {
            phase,
            request: None,
            started_at: None,
            result: result.map(Arc::new),
            error: error.map(str::to_string),
        }
    }

    fn minimal_result() -> GenerationResult {
        GenerationResult {
            script: "Hook them <fast>".to_string(),
            storyboard: vec!["https://example.com/frame-1.png".to_string()],
            notes: vec!["Keep it under 30s".to_string()],
            variations: BTreeMap::new(),
            why: None,
            package_id: None,
            audio_id: None,
            audio_url: None,
            pattern_ids: None,
        }
    }

    #[test]
    fn test_idle_page_has_enabled_form() {
        let html = generate_page(&GenerateForm::default(), &snapshot(Phase::Idle, None, None), None);
        assert!(html.contains(r#"<button type="submit">Generate</button>"#));
        assert!(!html.contains("Why these choices?"));
    }

    #[test]
    fn test_submit_disabled_while_submitting() {
        let html = generate_page(&GenerateForm::default(), &snapshot(Phase::Submitting, None, None), None);
        assert!(html.contains("<button type=\"submit\" disabled>"));
    }

    #[test]
    fn test_result_without_why_or_variations() {
        let html = generate_page(
            &GenerateForm::default(),
            &snapshot(Phase::Succeeded, Some(minimal_result()), None),
            None,
        );
        assert!(html.contains("Hook them &lt;fast&gt;"));
        assert!(html.contains("No platform variations returned."));
        assert!(!html.contains("Why these choices?"));
        assert!(html.contains(r#"<img src="https://example.com/frame-1.png" alt="Frame 1""#));
        assert!(html.contains("<li>Keep it under 30s</li>"));
    }

    #[test]
    fn test_result_with_why_and_variations() {
        let mut result = minimal_result();
        result.package_id = Some(3);
        result.variations.insert(
            "tiktok".to_string(),
            PlatformVariation {
                hook: "TikTok Hook".to_string(),
                cta: "TikTok CTA".to_string(),
            },
        );
        result.why = Some(GenerationWhy {
            pattern: PatternWhy {
                pattern_id: Some(7),
                hook: "Stop scrolling".to_string(),
                prevalence: 0.5,
                engagement_score: 0.7,
                score: 0.6,
                explanation: "Most balanced pattern".to_string(),
            },
            audio: AudioWhy {
                audio_id: "audio-1".to_string(),
                usage_count: 10,
                avg_engagement: 75.0,
                score: 45.0,
                explanation: "High engagement audio".to_string(),
            },
        });

        let html = generate_page(
            &GenerateForm::default(),
            &snapshot(Phase::Succeeded, Some(result), None),
            None,
        );
        assert!(html.contains("Why these choices?"));
        assert!(html.contains("Pattern: Stop scrolling (#7)"));
        assert!(html.contains("Most balanced pattern"));
        assert!(html.contains("Used 10 times"));
        assert!(html.contains("<h4>tiktok</h4>"));
        assert!(html.contains("Package #3"));
        assert!(!html.contains("No platform variations returned."));
    }

    #[test]
    fn test_failed_shows_message_and_no_result() {
        let html = generate_page(
            &GenerateForm::default(),
            &snapshot(Phase::Failed, None, Some("Request failed with status 500")),
            None,
        );
        assert!(html.contains("Request failed with status 500"));
        assert!(!html.contains("class=\"result\""));
    }

    #[test]
    fn test_previous_result_visible_while_submitting() {
        let html = generate_page(
            &GenerateForm::default(),
            &snapshot(Phase::Submitting, Some(minimal_result()), None),
            None,
        );
        assert!(html.contains("Generating&hellip;"));
        assert!(html.contains("Hook them &lt;fast&gt;"));
    }

    #[test]
    fn test_form_values_echoed_and_notice_shown() {
        let form = GenerateForm {
            prompt: String::new(),
            niche: "tech".to_string(),
            pattern_ids: "1, x".to_string(),
        };
        let html = generate_page(&form, &snapshot(Phase::Idle, None, None), Some("Prompt is required"));
        assert!(html.contains(r#"name="niche" value="tech""#));
        assert!(html.contains(r#"value="1, x""#));
        assert!(html.contains("Prompt is required"));
    }
}
