//! Generation payload construction
//!
//! Turns generate-form text into a [`GenerationRequest`]. Empty optional
//! inputs are omitted from the payload rather than sent as empty values.

use viralsynth_common::models::GenerationRequest;
use viralsynth_common::{Error, Result};

/// Build the generation request from raw form text
///
/// The prompt is required and forwarded verbatim. `niche` is included only
/// when it has non-blank content. `pattern_overrides` is a comma-separated id
/// list; entries that are blank or not integers are dropped, and the field is
/// omitted when nothing survives.
pub fn build_payload(prompt: &str, niche: &str, pattern_overrides: &str) -> Result<GenerationRequest> {
    if prompt.trim().is_empty() {
        return Err(Error::Validation("Prompt is required".to_string()));
    }

    let niche = niche.trim();
    let pattern_ids = parse_pattern_ids(pattern_overrides);

    Ok(GenerationRequest {
        prompt: prompt.to_string(),
        niche: (!niche.is_empty()).then(|| niche.to_string()),
        pattern_ids: (!pattern_ids.is_empty()).then_some(pattern_ids),
    })
}

/// Parse a comma-separated pattern id list, keeping input order
pub fn parse_pattern_ids(text: &str) -> Vec<i64> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}
