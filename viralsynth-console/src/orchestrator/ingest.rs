//! Ingestion payload construction

use viralsynth_common::models::IngestRequest;
use viralsynth_common::{Error, Result};

/// Percentile used when the form leaves the field empty
pub const DEFAULT_TOP_PERCENTILE: f64 = 0.05;

/// Build the ingestion request from raw form text
///
/// `niches` is comma-separated and must name at least one niche.
/// `top_percentile` must be a number in (0, 1]; blank means
/// [`DEFAULT_TOP_PERCENTILE`]. A blank provider lets the backend choose.
pub fn build_ingest_payload(niches: &str, top_percentile: &str, provider: &str) -> Result<IngestRequest> {
    let niches: Vec<String> = niches
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if niches.is_empty() {
        return Err(Error::Validation("At least one niche is required".to_string()));
    }

    let top_percentile = match top_percentile.trim() {
        "" => DEFAULT_TOP_PERCENTILE,
        raw => raw
            .parse::<f64>()
            .ok()
            .filter(|p| *p > 0.0 && *p <= 1.0)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Top percentile must be a number in (0, 1], got '{}'",
                    raw
                ))
            })?,
    };

    let provider = provider.trim();

    Ok(IngestRequest {
        niches,
        top_percentile,
        provider: (!provider.is_empty()).then(|| provider.to_string()),
    })
}
