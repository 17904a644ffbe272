//! Pattern view
//!
//! The fetched collection is ranked here, per request, by the selected sort
//! key. Changing only the sort key re-ranks without a new fetch.

use viralsynth_common::models::Pattern;
use viralsynth_common::query::{FilterState, SortKey, LIMIT_RANGE};
use viralsynth_common::rank_patterns;

use super::{empty_notice, escape, fetch_error_block, href_with, loading_block, page, Nav};
use crate::fetcher::FetchState;

const PATH: &str = "/dashboard/patterns";

/// Query params that reproduce `filter` on this view
pub fn filter_params(filter: &FilterState) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !filter.niche.is_empty() {
        params.push(("niche", filter.niche.clone()));
    }
    params.push(("limit", filter.limit.to_string()));
    params.push(("sort", filter.sort_key.to_string()));
    params
}

pub fn patterns_page(filter: &FilterState, state: &FetchState<Pattern>) -> String {
    let params = filter_params(filter);
    let mut retry = params.clone();
    retry.push(("refresh", "1".to_string()));
    let retry_href = href_with(PATH, &retry);

    let content = match state {
        FetchState::Loading => loading_block(&retry_href),
        FetchState::Failed(err) => fetch_error_block(err, &retry_href),
        FetchState::Ready(items) if items.is_empty() => {
            empty_notice("No patterns found for the selected filters.")
        }
        FetchState::Ready(items) => rank_patterns(items, filter.sort_key)
            .iter()
            .map(pattern_card)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let body = format!("{}\n{}", filter_form(filter), content);
    page("Patterns", Nav::Patterns, &body)
}

fn filter_form(filter: &FilterState) -> String {
    let option = |key: SortKey, label: &str| {
        let selected = if filter.sort_key == key { " selected" } else { "" };
        format!(r#"<option value="{}"{}>{}</option>"#, key, selected, label)
    };

    format!(
        r#"<form method="get" action="{path}" class="card">
    <label>Niche <input type="text" name="niche" value="{niche}" placeholder="All niches"></label>
    <label>Limit <input type="number" name="limit" min="{lmin}" max="{lmax}" value="{limit}"></label>
    <label>Sort by <select name="sort">
        {prevalence}
        {engagement}
    </select></label>
    <button type="submit">Apply</button>
</form>"#,
        path = PATH,
        niche = escape(&filter.niche),
        lmin = LIMIT_RANGE.0,
        lmax = LIMIT_RANGE.1,
        limit = filter.limit,
        prevalence = option(SortKey::Prevalence, "Prevalence"),
        engagement = option(SortKey::Engagement, "Engagement"),
    )
}

fn pattern_card(pattern: &Pattern) -> String {
    let id = pattern
        .id
        .map(|id| format!(r#" <span class="pattern-id">#{}</span>"#, id))
        .unwrap_or_default();

    format!(
        r#"<div class="card pattern" data-key="{key}">
    <h3>{hook}{id}</h3>
    <p><strong>Core value loop:</strong> {core}</p>
    <p><strong>Narrative arc:</strong> {arc}</p>
    <p><strong>Visual formula:</strong> {visual}</p>
    <p><strong>CTA:</strong> {cta}</p>
    <p class="metrics">Prevalence: {prevalence:.2} &middot; Engagement: {engagement:.2}</p>
</div>"#,
        key = escape(&pattern.key().to_string()),
        hook = escape(&pattern.hook),
        id = id,
        core = escape(&pattern.core_value_loop),
        arc = escape(&pattern.narrative_arc),
        visual = escape(&pattern.visual_formula),
        cta = escape(&pattern.cta),
        prevalence = pattern.metric(SortKey::Prevalence),
        engagement = pattern.metric(SortKey::Engagement),
    )
}
