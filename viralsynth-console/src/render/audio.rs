//! Trending-audio view
//!
//! Rows are shown in server order; the backend owns this ranking.

use viralsynth_common::models::AudioRanking;
use viralsynth_common::query::{FilterState, LIMIT_RANGE, LOOKBACK_RANGE};

use super::{empty_notice, escape, fetch_error_block, href_with, is_web_url, loading_block, page, Nav};
use crate::fetcher::FetchState;

const PATH: &str = "/dashboard/audio";

/// Display-ready table row
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRow {
    /// 1-based position in server order
    pub rank: usize,
    pub audio_id: String,
    pub niche: Option<String>,
    pub count: u64,
    /// Average engagement, one decimal
    pub engagement: String,
    pub url: Option<String>,
}

pub fn audio_rows(items: &[AudioRanking]) -> Vec<AudioRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| AudioRow {
            rank: i + 1,
            audio_id: item.audio_id.clone(),
            niche: item.niche.clone().filter(|n| !n.is_empty()),
            count: item.count,
            engagement: format!("{:.1}", item.avg_engagement),
            url: item.url.clone().filter(|u| !u.is_empty()),
        })
        .collect()
}

/// Query params that reproduce `filter` on this view
pub fn filter_params(filter: &FilterState) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !filter.niche.is_empty() {
        params.push(("niche", filter.niche.clone()));
    }
    params.push(("limit", filter.limit.to_string()));
    params.push(("days", filter.lookback_days.to_string()));
    params
}

pub fn audio_page(filter: &FilterState, state: &FetchState<AudioRanking>) -> String {
    let params = filter_params(filter);
    let mut retry = params.clone();
    retry.push(("refresh", "1".to_string()));
    let retry_href = href_with(PATH, &retry);

    let content = match state {
        FetchState::Loading => loading_block(&retry_href),
        FetchState::Failed(err) => fetch_error_block(err, &retry_href),
        FetchState::Ready(items) if items.is_empty() => {
            empty_notice("No audio rankings available for the selected filters.")
        }
        FetchState::Ready(items) => audio_table(&audio_rows(items)),
    };

    let body = format!("{}\n{}", filter_form(filter), content);
    page("Trending Audio", Nav::Audio, &body)
}

fn filter_form(filter: &FilterState) -> String {
    format!(
        r#"<form method="get" action="{path}" class="card">
    <label>Niche <input type="text" name="niche" value="{niche}" placeholder="All niches"></label>
    <label>Limit <input type="number" name="limit" min="{lmin}" max="{lmax}" value="{limit}"></label>
    <label>Lookback (days) <input type="number" name="days" min="{dmin}" max="{dmax}" value="{days}"></label>
    <button type="submit">Apply</button>
</form>"#,
        path = PATH,
        niche = escape(&filter.niche),
        lmin = LIMIT_RANGE.0,
        lmax = LIMIT_RANGE.1,
        limit = filter.limit,
        dmin = LOOKBACK_RANGE.0,
        dmax = LOOKBACK_RANGE.1,
        days = filter.lookback_days,
    )
}

fn audio_table(rows: &[AudioRow]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            let link = match row.url.as_deref() {
                Some(url) if is_web_url(url) => {
                    format!(r#"<a href="{0}" target="_blank" rel="noopener">{0}</a>"#, escape(url))
                }
                Some(url) => escape(url).into_owned(),
                None => "n/a".to_string(),
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                row.rank,
                escape(&row.audio_id),
                escape(row.niche.as_deref().unwrap_or("—")),
                row.count,
                row.engagement,
                link
            )
        })
        .collect();

    format!(
        r#"<table class="audio-rankings">
<thead><tr><th>Rank</th><th>Audio ID</th><th>Niche</th><th>Usage Count</th><th>Avg Engagement</th><th>Link</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
        body
    )
}
