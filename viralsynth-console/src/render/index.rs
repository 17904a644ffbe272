//! Overview page: backend reachability and build identification

use viralsynth_common::models::BackendStatus;
use viralsynth_common::FetchError;

use super::{escape, page, Nav};

pub fn index_page(api_base: &str, backend: &Result<BackendStatus, FetchError>) -> String {
    let status = match backend {
        Ok(status) => format!(
            r#"<div class="notice">Backend reachable: {}</div>"#,
            escape(&status.message)
        ),
        Err(err) => format!(
            r#"<div class="notice error">Backend not available: {} <a href="/">Retry</a></div>"#,
            escape(&err.to_string())
        ),
    };

    let body = format!(
        r#"<div class="card">
    <p>Backend: <code>{base}</code></p>
    {status}
</div>
<div class="card">
    <ul>
        <li><a href="/dashboard/audio">Trending audio</a>: usage ranking by niche and date</li>
        <li><a href="/dashboard/patterns">Patterns</a>: mined narrative patterns, ranked by prevalence or engagement</li>
        <li><a href="/dashboard/generate">Generate</a>: script, storyboard and platform variations</li>
        <li><a href="/dashboard/ingest">Ingest</a>: pull new videos for a set of niches</li>
    </ul>
</div>
<p class="build-info">v{version} [{git}] built {built} ({profile})</p>"#,
        base = escape(api_base),
        status = status,
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        built = env!("BUILD_TIMESTAMP"),
        profile = env!("BUILD_PROFILE"),
    );

    page("Overview", Nav::Home, &body)
}
