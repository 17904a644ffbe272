//! Server-rendered HTML for the console views
//!
//! Every function here is pure: state in, markup out. Any value that came
//! from the operator or the backend goes through [`escape`] before it is
//! interpolated.

pub mod audio;
pub mod generate;
pub mod index;
pub mod ingest;
pub mod patterns;

use std::borrow::Cow;
use viralsynth_common::FetchError;

/// Dashboard sections, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Home,
    Audio,
    Patterns,
    Generate,
    Ingest,
}

impl Nav {
    const ALL: [Nav; 5] = [Nav::Home, Nav::Audio, Nav::Patterns, Nav::Generate, Nav::Ingest];

    fn href(&self) -> &'static str {
        match self {
            Nav::Home => "/",
            Nav::Audio => "/dashboard/audio",
            Nav::Patterns => "/dashboard/patterns",
            Nav::Generate => "/dashboard/generate",
            Nav::Ingest => "/dashboard/ingest",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Nav::Home => "Overview",
            Nav::Audio => "Trending Audio",
            Nav::Patterns => "Patterns",
            Nav::Generate => "Generate",
            Nav::Ingest => "Ingest",
        }
    }
}

/// HTML-escape text for element content and double-quoted attributes
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Wrap a view body in the shared page shell
pub fn page(title: &str, active: Nav, body: &str) -> String {
    let nav: String = Nav::ALL
        .iter()
        .map(|item| {
            let class = if *item == active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, item.href(), class, item.label())
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - ViralSynth</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            margin: 0;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 16px 20px;
        }}
        header h1 {{
            font-size: 22px;
            margin: 0 0 8px 0;
            color: #4a9eff;
        }}
        nav a {{
            color: #bbb;
            margin-right: 16px;
            text-decoration: none;
        }}
        nav a.active {{
            color: #4a9eff;
            font-weight: 600;
        }}
        main {{
            padding: 20px;
        }}
        table {{
            border-collapse: collapse;
            width: 100%;
        }}
        th, td {{
            border-bottom: 1px solid #3a3a3a;
            padding: 6px 10px;
            text-align: left;
        }}
        .card {{
            background: #2a2a2a;
            border-radius: 6px;
            padding: 12px 16px;
            margin-bottom: 12px;
        }}
        .notice {{
            padding: 10px 14px;
            border-radius: 4px;
            margin: 12px 0;
        }}
        .error {{
            background: #4a1f1f;
            color: #ffb4b4;
        }}
        .loading {{
            background: #3a3320;
            color: #f5d58a;
        }}
        .empty {{
            color: #888;
        }}
        form label {{
            display: block;
            margin-top: 8px;
        }}
        input, textarea, select {{
            background: #111;
            color: #e0e0e0;
            border: 1px solid #3a3a3a;
            padding: 6px;
        }}
        button {{
            margin-top: 12px;
            padding: 8px 18px;
            background: #4a9eff;
            color: #fff;
            border: none;
            border-radius: 4px;
        }}
        button:disabled {{
            background: #555;
        }}
        a {{
            color: #4a9eff;
        }}
    </style>
</head>
<body>
    <header>
        <h1>ViralSynth Console</h1>
        <nav>
            {nav}
        </nav>
    </header>
    <main>
        <h2>{title}</h2>
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav,
        body = body,
    )
}

/// Placeholder while a fetch for this view is still outstanding
pub fn loading_block(reload_href: &str) -> String {
    format!(
        r#"<div class="notice loading">Loading&hellip; <a href="{}">Reload</a></div>"#,
        escape(reload_href)
    )
}

/// Failure notice with a retry link
pub fn fetch_error_block(err: &FetchError, retry_href: &str) -> String {
    format!(
        r#"<div class="notice error">{} <a href="{}">Retry</a></div>"#,
        escape(&err.to_string()),
        escape(retry_href)
    )
}

/// Inline message block (validation, busy, submission failure)
pub fn error_notice(message: &str) -> String {
    format!(r#"<div class="notice error">{}</div>"#, escape(message))
}

pub fn empty_notice(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, escape(message))
}

/// Build a dashboard href with percent-encoded query params
pub fn href_with(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

/// Only http(s) URLs become links
pub(crate) fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
