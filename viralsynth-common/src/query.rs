//! Query construction from view filter state
//!
//! Turns operator-entered filter text into a canonical [`QueryDescriptor`]
//! for one of the backend read endpoints. Everything here is pure: the same
//! filter and the same `now` always produce byte-identical params.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ApiBase;
use crate::time::lookback_date;

/// Bounds applied to the `limit` filter
pub const LIMIT_RANGE: (u32, u32) = (1, 100);

/// Bounds applied to the lookback window, in days
pub const LOOKBACK_RANGE: (u32, u32) = (1, 30);

/// Client-side sort key for the pattern view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Prevalence,
    Engagement,
}

impl SortKey {
    /// Parse a form value; anything unrecognised sorts by prevalence
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("engagement") => SortKey::Engagement,
            _ => SortKey::Prevalence,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Prevalence => "prevalence",
            SortKey::Engagement => "engagement",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend collection a view reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    TrendingAudio,
    Patterns,
}

impl Collection {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Collection::TrendingAudio => "/api/audio/trending",
            Collection::Patterns => "/api/patterns",
        }
    }

    /// Filter defaults the view starts with
    pub fn default_filter(&self) -> FilterState {
        match self {
            Collection::TrendingAudio => FilterState {
                niche: String::new(),
                limit: 10,
                lookback_days: 1,
                sort_key: SortKey::Prevalence,
            },
            Collection::Patterns => FilterState {
                niche: String::new(),
                limit: 20,
                lookback_days: 1,
                sort_key: SortKey::Prevalence,
            },
        }
    }
}

/// Operator filter state for one view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Empty means all niches
    pub niche: String,
    pub limit: u32,
    /// Inclusive of today
    pub lookback_days: u32,
    pub sort_key: SortKey,
}

impl FilterState {
    /// Coerce raw form text into a safe filter
    ///
    /// Missing fields take the collection's defaults. Present but non-numeric
    /// or zero counts become 1, and every count is clamped into range.
    pub fn from_inputs(
        collection: Collection,
        niche: Option<&str>,
        limit: Option<&str>,
        lookback_days: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        let defaults = collection.default_filter();
        Self {
            niche: niche.map(|n| n.trim().to_string()).unwrap_or(defaults.niche),
            limit: coerce_count(limit, defaults.limit, LIMIT_RANGE),
            lookback_days: coerce_count(lookback_days, defaults.lookback_days, LOOKBACK_RANGE),
            sort_key: match sort {
                Some(raw) => SortKey::parse_or_default(Some(raw)),
                None => defaults.sort_key,
            },
        }
    }
}

fn coerce_count(raw: Option<&str>, default: u32, (min, max): (u32, u32)) -> u32 {
    let value = match raw {
        None => default,
        Some(text) => match text.trim().parse::<i64>() {
            Ok(n) if n >= 1 => n.min(i64::from(u32::MAX)) as u32,
            _ => 1,
        },
    };
    value.clamp(min, max)
}

/// Canonical description of one read request
///
/// Params keep insertion order; two descriptors are equal exactly when they
/// would produce the same request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl QueryDescriptor {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
        }
    }

    /// Set a param, replacing an existing value in place
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Percent-encoded `k=v&k=v` in param order
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full request URL against `base`
    pub fn url(&self, base: &ApiBase) -> String {
        let path = base.join(&self.endpoint);
        if self.params.is_empty() {
            path
        } else {
            format!("{}?{}", path, self.query_string())
        }
    }
}

/// Build the read query for `collection` from `filter`
///
/// The sort key never enters the descriptor; re-sorting is client-side and
/// must not trigger a fetch.
pub fn build_query(collection: Collection, filter: &FilterState, now: DateTime<Utc>) -> QueryDescriptor {
    let mut descriptor = QueryDescriptor::new(collection.endpoint());
    match collection {
        Collection::TrendingAudio => {
            descriptor.set("limit", filter.limit.to_string());
            if !filter.niche.is_empty() {
                descriptor.set("niche", filter.niche.clone());
            }
            if filter.lookback_days > 0 {
                descriptor.set("date", lookback_date(now, filter.lookback_days));
            }
        }
        Collection::Patterns => {
            if !filter.niche.is_empty() {
                descriptor.set("niche", filter.niche.clone());
            }
            descriptor.set("limit", filter.limit.to_string());
        }
    }
    descriptor
}
