//! # ViralSynth Common Library
//!
//! Shared, framework-free code for the ViralSynth console:
//! - Backend data model (audio rankings, patterns, generation packages)
//! - Error taxonomy for fetches and submissions
//! - Configuration loading (backend base URL resolution)
//! - Query construction from filter state
//! - Client-side ranking of fetched collections
//! - Date helpers

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod rank;
pub mod time;

pub use config::ApiBase;
pub use error::{Error, FetchError, Result};
pub use query::{build_query, Collection, FilterState, QueryDescriptor, SortKey};
pub use rank::{rank_by, rank_patterns};
