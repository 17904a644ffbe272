//! HTTP handlers for the ViralSynth console

pub mod buildinfo;
pub mod dashboard;
pub mod generate;
pub mod health;

pub use buildinfo::get_build_info;
pub use dashboard::{
    audio_view, generate_submit, generate_view, index, ingest_submit, ingest_view, patterns_view,
};
pub use generate::{generate_json, generate_reset, generate_status};
pub use health::health_routes;
