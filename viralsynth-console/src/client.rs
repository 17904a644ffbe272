//! ViralSynth backend HTTP client
//!
//! Thin reqwest wrapper bound to one [`ApiBase`]. Every call is a single
//! request; failures are classified into [`FetchError`] at this boundary and
//! bodies are decoded into typed models before anything downstream sees them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use viralsynth_common::models::{
    BackendStatus, GenerationRequest, GenerationResult, IngestRequest, IngestResponse,
};
use viralsynth_common::{ApiBase, FetchError, QueryDescriptor};

/// Transport-level timeout; the console itself enforces none
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("viralsynth-console/", env!("CARGO_PKG_VERSION"));

const GENERATE_ENDPOINT: &str = "/api/generate";
const INGEST_ENDPOINT: &str = "/api/ingest";

/// Backend API client (cheap to clone, shares one connection pool)
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: ApiBase,
}

impl BackendClient {
    pub fn new(base: ApiBase) -> Result<Self, FetchError> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: ApiBase, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { http, base })
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// GET one read endpoint and decode the JSON array it returns
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        descriptor: &QueryDescriptor,
    ) -> Result<Vec<T>, FetchError> {
        let url = descriptor.url(&self.base);
        debug!(url = %url, "Fetching collection");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        decode_response(&url, response).await
    }

    /// POST a generation request
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, FetchError> {
        self.post_json(GENERATE_ENDPOINT, request).await
    }

    /// POST an ingestion request
    pub async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, FetchError> {
        self.post_json(INGEST_ENDPOINT, request).await
    }

    /// Probe the backend welcome endpoint
    pub async fn ping(&self) -> Result<BackendStatus, FetchError> {
        let url = self.base.join("/");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        decode_response(&url, response).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base.join(endpoint);
        debug!(url = %url, "POST");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        decode_response(&url, response).await
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> FetchError {
    warn!(url = %url, error = %err, "Backend unreachable");
    FetchError::Transport(err.to_string())
}

async fn decode_response<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "Backend returned failure status");
        return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(url, e))?;

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(url = %url, error = %e, "Backend response failed to decode");
        FetchError::Decode(e.to_string())
    })
}
