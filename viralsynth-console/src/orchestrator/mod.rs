//! Submission orchestration for the write views
//!
//! One [`Orchestrator`] per view owns that view's [`SubmissionMachine`].
//! The backend call runs on its own task, so the machine reaches a terminal
//! state even if the HTTP request that started the submission goes away.

pub mod generation;
pub mod ingest;
pub mod machine;

pub use generation::{build_payload, parse_pattern_ids};
pub use ingest::{build_ingest_payload, DEFAULT_TOP_PERCENTILE};
pub use machine::{Phase, Submission, SubmissionMachine, SubmissionSnapshot};

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use viralsynth_common::models::{GenerationRequest, GenerationResult, IngestRequest, IngestResponse};
use viralsynth_common::{Error, FetchError, Result};

use crate::client::BackendClient;

/// Backend call performed for one submission
pub type SubmitFn<Req, Resp> =
    fn(BackendClient, Req) -> BoxFuture<'static, std::result::Result<Resp, FetchError>>;

pub type GenerationOrchestrator = Orchestrator<GenerationRequest, GenerationResult>;
pub type IngestOrchestrator = Orchestrator<IngestRequest, IngestResponse>;

pub type GenerationSnapshot = SubmissionSnapshot<GenerationRequest, GenerationResult>;
pub type IngestSnapshot = SubmissionSnapshot<IngestRequest, IngestResponse>;

pub struct Orchestrator<Req, Resp> {
    view: &'static str,
    client: BackendClient,
    machine: Arc<RwLock<SubmissionMachine<Req, Resp>>>,
    call: SubmitFn<Req, Resp>,
}

impl<Req, Resp> Orchestrator<Req, Resp>
where
    Req: Clone + Send + Sync + 'static,
    Resp: Send + Sync + 'static,
{
    pub fn new(view: &'static str, client: BackendClient, call: SubmitFn<Req, Resp>) -> Self {
        Self {
            view,
            client,
            machine: Arc::new(RwLock::new(SubmissionMachine::new())),
            call,
        }
    }

    pub async fn snapshot(&self) -> SubmissionSnapshot<Req, Resp> {
        self.machine.read().await.snapshot()
    }

    /// Clear a finished outcome; rejected while submitting
    pub async fn reset(&self) -> Result<()> {
        self.machine.write().await.reset()
    }

    /// Submit `request` and wait for the outcome
    ///
    /// Returns [`Error::Busy`] without touching the network when a
    /// submission for this view is already in flight.
    pub async fn submit(&self, request: Req) -> Result<Arc<Resp>> {
        let id = match self.machine.write().await.begin(request.clone()) {
            Ok(id) => id,
            Err(e) => {
                info!(view = self.view, "Submission rejected: {}", e);
                return Err(e);
            }
        };
        info!(view = self.view, submission = %id, "Submission started");

        let view = self.view;
        let call = self.call;
        let client = self.client.clone();
        let machine = Arc::clone(&self.machine);

        let task = tokio::spawn(async move {
            let outcome = call(client, request).await;
            let mut machine = machine.write().await;

            let result: Result<Arc<Resp>> = match outcome {
                Ok(response) => {
                    let response = Arc::new(response);
                    machine.succeed(id, Arc::clone(&response))?;
                    info!(view, submission = %id, "Submission succeeded");
                    Ok(response)
                }
                Err(e) => {
                    warn!(view, submission = %id, error = %e, "Submission failed");
                    machine.fail(id, e.user_message())?;
                    Err(Error::Fetch(e))
                }
            };
            result
        });

        match task.await {
            Ok(result) => result,
            Err(join_error) => {
                error!(view, submission = %id, "Submission task aborted: {}", join_error);
                let message = format!("Submission task aborted: {}", join_error);
                if let Err(e) = self.machine.write().await.fail(id, message.clone()) {
                    warn!(view, submission = %id, "Could not mark submission failed: {}", e);
                }
                Err(Error::Internal(message))
            }
        }
    }
}

impl GenerationOrchestrator {
    pub fn generation(client: BackendClient) -> Self {
        Self::new("generate", client, |client, request| {
            async move { client.generate(&request).await }.boxed()
        })
    }

    /// Validate generate-form text and submit it
    ///
    /// Validation failures return before any state change or network call.
    pub async fn submit_form(
        &self,
        prompt: &str,
        niche: &str,
        pattern_overrides: &str,
    ) -> Result<Arc<GenerationResult>> {
        let request = build_payload(prompt, niche, pattern_overrides)?;
        self.submit(request).await
    }
}

impl IngestOrchestrator {
    pub fn ingestion(client: BackendClient) -> Self {
        Self::new("ingest", client, |client, request| {
            async move { client.ingest(&request).await }.boxed()
        })
    }

    /// Validate ingest-form text and submit it
    pub async fn submit_form(
        &self,
        niches: &str,
        top_percentile: &str,
        provider: &str,
    ) -> Result<Arc<IngestResponse>> {
        let request = build_ingest_payload(niches, top_percentile, provider)?;
        self.submit(request).await
    }
}
