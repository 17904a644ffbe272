//! Integration tests for the generation and ingestion orchestrators

mod helpers;

use helpers::{unreachable_client, StubBackend};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use viralsynth_common::{Error, FetchError};
use viralsynth_console::orchestrator::{GenerationOrchestrator, IngestOrchestrator, Phase};

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_successful_generation_stores_result() {
    let stub = StubBackend::start().await;
    let orchestrator = GenerationOrchestrator::generation(stub.client());

    let result = orchestrator.submit_form("Explain RAG", "tech", "12, abc, 7").await.unwrap();
    assert_eq!(result.script, "Script for Explain RAG");
    assert_eq!(result.package_id, Some(1));

    assert_eq!(
        stub.record.last_body(),
        Some(json!({"prompt": "Explain RAG", "niche": "tech", "pattern_ids": [12, 7]}))
    );

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Succeeded);
    assert_eq!(snapshot.result.unwrap().script, "Script for Explain RAG");
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_optional_fields_are_omitted_from_payload() {
    let stub = StubBackend::start().await;
    let orchestrator = GenerationOrchestrator::generation(stub.client());

    orchestrator.submit_form("Explain RAG", "  ", "x, ,").await.unwrap();
    assert_eq!(stub.record.last_body(), Some(json!({"prompt": "Explain RAG"})));
}

#[tokio::test]
async fn test_http_500_fails_without_result() {
    let stub = StubBackend::start().await;
    let orchestrator = GenerationOrchestrator::generation(stub.client());

    let outcome = orchestrator.submit_form("fail", "", "").await;
    assert!(matches!(outcome, Err(Error::Fetch(FetchError::Status(500)))));

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Failed);
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.error.as_deref(), Some("Request failed with status 500"));
}

#[tokio::test]
async fn test_failure_clears_previous_result() {
    let stub = StubBackend::start().await;
    let orchestrator = GenerationOrchestrator::generation(stub.client());

    orchestrator.submit_form("first", "", "").await.unwrap();
    orchestrator.submit_form("fail", "", "").await.unwrap_err();

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Failed);
    assert!(snapshot.result.is_none());
}

#[tokio::test]
async fn test_transport_failure_surfaces_raw_message() {
    let orchestrator = GenerationOrchestrator::generation(unreachable_client());

    let outcome = orchestrator.submit_form("Explain RAG", "", "").await;
    let message = match outcome {
        Err(Error::Fetch(FetchError::Transport(message))) => message,
        other => panic!("expected transport failure, got {:?}", other.map(|_| ())),
    };

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.error, Some(message));
}

#[tokio::test]
async fn test_empty_prompt_sends_nothing() {
    let stub = StubBackend::start().await;
    let orchestrator = GenerationOrchestrator::generation(stub.client());

    let outcome = orchestrator.submit_form("   ", "tech", "1").await;
    assert!(matches!(outcome, Err(Error::Validation(_))));
    assert_eq!(stub.record.generate(), 0);
    assert_eq!(orchestrator.snapshot().await.phase, Phase::Idle);
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_rejected() {
    let stub = StubBackend::start().await;
    let orchestrator = Arc::new(GenerationOrchestrator::generation(stub.client()));

    let first = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit_form("slow one", "", "").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(orchestrator.snapshot().await.is_submitting());
    let second = orchestrator.submit_form("two", "", "").await;
    assert!(matches!(second, Err(Error::Busy(_))));
    assert!(orchestrator.reset().await.is_err());

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.script, "Script for slow one");
    assert_eq!(stub.record.generate(), 1);

    // Free again once the first submission finished
    orchestrator.submit_form("two", "", "").await.unwrap();
    assert_eq!(stub.record.generate(), 2);
}

#[tokio::test]
async fn test_previous_result_stays_visible_while_resubmitting() {
    let stub = StubBackend::start().await;
    let orchestrator = Arc::new(GenerationOrchestrator::generation(stub.client()));

    orchestrator.submit_form("first", "", "").await.unwrap();

    let pending = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit_form("slow second", "", "").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mid_flight = orchestrator.snapshot().await;
    assert_eq!(mid_flight.phase, Phase::Submitting);
    assert_eq!(mid_flight.result.unwrap().script, "Script for first");

    pending.await.unwrap().unwrap();
    let done = orchestrator.snapshot().await;
    assert_eq!(done.phase, Phase::Succeeded);
    assert_eq!(done.result.unwrap().script, "Script for slow second");
}

#[tokio::test]
async fn test_submission_completes_after_caller_goes_away() {
    let stub = StubBackend::start().await;
    let orchestrator = Arc::new(GenerationOrchestrator::generation(stub.client()));

    let caller = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit_form("slow abandoned", "", "").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    caller.abort();

    tokio::time::sleep(helpers::SLOW_DELAY * 2).await;
    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Succeeded);
    assert_eq!(snapshot.result.unwrap().script, "Script for slow abandoned");
}

#[tokio::test]
async fn test_reset_after_outcome_returns_to_idle() {
    let stub = StubBackend::start().await;
    let orchestrator = GenerationOrchestrator::generation(stub.client());

    orchestrator.submit_form("fail", "", "").await.unwrap_err();
    orchestrator.reset().await.unwrap();

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.error.is_none());
    assert!(snapshot.request.is_none());
    assert!(snapshot.started_at.is_none());
}

// =============================================================================
// Ingestion
// =============================================================================

#[tokio::test]
async fn test_ingest_submission() {
    let stub = StubBackend::start().await;
    let orchestrator = IngestOrchestrator::ingestion(stub.client());

    let outcome = orchestrator.submit_form("tech, fitness", "", "apify").await.unwrap();
    assert_eq!(outcome.message, "Ingestion complete");
    assert_eq!(outcome.video_ids, vec![1, 2]);
    assert_eq!(outcome.pattern_ids, vec![5]);

    assert_eq!(
        stub.record.last_body(),
        Some(json!({"niches": ["tech", "fitness"], "top_percentile": 0.05, "provider": "apify"}))
    );
    assert_eq!(orchestrator.snapshot().await.phase, Phase::Succeeded);
}

#[tokio::test]
async fn test_ingest_validation_sends_nothing() {
    let stub = StubBackend::start().await;
    let orchestrator = IngestOrchestrator::ingestion(stub.client());

    assert!(matches!(
        orchestrator.submit_form(" , ", "", "").await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        orchestrator.submit_form("tech", "2", "").await,
        Err(Error::Validation(_))
    ));
    assert_eq!(stub.record.ingest(), 0);
}
