use analyzer_core::{AnalysisOutcome, AnalysisRecord};
use analyzer_engine::{run_analysis, AnalysisClient, TransportError, TransportOutcome};
use tokio_util::sync::CancellationToken;

/// Answers immediately, optionally tripping the token right before it does.
struct InstantClient {
    result: Result<AnalysisRecord, TransportError>,
    cancel_on_answer: Option<CancellationToken>,
}

#[async_trait::async_trait]
impl AnalysisClient for InstantClient {
    async fn analyze(&self, _url: &str) -> Result<AnalysisRecord, TransportError> {
        if let Some(token) = &self.cancel_on_answer {
            token.cancel();
        }
        self.result.clone()
    }
}

fn ok_client() -> InstantClient {
    InstantClient {
        result: Ok(AnalysisRecord::new(1, "https://a.test")),
        cancel_on_answer: None,
    }
}

#[tokio::test]
async fn success_passes_record_through() {
    let outcome = run_analysis(&ok_client(), "https://a.test", &CancellationToken::new()).await;
    assert_eq!(
        outcome,
        TransportOutcome::Success(AnalysisRecord::new(1, "https://a.test"))
    );
}

#[tokio::test]
async fn failure_is_normalized_with_message() {
    let client = InstantClient {
        result: Err(TransportError::Network("connection refused".into())),
        cancel_on_answer: None,
    };
    let outcome = run_analysis(&client, "https://a.test", &CancellationToken::new()).await;
    assert_eq!(
        AnalysisOutcome::from(outcome),
        AnalysisOutcome::Failure("connection refused".into())
    );
}

#[tokio::test]
async fn token_cancelled_before_call_never_succeeds() {
    let token = CancellationToken::new();
    token.cancel();
    let outcome = run_analysis(&ok_client(), "https://a.test", &token).await;
    assert_eq!(outcome, TransportOutcome::Cancelled);
}

#[tokio::test]
async fn buffered_response_after_cancel_is_dropped() {
    let token = CancellationToken::new();
    let client = InstantClient {
        result: Ok(AnalysisRecord::new(1, "https://a.test")),
        cancel_on_answer: Some(token.clone()),
    };
    let outcome = run_analysis(&client, "https://a.test", &token).await;
    assert_eq!(outcome, TransportOutcome::Cancelled);
}

#[tokio::test]
async fn cancelled_failure_is_not_reported_as_error() {
    let token = CancellationToken::new();
    let client = InstantClient {
        result: Err(TransportError::Network("socket closed".into())),
        cancel_on_answer: Some(token.clone()),
    };
    let outcome = run_analysis(&client, "https://a.test", &token).await;
    assert_eq!(AnalysisOutcome::from(outcome), AnalysisOutcome::Cancelled);
}
