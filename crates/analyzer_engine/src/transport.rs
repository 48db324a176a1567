use engine_logging::engine_debug;
use tokio_util::sync::CancellationToken;

use crate::{AnalysisClient, TransportOutcome};

/// Runs one analysis call against `token`.
///
/// A token cancelled at any point before this returns yields
/// [`TransportOutcome::Cancelled`], even when the response was already in.
pub async fn run_analysis(
    client: &dyn AnalysisClient,
    url: &str,
    token: &CancellationToken,
) -> TransportOutcome {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return TransportOutcome::Cancelled,
        result = client.analyze(url) => result,
    };

    if token.is_cancelled() {
        engine_debug!("Dropping response for {} after cancellation", url);
        return TransportOutcome::Cancelled;
    }
    match result {
        Ok(record) => TransportOutcome::Success(record),
        Err(err) => TransportOutcome::Failure(err),
    }
}
