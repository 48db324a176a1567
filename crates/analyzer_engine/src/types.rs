use analyzer_core::{AnalysisOutcome, AnalysisRecord, RequestId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Emitted exactly once for every request the engine accepted.
    Settled {
        request_id: RequestId,
        outcome: TransportOutcome,
    },
}

/// Normalized result of one outbound analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    Success(AnalysisRecord),
    /// The token was cancelled before the outcome was handed back.
    Cancelled,
    Failure(TransportError),
}

impl From<TransportOutcome> for AnalysisOutcome {
    fn from(outcome: TransportOutcome) -> Self {
        match outcome {
            TransportOutcome::Success(record) => AnalysisOutcome::Success(record),
            TransportOutcome::Cancelled => AnalysisOutcome::Cancelled,
            TransportOutcome::Failure(err) => AnalysisOutcome::Failure(err.message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Non-success status; `message` is the service diagnostic or a generic
    /// substitute.
    #[error("{message}")]
    Status { code: u16, message: String },
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Most specific diagnostic available, as shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build analysis client: {0}")]
    Client(#[from] TransportError),
}
