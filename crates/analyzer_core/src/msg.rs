use crate::{AnalysisOutcome, AnalysisRecord, RecordId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User submitted a URL for a first-time analysis.
    SubmitRequested(String),
    /// User stopped the in-flight primary analysis.
    CancelSubmitClicked,
    /// User asked to re-run the analysis of an existing record.
    ReanalyzeRequested { id: RecordId, url: String },
    /// User stopped the in-flight re-analysis of one record.
    CancelReanalysisClicked { id: RecordId },
    /// User deleted a record.
    DeleteRequested { id: RecordId },
    /// User dismissed the global error.
    ClearError,
    /// Seed the store from persisted records.
    RestoreRecords(Vec<AnalysisRecord>),
    /// Engine settled a primary request.
    AnalysisSettled {
        request_id: RequestId,
        outcome: AnalysisOutcome,
    },
    /// Engine settled a re-analysis request.
    ReanalysisSettled {
        request_id: RequestId,
        id: RecordId,
        outcome: AnalysisOutcome,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
}
