use crate::{AnalysisRecord, RecordId};

/// Identity of one logical request, allocated by [`crate::AppState`].
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First-time analysis of a new URL.
    Primary,
    /// Refresh of an existing record.
    Reanalysis { target: RecordId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    InFlight,
    Cancelled,
    Succeeded,
    Failed,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestStatus::Cancelled | RequestStatus::Succeeded | RequestStatus::Failed
        )
    }
}

/// Settled result of a request as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success(AnalysisRecord),
    Cancelled,
    Failure(String),
}

impl AnalysisOutcome {
    fn status(&self) -> RequestStatus {
        match self {
            AnalysisOutcome::Success(_) => RequestStatus::Succeeded,
            AnalysisOutcome::Cancelled => RequestStatus::Cancelled,
            AnalysisOutcome::Failure(_) => RequestStatus::Failed,
        }
    }
}

/// Lifecycle of a single primary or re-analysis request.
///
/// Moves `Idle -> InFlight -> {Cancelled | Succeeded | Failed}` exactly once;
/// transitions from any other status are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    request_id: RequestId,
    kind: RequestKind,
    status: RequestStatus,
}

impl RequestState {
    pub fn new(request_id: RequestId, kind: RequestKind) -> Self {
        Self {
            request_id,
            kind,
            status: RequestStatus::Idle,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn target(&self) -> Option<RecordId> {
        match self.kind {
            RequestKind::Primary => None,
            RequestKind::Reanalysis { target } => Some(target),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == RequestStatus::InFlight
    }

    pub(crate) fn begin(&mut self) {
        if self.status == RequestStatus::Idle {
            self.status = RequestStatus::InFlight;
        }
    }

    pub(crate) fn settle(&mut self, outcome: &AnalysisOutcome) -> RequestStatus {
        self.finish(outcome.status())
    }

    pub(crate) fn cancel(&mut self) -> RequestStatus {
        self.finish(RequestStatus::Cancelled)
    }

    fn finish(&mut self, terminal: RequestStatus) -> RequestStatus {
        if self.status == RequestStatus::InFlight {
            self.status = terminal;
        }
        self.status
    }
}
