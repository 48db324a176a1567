use crate::{RecordId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Analyze {
        request_id: RequestId,
        url: String,
    },
    Reanalyze {
        request_id: RequestId,
        id: RecordId,
        url: String,
    },
    Cancel {
        request_id: RequestId,
    },
    /// The record collection changed and should be written out.
    PersistRecords,
}

impl Effect {
    /// Whether this effect starts a network call.
    pub fn is_transport_call(&self) -> bool {
        matches!(self, Effect::Analyze { .. } | Effect::Reanalyze { .. })
    }
}
