//! Analyzer core: pure record store, request lifecycle state machine and
//! view-model helpers.
mod effect;
mod error;
mod msg;
mod record;
mod request;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::ControllerError;
pub use msg::Msg;
pub use record::{AnalysisRecord, InaccessibleLink, RecordId};
pub use request::{AnalysisOutcome, RequestId, RequestKind, RequestState, RequestStatus};
pub use state::AppState;
pub use store::{RecordStore, StoreSnapshot};
pub use update::update;
pub use view_model::{
    AppViewModel, HeadingCountView, InaccessibleLinkView, LinkSeverity, LinkSplitView,
    RecordDetailView, RecordRowView,
};
