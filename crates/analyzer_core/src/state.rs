use std::collections::BTreeMap;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::view_model::{build_detail, build_row};
use crate::{
    AnalysisOutcome, AnalysisRecord, AppViewModel, ControllerError, RecordDetailView, RecordId,
    RecordStore, RequestId, RequestKind, RequestState, StoreSnapshot,
};

/// Complete controller state: the record store, the url input, and the
/// lifecycle of every request currently in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    store: RecordStore,
    url_input: String,
    primary: Option<RequestState>,
    reanalyses: BTreeMap<RecordId, RequestState>,
    last_error: Option<ControllerError>,
    record_errors: BTreeMap<RecordId, ControllerError>,
    next_request_id: RequestId,
    dirty: bool,
}

/// What a delete touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeleteOutcome {
    pub removed: bool,
    pub cancelled_request: Option<RequestId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let submitting = self.is_submitting();
        AppViewModel {
            records: self
                .store
                .records()
                .iter()
                .map(|record| build_row(record, &self.store, self.record_errors.get(&record.id)))
                .collect(),
            record_count: self.store.len(),
            submitting,
            can_submit: !submitting && !self.url_input.trim().is_empty(),
            reanalyzing_ids: self.store.reanalyzing_ids().collect(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            url_input: self.url_input.clone(),
            dirty: self.dirty,
        }
    }

    /// Detail view for one record, `None` when the id is unknown.
    pub fn record_detail(&self, id: RecordId) -> Option<RecordDetailView> {
        self.store
            .get(id)
            .map(|record| build_detail(record, &self.store, self.record_errors.get(&id)))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// The part of the state that survives restarts.
    pub fn records_snapshot(&self) -> Vec<AnalysisRecord> {
        self.store.records().to_vec()
    }

    pub fn is_submitting(&self) -> bool {
        self.primary.is_some()
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn last_error(&self) -> Option<&ControllerError> {
        self.last_error.as_ref()
    }

    pub fn record_error(&self, id: RecordId) -> Option<&ControllerError> {
        self.record_errors.get(&id)
    }

    pub fn primary_request(&self) -> Option<&RequestState> {
        self.primary.as_ref()
    }

    pub fn reanalysis_request(&self, id: RecordId) -> Option<&RequestState> {
        self.reanalyses.get(&id)
    }

    /// Returns whether anything changed since the previous call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        if self.url_input != text {
            self.url_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn restore_records(&mut self, records: Vec<AnalysisRecord>) {
        if !self.store.is_empty() {
            engine_warn!(
                "Ignoring restore of {} records, store already holds {}",
                records.len(),
                self.store.len()
            );
            return;
        }
        self.store = RecordStore::from_records(records);
        engine_info!("Restored {} records", self.store.len());
        self.mark_dirty();
    }

    /// Starts a primary request. Returns the request id and the trimmed url
    /// to send, or `None` when nothing should go out.
    pub(crate) fn begin_submission(&mut self, raw_url: &str) -> Option<(RequestId, String)> {
        let url = raw_url.trim();
        if url.is_empty() {
            self.last_error = Some(ControllerError::empty_url());
            self.mark_dirty();
            return None;
        }
        if let Some(active) = &self.primary {
            engine_warn!(
                "Submit ignored, request {} still in flight",
                active.request_id()
            );
            return None;
        }

        let request_id = self.allocate_request_id();
        let mut request = RequestState::new(request_id, RequestKind::Primary);
        request.begin();
        self.primary = Some(request);
        self.last_error = None;
        self.mark_dirty();
        Some((request_id, url.to_string()))
    }

    pub(crate) fn cancel_submission(&mut self) -> Option<RequestId> {
        let mut request = self.primary.take()?;
        let status = request.cancel();
        engine_debug!("Primary request {} -> {:?}", request.request_id(), status);
        self.mark_dirty();
        Some(request.request_id())
    }

    /// Applies a primary settlement. Returns whether the record collection
    /// changed.
    pub(crate) fn settle_submission(
        &mut self,
        request_id: RequestId,
        outcome: AnalysisOutcome,
    ) -> bool {
        let Some(mut request) = self
            .primary
            .take_if(|active| active.request_id() == request_id)
        else {
            engine_debug!("Discarding stale primary settlement {}", request_id);
            return false;
        };
        let status = request.settle(&outcome);
        engine_debug!("Primary request {} -> {:?}", request_id, status);
        self.mark_dirty();

        match outcome {
            AnalysisOutcome::Success(record) => {
                engine_info!("Analysis {} stored as record {}", request_id, record.id);
                self.store.add_record(record);
                self.url_input.clear();
                true
            }
            AnalysisOutcome::Cancelled => false,
            AnalysisOutcome::Failure(message) => {
                self.last_error = Some(ControllerError::Transport(message));
                false
            }
        }
    }

    pub(crate) fn begin_reanalysis(
        &mut self,
        id: RecordId,
        raw_url: &str,
    ) -> Option<(RequestId, String)> {
        if !self.store.contains(id) {
            engine_warn!("Re-analysis ignored, record {} not found", id);
            return None;
        }
        if self.store.is_reanalyzing(id) {
            engine_debug!("Re-analysis ignored, record {} already in flight", id);
            return None;
        }
        let url = raw_url.trim();
        if url.is_empty() {
            self.record_errors.insert(id, ControllerError::empty_url());
            self.mark_dirty();
            return None;
        }

        let request_id = self.allocate_request_id();
        let mut request = RequestState::new(request_id, RequestKind::Reanalysis { target: id });
        request.begin();
        self.reanalyses.insert(id, request);
        self.store.set_reanalyzing(id, true);
        self.record_errors.remove(&id);
        self.mark_dirty();
        Some((request_id, url.to_string()))
    }

    pub(crate) fn cancel_reanalysis(&mut self, id: RecordId) -> Option<RequestId> {
        let mut request = self.reanalyses.remove(&id)?;
        let status = request.cancel();
        engine_debug!("Re-analysis {} of {} -> {:?}", request.request_id(), id, status);
        self.store.set_reanalyzing(id, false);
        self.mark_dirty();
        Some(request.request_id())
    }

    /// Applies a re-analysis settlement. Returns whether the record
    /// collection changed.
    pub(crate) fn settle_reanalysis(
        &mut self,
        request_id: RequestId,
        id: RecordId,
        outcome: AnalysisOutcome,
    ) -> bool {
        let is_current = self
            .reanalyses
            .get(&id)
            .is_some_and(|active| active.request_id() == request_id);
        if !is_current {
            engine_debug!("Discarding stale re-analysis settlement {} for {}", request_id, id);
            return false;
        }
        let Some(mut request) = self.reanalyses.remove(&id) else {
            return false;
        };
        let status = request.settle(&outcome);
        engine_debug!("Re-analysis {} of {} -> {:?}", request_id, id, status);
        self.store.set_reanalyzing(id, false);
        self.mark_dirty();

        match outcome {
            AnalysisOutcome::Success(mut record) => {
                // The service may hand out a new id; the grid keeps the old one.
                record.id = id;
                self.store.replace_record(id, record)
            }
            AnalysisOutcome::Cancelled => false,
            AnalysisOutcome::Failure(message) => {
                if self.store.contains(id) {
                    self.record_errors
                        .insert(id, ControllerError::Transport(message));
                }
                false
            }
        }
    }

    pub(crate) fn delete_record(&mut self, id: RecordId) -> DeleteOutcome {
        let cancelled_request = self.cancel_reanalysis(id);
        let removed = self.store.remove_record(id);
        if self.record_errors.remove(&id).is_some() || removed {
            self.mark_dirty();
        }
        DeleteOutcome {
            removed,
            cancelled_request,
        }
    }

    fn allocate_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
