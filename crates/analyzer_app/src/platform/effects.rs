use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use analyzer_core::{AnalysisOutcome, AppState, Effect, Msg, RequestId, RequestKind};
use analyzer_engine::{EngineEvent, EngineHandle, StateFile, TransportOutcome};
use engine_logging::{engine_info, engine_warn};

use super::app::AppEvent;
use super::persistence::save_records;

type PendingRequests = Arc<Mutex<HashMap<RequestId, RequestKind>>>;

pub struct EffectRunner {
    engine: EngineHandle,
    state_file: StateFile,
    pending: PendingRequests,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, state_file: StateFile, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let runner = Self {
            engine,
            state_file,
            pending: PendingRequests::default(),
        };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>, state: &AppState) {
        for effect in effects {
            match effect {
                Effect::Analyze { request_id, url } => {
                    engine_info!("Analyze request_id={} url={}", request_id, url);
                    self.track(request_id, RequestKind::Primary);
                    self.engine.analyze(request_id, url);
                }
                Effect::Reanalyze {
                    request_id,
                    id,
                    url,
                } => {
                    engine_info!("Reanalyze request_id={} id={} url={}", request_id, id, url);
                    self.track(request_id, RequestKind::Reanalysis { target: id });
                    self.engine.analyze(request_id, url);
                }
                Effect::Cancel { request_id } => {
                    self.engine.cancel(request_id);
                }
                Effect::PersistRecords => {
                    save_records(&self.state_file, &state.records_snapshot());
                }
            }
        }
    }

    fn track(&self, request_id: RequestId, kind: RequestKind) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request_id, kind);
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        let pending = self.pending.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            let EngineEvent::Settled {
                request_id,
                outcome,
            } = event;
            if let TransportOutcome::Failure(err) = &outcome {
                engine_warn!("Request {} failed: {}", request_id, err);
            }

            let kind = pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&request_id);
            let Some(kind) = kind else {
                engine_warn!("Settlement for untracked request {}", request_id);
                continue;
            };
            let msg = settled_msg(kind, request_id, outcome.into());
            if event_tx.send(AppEvent::Msg(msg)).is_err() {
                break;
            }
        });
    }
}

/// Routes a settlement back to the message matching the request that issued it.
fn settled_msg(kind: RequestKind, request_id: RequestId, outcome: AnalysisOutcome) -> Msg {
    match kind {
        RequestKind::Primary => Msg::AnalysisSettled {
            request_id,
            outcome,
        },
        RequestKind::Reanalysis { target } => Msg::ReanalysisSettled {
            request_id,
            id: target,
            outcome,
        },
    }
}
