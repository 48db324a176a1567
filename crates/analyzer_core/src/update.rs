use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::SubmitRequested(raw) => match state.begin_submission(&raw) {
            Some((request_id, url)) => vec![Effect::Analyze { request_id, url }],
            None => Vec::new(),
        },
        Msg::CancelSubmitClicked => match state.cancel_submission() {
            Some(request_id) => vec![Effect::Cancel { request_id }],
            None => Vec::new(),
        },
        Msg::ReanalyzeRequested { id, url } => match state.begin_reanalysis(id, &url) {
            Some((request_id, url)) => vec![Effect::Reanalyze {
                request_id,
                id,
                url,
            }],
            None => Vec::new(),
        },
        Msg::CancelReanalysisClicked { id } => match state.cancel_reanalysis(id) {
            Some(request_id) => vec![Effect::Cancel { request_id }],
            None => Vec::new(),
        },
        Msg::DeleteRequested { id } => {
            let outcome = state.delete_record(id);
            let mut effects = Vec::with_capacity(2);
            if let Some(request_id) = outcome.cancelled_request {
                effects.push(Effect::Cancel { request_id });
            }
            if outcome.removed {
                effects.push(Effect::PersistRecords);
            }
            effects
        }
        Msg::ClearError => {
            state.clear_error();
            Vec::new()
        }
        Msg::RestoreRecords(records) => {
            state.restore_records(records);
            Vec::new()
        }
        Msg::AnalysisSettled {
            request_id,
            outcome,
        } => persist_if(state.settle_submission(request_id, outcome)),
        Msg::ReanalysisSettled {
            request_id,
            id,
            outcome,
        } => persist_if(state.settle_reanalysis(request_id, id, outcome)),
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn persist_if(records_changed: bool) -> Vec<Effect> {
    if records_changed {
        vec![Effect::PersistRecords]
    } else {
        Vec::new()
    }
}
