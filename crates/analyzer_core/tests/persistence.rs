use analyzer_core::{update, AnalysisOutcome, AnalysisRecord, AppState, Effect, Msg};

fn init_logging() {
    engine_logging::initialize_for_tests();
}

#[test]
fn records_can_be_restored_after_restart() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SubmitRequested("https://a.test".into()));
    let request_id = match effects.as_slice() {
        [Effect::Analyze { request_id, .. }] => *request_id,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::AnalysisSettled {
            request_id,
            outcome: AnalysisOutcome::Success(AnalysisRecord::new(3, "https://a.test")),
        },
    );
    assert_eq!(effects, vec![Effect::PersistRecords]);

    let snapshot = state.records_snapshot();
    assert_eq!(snapshot.len(), 1);

    let (restored, _) = update(AppState::new(), Msg::RestoreRecords(snapshot));
    let view = restored.view();
    assert_eq!(view.record_count, 1);
    assert_eq!(view.records[0].id, 3);
    assert_eq!(view.records[0].url, "https://a.test");
    assert!(!view.submitting);
    assert!(view.reanalyzing_ids.is_empty());
    assert!(view.last_error.is_none());
}

#[test]
fn in_flight_state_is_not_part_of_persisted_snapshot() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::RestoreRecords(vec![AnalysisRecord::new(1, "https://a.test")]),
    );
    let (state, _) = update(
        state,
        Msg::ReanalyzeRequested {
            id: 1,
            url: "https://a.test".into(),
        },
    );
    let (state, _) = update(state, Msg::SubmitRequested("".into()));
    assert!(state.store().is_reanalyzing(1));
    assert!(state.last_error().is_some());

    let (restored, _) = update(AppState::new(), Msg::RestoreRecords(state.records_snapshot()));
    assert!(!restored.store().is_reanalyzing(1));
    assert!(restored.last_error().is_none());
    assert_eq!(restored.store().len(), 1);
}

#[test]
fn restore_is_ignored_once_store_has_records() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::RestoreRecords(vec![AnalysisRecord::new(1, "https://a.test")]),
    );
    let (state, effects) = update(
        state,
        Msg::RestoreRecords(vec![AnalysisRecord::new(2, "https://b.test")]),
    );
    assert!(effects.is_empty());
    assert_eq!(state.store().len(), 1);
    assert!(state.store().contains(1));
}

#[test]
fn delete_requests_persistence() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::RestoreRecords(vec![
            AnalysisRecord::new(2, "https://b.test"),
            AnalysisRecord::new(1, "https://a.test"),
        ]),
    );
    let (state, effects) = update(state, Msg::DeleteRequested { id: 2 });
    assert_eq!(effects, vec![Effect::PersistRecords]);
    assert_eq!(state.records_snapshot(), vec![AnalysisRecord::new(1, "https://a.test")]);
}
