use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use analyzer_core::{update, AppState, Msg, RecordId};
use analyzer_engine::{ensure_state_dir, EngineHandle, StateFile};
use anyhow::Context;
use engine_logging::{engine_info, level_from_env};
use log::LevelFilter;

use super::commands::{self, Command, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::persistence::{load_records, STATE_FILENAME};
use super::render;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Line(String),
    Msg(Msg),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::initialize(config.log_destination, level_from_env(LevelFilter::Info));
    engine_info!(
        "Starting analyzer_app base_url={} state_dir={:?}",
        config.analysis.base_url,
        config.state_dir
    );

    ensure_state_dir(&config.state_dir)
        .with_context(|| format!("preparing state directory {:?}", config.state_dir))?;
    let state_file = StateFile::new(&config.state_dir, STATE_FILENAME);
    let engine =
        EngineHandle::new(config.analysis.clone()).context("starting analysis engine")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(engine, state_file.clone(), event_tx.clone());
    let mut session = AnalyzerSession::new(runner);
    session.dispatch(Msg::RestoreRecords(load_records(&state_file)));

    spawn_stdin_reader(event_tx);
    println!("URL analyzer, {} records loaded. Type 'help'.", session.state.store().len());
    prompt();

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Line(line) => match commands::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => session.execute(command),
                Ok(None) => {}
                Err(err) => println!("{err}"),
            },
            AppEvent::Msg(msg) => session.dispatch(msg),
            AppEvent::InputClosed => break,
        }
        prompt();
    }

    engine_info!("analyzer_app exiting");
    Ok(())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if event_tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Owns the controller state; the only place `update` runs.
struct AnalyzerSession {
    state: AppState,
    runner: EffectRunner,
}

impl AnalyzerSession {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects, &self.state);

        if self.state.consume_dirty() {
            for line in render::status_lines(&self.state.view()) {
                println!("{line}");
            }
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Analyze(Some(url)) => {
                self.set_url_input(url);
                self.submit();
            }
            Command::Analyze(None) => self.submit(),
            Command::Input(text) => self.set_url_input(text),
            Command::Cancel => self.cancel_submit(),
            Command::Reanalyze(id) => match self.state.store().get(id) {
                Some(record) => {
                    let url = record.source_url.clone();
                    self.reanalyze(id, url);
                }
                None => println!("no record with id {id}"),
            },
            Command::CancelReanalysis(id) => self.dispatch(Msg::CancelReanalysisClicked { id }),
            Command::Delete(id) => self.delete(id),
            Command::List => {
                for line in render::table_lines(&self.state.view()) {
                    println!("{line}");
                }
            }
            Command::Show(id) => match self.state.record_detail(id) {
                Some(detail) => {
                    for line in render::detail_lines(&detail) {
                        println!("{line}");
                    }
                }
                None => println!("analysis {id} not found"),
            },
            Command::ClearError => self.clear_error(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    fn set_url_input(&mut self, text: String) {
        self.dispatch(Msg::InputChanged(text));
    }

    fn submit(&mut self) {
        let url = self.state.url_input().to_string();
        self.dispatch(Msg::SubmitRequested(url));
    }

    fn cancel_submit(&mut self) {
        self.dispatch(Msg::CancelSubmitClicked);
    }

    fn reanalyze(&mut self, id: RecordId, url: String) {
        self.dispatch(Msg::ReanalyzeRequested { id, url });
    }

    fn delete(&mut self, id: RecordId) {
        self.dispatch(Msg::DeleteRequested { id });
    }

    fn clear_error(&mut self) {
        self.dispatch(Msg::ClearError);
    }
}
