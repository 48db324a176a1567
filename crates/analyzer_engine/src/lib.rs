//! Analyzer engine: transport to the analysis service, cancellation and
//! effect execution.
mod client;
mod engine;
mod persist;
mod transport;
mod types;
mod wire;

pub use client::{AnalysisClient, AnalysisSettings, ReqwestAnalysisClient};
pub use engine::{EngineHandle, TokenRegistry};
pub use persist::{ensure_state_dir, PersistError, StateFile};
pub use transport::run_analysis;
pub use types::{EngineError, EngineEvent, TransportError, TransportOutcome};
