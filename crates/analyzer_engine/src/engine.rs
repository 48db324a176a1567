use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use analyzer_core::RequestId;
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::transport::run_analysis;
use crate::{AnalysisClient, AnalysisSettings, EngineError, EngineEvent, ReqwestAnalysisClient};

enum EngineCommand {
    Analyze { request_id: RequestId, url: String },
    Cancel { request_id: RequestId },
}

/// Cancellation tokens of the requests currently in flight.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Arc<Mutex<HashMap<RequestId, CancellationToken>>>,
}

impl TokenRegistry {
    /// Issues a fresh token for `request_id`.
    pub fn issue(&self, request_id: RequestId) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().insert(request_id, token.clone()) {
            engine_warn!("Request {} reissued, cancelling previous token", request_id);
            previous.cancel();
        }
        token
    }

    /// Cancels and releases the token. Returns `false` if the request had
    /// already settled.
    pub fn cancel(&self, request_id: RequestId) -> bool {
        match self.lock().remove(&request_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn release(&self, request_id: RequestId) {
        self.lock().remove(&request_id);
    }

    pub fn cancel_all(&self) {
        for (_, token) in self.lock().drain() {
            token.cancel();
        }
    }

    pub fn active(&self) -> usize {
        self.lock().len()
    }

    pub fn is_active(&self, request_id: RequestId) -> bool {
        self.lock().contains_key(&request_id)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RequestId, CancellationToken>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to the background engine thread. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    registry: TokenRegistry,
}

impl EngineHandle {
    pub fn new(settings: AnalysisSettings) -> Result<Self, EngineError> {
        let client = ReqwestAnalysisClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn AnalysisClient>) -> Result<Self, EngineError> {
        let runtime = Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let registry = TokenRegistry::default();
        let worker_registry = registry.clone();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                handle_command(
                    &runtime,
                    client.clone(),
                    &worker_registry,
                    command,
                    event_tx.clone(),
                );
            }
            engine_debug!("Engine command channel closed, shutting down");
            worker_registry.cancel_all();
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            registry,
        })
    }

    pub fn analyze(&self, request_id: RequestId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Analyze {
            request_id,
            url: url.into(),
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.receiver().try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.receiver().recv_timeout(timeout).ok()
    }

    /// Number of requests holding a live cancellation token.
    pub fn active_requests(&self) -> usize {
        self.registry.active()
    }

    fn receiver(&self) -> MutexGuard<'_, mpsc::Receiver<EngineEvent>> {
        self.event_rx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn handle_command(
    runtime: &Runtime,
    client: Arc<dyn AnalysisClient>,
    registry: &TokenRegistry,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Analyze { request_id, url } => {
            // Issued before spawning: a Cancel queued behind this command must
            // find the token.
            let token = registry.issue(request_id);
            let registry = registry.clone();
            engine_info!("Request {} started url={}", request_id, url);
            runtime.spawn(async move {
                let outcome = run_analysis(client.as_ref(), &url, &token).await;
                registry.release(request_id);
                let _ = event_tx.send(EngineEvent::Settled {
                    request_id,
                    outcome,
                });
            });
        }
        EngineCommand::Cancel { request_id } => {
            if registry.cancel(request_id) {
                engine_info!("Request {} cancelled", request_id);
            } else {
                engine_debug!("Cancel for {} ignored, already settled", request_id);
            }
        }
    }
}
