use thiserror::Error;

/// User-visible failures recorded by the controller.
///
/// Cancellation is never represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),
    /// Remote or network failure while analyzing.
    #[error("Analysis failed: {0}")]
    Transport(String),
}

impl ControllerError {
    pub(crate) fn empty_url() -> Self {
        ControllerError::Validation("URL cannot be empty.".to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ControllerError::Validation(_))
    }
}
