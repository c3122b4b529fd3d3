use thiserror::Error;

use kindred_net::RemoteError;
use kindred_store::StoreError;

/// Errors surfaced by the engagement engine.
///
/// Read paths mostly degrade to cached state instead of returning these;
/// mutation paths always revert their optimistic change before erroring.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The operation was never issued (e.g. an empty message body).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl EngineError {
    /// Auth failures are not recoverable here; the session collaborator
    /// owns re-authentication.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            EngineError::Remote(RemoteError::Auth)
                | EngineError::Remote(RemoteError::MissingCredential)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
