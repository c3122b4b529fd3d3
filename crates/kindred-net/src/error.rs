use thiserror::Error;

/// Errors produced by the remote gateway.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// No bearer credential in the session context.  The call was never
    /// issued; the session collaborator has to re-authenticate.
    #[error("No session credential available")]
    MissingCredential,

    /// The remote rejected the credential (401/403).
    #[error("Credential rejected by the server")]
    Auth,

    /// The remote refused the mutation as conflicting (409), e.g. a
    /// duplicate match edge.
    #[error("Request conflicts with remote state")]
    Conflict,

    /// Network failure or 5xx: retryable, callers fall back to cache.
    #[error("Transient remote failure: {0}")]
    Transient(String),

    /// Any other non-success status.
    #[error("Server rejected the request with status {0}")]
    Rejected(u16),

    /// The body did not decode into the expected shape.
    #[error("Malformed server response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Whether falling back to cached state is the right recovery.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Transient(_))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transient(err.to_string())
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RemoteError>;
