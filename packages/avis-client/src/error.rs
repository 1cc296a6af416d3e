//! Error types for the avis client.

use thiserror::Error;

/// Result type for avis client operations.
pub type Result<T> = std::result::Result<T, AvisError>;

/// Classified outcome of a failed call to the reputation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvisError {
    /// 401 or 403 on a bearer-authenticated call. The session is no longer valid.
    #[error("Not authorized, please sign in again")]
    Unauthorized,

    /// Login rejected by the service (message shown verbatim)
    #[error("{0}")]
    Auth(String),

    /// Registration rejected by the service (message shown verbatim)
    #[error("{0}")]
    Registration(String),

    /// Any other non-2xx response on a bearer-authenticated call
    #[error("{0}")]
    Domain(String),

    /// Network failure or a response body that could not be parsed
    #[error("Network error: {0}")]
    Transport(String),
}

impl AvisError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AvisError::Unauthorized)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AvisError::Transport(_))
    }
}

impl From<reqwest::Error> for AvisError {
    fn from(err: reqwest::Error) -> Self {
        AvisError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AvisError {
    fn from(err: serde_json::Error) -> Self {
        AvisError::Transport(format!("invalid response body: {}", err))
    }
}
