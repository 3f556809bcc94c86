//! Shared error type across folio crates.

use thiserror::Error;

/// Stable error codes used in logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// A credential or endpoint is missing from the environment.
    NotConfigured,
    /// An upstream provider failed (transport, status, or payload).
    Upstream,
    /// An upstream provider answered but had nothing usable.
    Empty,
    /// The counter store failed.
    Store,
    /// Invalid configuration file.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotConfigured => "NOT_CONFIGURED",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::Empty => "EMPTY",
            ClientCode::Store => "STORE",
            ClientCode::Config => "CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
    #[error("upstream {source_name} failed: {msg}")]
    Upstream { source_name: &'static str, msg: String },
    #[error("empty result from {0}")]
    EmptyResult(&'static str),
    #[error("counter store: {0}")]
    Store(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl FolioError {
    /// Shorthand for an upstream failure attributed to `source_name`.
    pub fn upstream(source_name: &'static str, msg: impl Into<String>) -> Self {
        FolioError::Upstream {
            source_name,
            msg: msg.into(),
        }
    }

    /// Map internal error to a stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            FolioError::BadRequest(_) => ClientCode::BadRequest,
            FolioError::NotConfigured(_) => ClientCode::NotConfigured,
            FolioError::Upstream { .. } => ClientCode::Upstream,
            FolioError::EmptyResult(_) => ClientCode::Empty,
            FolioError::Store(_) => ClientCode::Store,
            FolioError::Config(_) => ClientCode::Config,
            FolioError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            FolioError::Internal(_) => ClientCode::Internal,
        }
    }
}
