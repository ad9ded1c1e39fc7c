use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The backend could not be reached or refused the credential while a
    /// session was being established.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A request failed at the transport level after a session exists.
    #[error("Backend error: {0}")]
    BackendError(String),

    /// The backend answered, but not in the expected shape.
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Invalid analysis mode")]
    InvalidMode,

    #[error("Invalid image")]
    InvalidImage,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
