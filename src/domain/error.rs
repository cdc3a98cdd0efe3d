// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Could not decode DocBase response: {0}")]
    RemoteDecode(String),
    #[error("Document is locked by another operation: {0}")]
    Locked(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn parse(message: impl Into<String>) -> Self {
        SyncError::Parse(message.into())
    }

    /// Short label used in user notifications
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Config(_) => "config",
            SyncError::Parse(_) => "parse",
            SyncError::Network(_) => "network",
            SyncError::RemoteDecode(_) => "decode",
            SyncError::Locked(_) => "locked",
            SyncError::Io(_) => "io",
        }
    }
}
