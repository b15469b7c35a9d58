use sapper_core::GameError;
use sapper_protocol::{ErrorBody, GameId, ProtocolError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Game {0} not found")]
    NotFound(GameId),
    #[error(transparent)]
    InvalidInput(#[from] ProtocolError),
    #[error("Stored layout is unusable: {0}")]
    Layout(#[from] GameError),
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// How a failed request should be reported to whoever sent it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Layout(_) | Self::Io(_) | Self::Serde(_) => ErrorKind::Storage,
        }
    }

    pub fn error_body(&self) -> ErrorBody {
        match self {
            Self::NotFound(_) => ErrorBody::not_found(),
            Self::InvalidInput(err) => ErrorBody::from(err),
            other => ErrorBody::new(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
