use nxc_core::error::CoreError;
use nxc_dav::DavError;
use nxc_dav::dav::parse::ParseError;
use thiserror::Error;

/// Client-level errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Entity is not bound to a live session")]
    Detached,

    #[error("Operation {operation:?} is provided by both {first} and {second}")]
    DuplicateOperation {
        operation: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Dav(#[from] DavError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<ParseError> for ClientError {
    fn from(err: ParseError) -> Self {
        Self::Dav(DavError::Parse(err))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
