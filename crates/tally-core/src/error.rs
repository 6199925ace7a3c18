//! Error types for Tally

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Incomplete extraction: {0}")]
    IncompleteExtraction(String),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether this failure happened before a usable model reply was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
