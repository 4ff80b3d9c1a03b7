use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Session is not completed: {0}")]
    SessionNotCompleted(String),
}

pub type Result<T> = std::result::Result<T, Error>;
