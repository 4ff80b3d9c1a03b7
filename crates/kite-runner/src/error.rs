use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] kite_core::Error),

    #[error(transparent)]
    Synth(#[from] kite_synth::Error),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session is terminal and cannot be updated: {0}")]
    TerminalSession(String),
}

pub type Result<T> = std::result::Result<T, Error>;
