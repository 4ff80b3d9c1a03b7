use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid scenario target: {0}")]
    InvalidTarget(#[from] kite_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
