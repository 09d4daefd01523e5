use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Storage backend failed: {0}")]
    Storage(String),
    #[error("Document update failed: {0}")]
    Document(String),
    #[error("Storage callback was dropped before it fired")]
    Cancelled,
}

pub type Result<T> = core::result::Result<T, Error>;
