use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid book id: {0:?}")]
    InvalidBookId(String),

    #[error("book id must be positive")]
    ZeroBookId,

    #[error("not a book key: {0:?}")]
    NotABookKey(String),
}
