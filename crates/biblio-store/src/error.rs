/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not reach the store.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store rejected or failed a command.
    #[error("command {command} failed on {key}: {reason}")]
    Command {
        command: &'static str,
        key: String,
        reason: String,
    },

    /// The key holds a value of a different type than the command expects.
    #[error("wrong type for key {key}: expected {expected}")]
    WrongType { key: String, expected: &'static str },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
