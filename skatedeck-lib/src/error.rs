//! Error types

/// Errors that can occur while reading or mutating the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// A stored column value could not be decoded into a record field.
    #[error("bad value in column {column}: {message}")]
    Decode {
        /// The column whose value failed to decode.
        column: String,
        /// Description of the decode failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a new decode error for the given column.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}
