use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrellisError>;

#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card {card} is not in list {list}")]
    CardNotInList { card: String, list: String },

    #[error("Index {index} out of bounds for list {list} (len {len})")]
    IndexOutOfBounds {
        list: String,
        index: usize,
        len: usize,
    },

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TrellisError {
    /// True for errors caused by a command naming an id or index the
    /// current state does not have.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound(_)
                | Self::ListNotFound(_)
                | Self::CardNotFound(_)
                | Self::CardNotInList { .. }
                | Self::IndexOutOfBounds { .. }
                | Self::DuplicateId(_)
        )
    }
}
