//! Engine errors.
//!
//! Only programmer errors surface here: an unknown shift id, a record missing its
//! identity fields, or nonsensical selection parameters. Everything else degrades
//! gracefully inside the engine (empty summaries, missing urls, thin corpora).

/// Errors raised by the shift evidence engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The caller referenced a shift id outside the closed registry.
    #[error("Unknown shift id: {0}")]
    UnknownShift(String),

    /// An article record is missing one of its identity fields (id, title, date).
    #[error("Malformed article record {id:?}: missing {field}")]
    MalformedRecord { id: String, field: &'static str },

    /// `date_iso` does not start with a `YYYY-MM-DD` calendar date.
    #[error("Article {id} has an invalid date: {value:?}")]
    InvalidDate { id: String, value: String },

    /// The caller referenced an article id the corpus does not hold.
    #[error("Unknown article id: {0}")]
    UnknownArticle(String),

    /// Two records share an id, so id order can no longer break ties.
    #[error("Duplicate article id: {0}")]
    DuplicateId(String),

    /// Selection or configuration parameters that cannot produce a packet.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
