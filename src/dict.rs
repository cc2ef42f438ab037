//! Data dictionary core: records, column inference, tree aggregation, the
//! hyperlink cell format, search and persistence of collections.

pub mod aggregate;
pub mod export;
pub mod hyperlink;
pub mod record;
pub mod repository;
pub mod schema;
pub mod search;
pub mod suggest;

pub use aggregate::{build_tree, AggregateConfig, AggregationLevel, GroupKey, NodeKind, TreeNode};
pub use hyperlink::{is_hyperlink_format, parse_hyperlink, searchable_text, Hyperlink};
pub use record::{FieldValue, Record, CREATE_TIME_FIELD, ID_FIELD};
pub use repository::{Collections, DictRepository};
pub use schema::{infer_columns, ColumnKind, ColumnSpec};
pub use search::{filter_records, SearchQuery};

use thiserror::Error;

/// Errors raised by dictionary operations.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("malformed JSON: {0}")]
    InvalidJson(String),
    #[error("data must be a JSON array")]
    NotAnArray,
    #[error("entry {0} is not a JSON object")]
    NotAnObject(usize),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("collection \"{0}\" already exists")]
    DuplicateCollection(String),
    #[error("collection \"{0}\" not found")]
    UnknownCollection(String),
    #[error("record \"{0}\" not found")]
    UnknownRecord(String),
    #[error("collection name \"{0}\" must not contain path separators or be . or ..")]
    InvalidName(String),
    #[error("header list is empty")]
    EmptyHeaders,
    #[error("expected the format keyword:search text")]
    WrongFormat,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DictError {
    /// Validation failures are reported to the user and leave state untouched.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DictError::Io(_) | DictError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, DictError>;
