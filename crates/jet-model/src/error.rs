use thiserror::Error;

use crate::field::FieldCode;

#[derive(Debug, Error)]
pub enum JetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error("column '{column}' is already mapped to {code}")]
    ColumnAlreadyMapped { column: String, code: FieldCode },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, JetError>;
