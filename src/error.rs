// error.rs - Error type for the Unicode layer.
//
// Variants keep the Oniguruma error code they stand for, so callers that
// still speak i32 codes can convert back.

use std::io;

use thiserror::Error;

use crate::oniguruma::*;

pub type UnicodeResult<T> = Result<T, UnicodeError>;

/// Error type for table loading and property lookup.
#[derive(Debug, Error)]
pub enum UnicodeError {
    /// Unknown property name, non-ASCII name, or name longer than the
    /// configured word length.
    #[error("invalid character property name {{{}}}", String::from_utf8_lossy(.name))]
    InvalidCharPropertyName { name: Vec<u8> },
    /// A ctype index past the end of the compiled range table.
    #[error("undefined type (bug): ctype {ctype} >= {len}")]
    TypeBug { ctype: OnigCtype, len: usize },
    /// The table transport failed.
    #[error("fail to read table {table}: {source}")]
    TableIo {
        table: String,
        #[source]
        source: io::Error,
    },
    /// The table transport has no table under this name.
    #[error("table {table} not found")]
    MissingTable { table: String },
    /// The table bytes do not follow the binary layout.
    #[error("malformed table {table}: {reason}")]
    MalformedTable { table: String, reason: String },
    /// The process-wide tables were used before `init_unicode_tables`.
    #[error("unicode tables are not initialized")]
    NotInitialized,
}

impl UnicodeError {
    pub(crate) fn malformed(table: &str, reason: impl Into<String>) -> Self {
        UnicodeError::MalformedTable {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the matching Oniguruma error code.
    pub fn code(&self) -> i32 {
        match self {
            UnicodeError::InvalidCharPropertyName { .. } => ONIGERR_INVALID_CHAR_PROPERTY_NAME,
            UnicodeError::TypeBug { .. } => ONIGERR_TYPE_BUG,
            UnicodeError::TableIo { .. }
            | UnicodeError::MissingTable { .. }
            | UnicodeError::MalformedTable { .. } => ONIGERR_FAIL_TO_INITIALIZE,
            UnicodeError::NotInitialized => ONIGERR_LIBRARY_IS_NOT_INITIALIZED,
        }
    }

    /// True for failures that can only come from a bad build or caller bug.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, UnicodeError::InvalidCharPropertyName { .. })
    }
}
