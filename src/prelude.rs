// prelude.rs - Convenient re-exports for the Unicode API.
//
//! # Prelude
//!
//! ```
//! use ferroni_unicode::prelude::*;
//!
//! let source = MemoryTableSource::new();
//! assert!(matches!(
//!     UnicodeTables::load(&source),
//!     Err(UnicodeError::MissingTable { .. })
//! ));
//! ```

pub use crate::encodings::utf8::ONIG_ENCODING_UTF8;
pub use crate::error::{UnicodeError, UnicodeResult};
pub use crate::oniguruma::{
    OnigCaseFoldCodeItem, OnigCaseFoldType, OnigCodePoint, OnigCtype,
    INTERNAL_ONIGENC_CASE_FOLD_MULTI_CHAR, ONIGENC_CASE_FOLD_DEFAULT, ONIGENC_CASE_FOLD_MIN,
    ONIGENC_CASE_FOLD_TURKISH_AZERI,
};
pub use crate::regenc::Encoding;
pub use crate::unicode::{
    init_unicode_tables, install_unicode_tables, unicode_tables, CaseFoldCodes, CaseFoldedChar,
    DirTableSource, MemoryTableSource, TableSource, TableWriter, UnicodeEncoding, UnicodeTables,
};
