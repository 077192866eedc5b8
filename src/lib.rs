//! # Ferroni Unicode
//!
//! Unicode case folding and character property lookup for multibyte
//! encodings, in the shape of Oniguruma's `unicode.c`.
//!
//! The Unicode data itself is not compiled in. It is loaded from a set of
//! named binary tables through a [`TableSource`](unicode::TableSource) and
//! kept immutable afterwards, so a loaded [`UnicodeTables`](unicode::UnicodeTables)
//! can be shared freely across threads.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ferroni_unicode::prelude::*;
//!
//! let source = DirTableSource::from_env().expect("FERRONI_UNICODE_TABLES is not set");
//! init_unicode_tables(&source).unwrap();
//!
//! let enc = UnicodeEncoding::utf8().unwrap();
//! let folded = enc.case_fold_str(ONIGENC_CASE_FOLD_DEFAULT, "Straße".as_bytes());
//! assert_eq!(folded, "strasse".as_bytes());
//!
//! let greek = enc.property_name_to_ctype(b"Greek").unwrap();
//! assert!(enc.is_code_ctype(0x03B1, greek).unwrap());
//! ```
//!
//! ## Module Structure
//!
//! | C File | Rust Module | Purpose |
//! |--------|-------------|---------|
//! | `oniguruma.h` | [`oniguruma`] | Public types, limits and constants |
//! | `regenc.h` | [`regenc`] | Encoding trait and ctype bits |
//! | `utf8.c` | [`encodings::utf8`] | UTF-8 codec |
//! | `unicode.c` | [`unicode`] | Case fold engine and property lookup |
//! | | [`unicode::loader`] | Binary table format |
//! | | [`unicode::case_fold`] | Fold and unfold maps |
//! | | [`unicode::property`] | Ctype code ranges and name lookup |
//! | | [`unicode::tables`] | Process-wide table registry |

// Enable #[coverage(off)] attribute when running under cargo-llvm-cov on nightly.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod encodings;
pub mod error;
pub mod oniguruma;
pub mod prelude;
pub mod regenc;
pub mod unicode;
