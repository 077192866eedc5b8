// unicode/tables.rs - Process-wide Unicode table registry
//
// `UnicodeTables` owns every loaded table. It can be built and passed around
// explicitly, or installed once as the process-wide instance with
// `init_unicode_tables` and fetched with `unicode_tables`.

use once_cell::sync::OnceCell;
use smallvec::SmallVec;

use super::case_fold::CaseFoldTables;
use super::loader::TableSource;
use super::property::{PropertyDef, PropertyTable, DEFAULT_PROPERTIES};
use crate::error::{UnicodeError, UnicodeResult};
use crate::oniguruma::*;

static UNICODE_TABLES: OnceCell<UnicodeTables> = OnceCell::new();

/// Immutable property and case fold tables.
pub struct UnicodeTables {
    properties: PropertyTable,
    case_folds: CaseFoldTables,
}

impl UnicodeTables {
    /// Loads the standard ctypes, the default property set and the case
    /// fold tables.
    pub fn load(source: &dyn TableSource) -> UnicodeResult<Self> {
        Self::load_with(source, DEFAULT_PROPERTIES)
    }

    /// Loads the standard ctypes followed by `properties`.
    pub fn load_with(source: &dyn TableSource, properties: &[PropertyDef]) -> UnicodeResult<Self> {
        let result = PropertyTable::load(source, properties).and_then(|properties| {
            let case_folds = CaseFoldTables::load(source)?;
            Ok(UnicodeTables {
                properties,
                case_folds,
            })
        });
        match &result {
            Ok(tables) => tracing::info!(
                properties = tables.properties.len(),
                fold = tables.case_folds.fold_len(),
                unfold1 = tables.case_folds.unfold1_len(),
                unfold2 = tables.case_folds.unfold2_len(),
                unfold3 = tables.case_folds.unfold3_len(),
                "unicode tables loaded"
            ),
            Err(e) => tracing::error!(error = %e, "failed to load unicode tables"),
        }
        result
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn case_folds(&self) -> &CaseFoldTables {
        &self.case_folds
    }

    /// Special casing records, reserved for case mapping callers.
    pub fn case_mapping_specials(&self) -> &[SmallVec<[OnigCodePoint; 4]>] {
        self.case_folds.specials()
    }
}

/// Loads and installs the process-wide tables. Later calls return the
/// instance installed first without touching `source`.
pub fn init_unicode_tables(source: &dyn TableSource) -> UnicodeResult<&'static UnicodeTables> {
    UNICODE_TABLES.get_or_try_init(|| UnicodeTables::load(source))
}

/// Installs already built tables. Returns them back if an instance is
/// already installed.
pub fn install_unicode_tables(
    tables: UnicodeTables,
) -> Result<&'static UnicodeTables, UnicodeTables> {
    UNICODE_TABLES
        .try_insert(tables)
        .map_err(|(_, rejected)| rejected)
}

/// The process-wide tables.
pub fn unicode_tables() -> UnicodeResult<&'static UnicodeTables> {
    UNICODE_TABLES.get().ok_or(UnicodeError::NotInitialized)
}
