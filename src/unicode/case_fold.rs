// unicode/case_fold.rs - Case fold table set
//
// Built once from the loaded tables:
//   CaseFold                     code -> folded codes (1..3)
//   CaseUnfold_11[_Locale]       folded code -> codes folding onto it
//   CaseUnfold_12[_Locale]       2-code folded sequence -> single codes
//   CaseUnfold_13                3-code folded sequence -> single codes
//   CaseMappingSpecials          special casing records, kept for callers
// Nothing is mutated after `CaseFoldTables::load` returns.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;

use super::loader::{IntReader, TableSource};
use crate::error::{UnicodeError, UnicodeResult};
use crate::oniguruma::*;

pub const CASE_FOLD_TABLE: &str = "CaseFold";
pub const CASE_UNFOLD_11_TABLE: &str = "CaseUnfold_11";
pub const CASE_UNFOLD_11_LOCALE_TABLE: &str = "CaseUnfold_11_Locale";
pub const CASE_UNFOLD_12_TABLE: &str = "CaseUnfold_12";
pub const CASE_UNFOLD_12_LOCALE_TABLE: &str = "CaseUnfold_12_Locale";
pub const CASE_UNFOLD_13_TABLE: &str = "CaseUnfold_13";
pub const CASE_MAPPING_SPECIALS_TABLE: &str = "CaseMappingSpecials";

pub type Unfold2Key = [OnigCodePoint; 2];
pub type Unfold3Key = [OnigCodePoint; 3];

// === CodeList ===

/// Fold or unfold target plus the flag bits of its header.
///
/// Lists read from a table hold 1..=3 code points. A merged unfold list
/// (default entry extended by a locale entry) can be longer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeList {
    codes: SmallVec<[OnigCodePoint; ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN]>,
    flags: u32,
}

impl CodeList {
    pub fn new(codes: &[OnigCodePoint], flags: u32) -> Self {
        CodeList {
            codes: SmallVec::from_slice(codes),
            flags: flags & !ONIGENC_CODE_POINT_MASK,
        }
    }

    fn read(reader: &mut IntReader<'_>) -> UnicodeResult<Self> {
        let packed = reader.read_i32()? as u32;
        let len = (packed & ONIGENC_CODE_POINT_MASK) as usize;
        if len == 0 || len > ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN {
            return Err(UnicodeError::malformed(
                reader.table(),
                format!("code list length {len}"),
            ));
        }
        let mut codes = SmallVec::new();
        for _ in 0..len {
            codes.push(reader.read_code()?);
        }
        Ok(CodeList {
            codes,
            flags: packed & !ONIGENC_CODE_POINT_MASK,
        })
    }

    #[inline]
    pub fn codes(&self) -> &[OnigCodePoint] {
        &self.codes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    // Appends the codes of a colliding entry as further siblings. The result
    // may exceed ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN; `codes` spills to the heap.
    fn merge(&mut self, other: &CodeList) {
        for &code in other.codes() {
            if !self.codes.contains(&code) {
                self.codes.push(code);
            }
        }
        self.flags |= other.flags;
    }
}

// === Table reading ===

fn read_keyed_table<const K: usize>(
    source: &dyn TableSource,
    name: &str,
) -> UnicodeResult<Vec<([OnigCodePoint; K], CodeList)>> {
    let bytes = source.open(name)?;
    let mut reader = IntReader::new(name, &bytes);
    let count = reader.read_count()?;
    // Each entry needs at least K keys, a header and one code.
    if count > reader.remaining() / (4 * (K + 2)) {
        return Err(UnicodeError::malformed(
            name,
            format!("count {count} exceeds payload"),
        ));
    }
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let mut key = [0; K];
        for k in key.iter_mut() {
            *k = reader.read_code()?;
        }
        entries.push((key, CodeList::read(&mut reader)?));
    }
    reader.finish()?;
    tracing::debug!(table = name, entries = entries.len(), "read case fold table");
    Ok(entries)
}

fn read_single_key_table(
    source: &dyn TableSource,
    name: &str,
) -> UnicodeResult<Vec<(OnigCodePoint, CodeList)>> {
    Ok(read_keyed_table::<1>(source, name)?
        .into_iter()
        .map(|([code], list)| (code, list))
        .collect())
}

fn read_specials(
    source: &dyn TableSource,
) -> UnicodeResult<Vec<SmallVec<[OnigCodePoint; 4]>>> {
    let name = CASE_MAPPING_SPECIALS_TABLE;
    let bytes = source.open(name)?;
    let mut reader = IntReader::new(name, &bytes);
    let words = reader.read_count()?;
    let first_mask = (1u32 << ONIGENC_SPECIALS_LENGTH_OFFSET) - 1;

    let mut values = Vec::new();
    let mut consumed = 0;
    while consumed < words {
        let packed = reader.read_i32()? as u32;
        let len = (packed >> ONIGENC_SPECIALS_LENGTH_OFFSET) as usize;
        if len == 0 || consumed + len > words {
            return Err(UnicodeError::malformed(
                name,
                format!("record length {len} at word {consumed}"),
            ));
        }
        let mut codes = SmallVec::with_capacity(len);
        codes.push(packed & first_mask);
        for _ in 1..len {
            codes.push(reader.read_code()?);
        }
        consumed += len;
        values.push(codes);
    }
    reader.finish()?;
    tracing::debug!(table = name, records = values.len(), "read case mapping specials");
    Ok(values)
}

// Default entries first, then locale ones; a locale entry whose key is
// already present extends that entry's sibling list.
fn build_unfold_map<K: Copy + Eq + Hash>(
    default: &[(K, CodeList)],
    locale: &[(K, CodeList)],
) -> HashMap<K, CodeList> {
    let mut map: HashMap<K, CodeList> = HashMap::with_capacity(default.len() + locale.len());
    for (key, list) in default.iter().chain(locale) {
        match map.entry(*key) {
            Entry::Occupied(mut slot) => slot.get_mut().merge(list),
            Entry::Vacant(slot) => {
                slot.insert(list.clone());
            }
        }
    }
    map
}

// === Case Fold Tables ===

pub struct CaseFoldTables {
    fold: HashMap<OnigCodePoint, CodeList>,
    unfold1_default: Vec<(OnigCodePoint, CodeList)>,
    unfold1_locale: Vec<(OnigCodePoint, CodeList)>,
    unfold1: HashMap<OnigCodePoint, CodeList>,
    unfold2_default: Vec<(Unfold2Key, CodeList)>,
    unfold2_locale: Vec<(Unfold2Key, CodeList)>,
    unfold2: HashMap<Unfold2Key, CodeList>,
    unfold3_default: Vec<(Unfold3Key, CodeList)>,
    unfold3: HashMap<Unfold3Key, CodeList>,
    specials: Vec<SmallVec<[OnigCodePoint; 4]>>,
}

impl CaseFoldTables {
    pub fn load(source: &dyn TableSource) -> UnicodeResult<Self> {
        let fold_entries = read_single_key_table(source, CASE_FOLD_TABLE)?;
        let mut fold = HashMap::with_capacity(fold_entries.len());
        for (code, list) in fold_entries {
            match fold.entry(code) {
                Entry::Occupied(_) => {
                    tracing::warn!(code, "duplicate case fold entry ignored");
                }
                Entry::Vacant(slot) => {
                    slot.insert(list);
                }
            }
        }

        let unfold1_default = read_single_key_table(source, CASE_UNFOLD_11_TABLE)?;
        let unfold1_locale = read_single_key_table(source, CASE_UNFOLD_11_LOCALE_TABLE)?;
        let unfold1 = build_unfold_map(&unfold1_default, &unfold1_locale);

        let unfold2_default = read_keyed_table::<2>(source, CASE_UNFOLD_12_TABLE)?;
        let unfold2_locale = read_keyed_table::<2>(source, CASE_UNFOLD_12_LOCALE_TABLE)?;
        let unfold2 = build_unfold_map(&unfold2_default, &unfold2_locale);

        let unfold3_default = read_keyed_table::<3>(source, CASE_UNFOLD_13_TABLE)?;
        let unfold3 = build_unfold_map(&unfold3_default, &[]);

        let specials = read_specials(source)?;

        Ok(CaseFoldTables {
            fold,
            unfold1_default,
            unfold1_locale,
            unfold1,
            unfold2_default,
            unfold2_locale,
            unfold2,
            unfold3_default,
            unfold3,
            specials,
        })
    }

    #[inline]
    pub fn fold(&self, code: OnigCodePoint) -> Option<&CodeList> {
        self.fold.get(&code)
    }

    #[inline]
    pub fn unfold1(&self, code: OnigCodePoint) -> Option<&CodeList> {
        self.unfold1.get(&code)
    }

    #[inline]
    pub fn unfold2(&self, key: &Unfold2Key) -> Option<&CodeList> {
        self.unfold2.get(key)
    }

    #[inline]
    pub fn unfold3(&self, key: &Unfold3Key) -> Option<&CodeList> {
        self.unfold3.get(key)
    }

    /// Unfold lookup by a folded sequence of two or three codes.
    pub fn unfold_n(&self, codes: &[OnigCodePoint]) -> Option<&CodeList> {
        match *codes {
            [a, b] => self.unfold2(&[a, b]),
            [a, b, c] => self.unfold3(&[a, b, c]),
            _ => None,
        }
    }

    pub fn unfold1_default(&self) -> &[(OnigCodePoint, CodeList)] {
        &self.unfold1_default
    }

    pub fn unfold1_locale(&self) -> &[(OnigCodePoint, CodeList)] {
        &self.unfold1_locale
    }

    pub fn unfold2_default(&self) -> &[(Unfold2Key, CodeList)] {
        &self.unfold2_default
    }

    pub fn unfold2_locale(&self) -> &[(Unfold2Key, CodeList)] {
        &self.unfold2_locale
    }

    pub fn unfold3_default(&self) -> &[(Unfold3Key, CodeList)] {
        &self.unfold3_default
    }

    /// Special casing records; not consulted by the fold engine.
    pub fn specials(&self) -> &[SmallVec<[OnigCodePoint; 4]>] {
        &self.specials
    }

    pub fn fold_len(&self) -> usize {
        self.fold.len()
    }

    pub fn unfold1_len(&self) -> usize {
        self.unfold1.len()
    }

    pub fn unfold2_len(&self) -> usize {
        self.unfold2.len()
    }

    pub fn unfold3_len(&self) -> usize {
        self.unfold3.len()
    }
}
