// unicode/mod.rs - Port of unicode.c
// Unicode character properties, case folding, and related functions.

pub mod case_fold;
pub mod loader;
pub mod property;
pub mod tables;

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::encodings::utf8::ONIG_ENCODING_UTF8;
use crate::error::UnicodeResult;
use crate::oniguruma::*;
use crate::regenc::*;
use case_fold::{CaseFoldTables, CodeList};
use property::CodeRange;

pub use loader::{DirTableSource, MemoryTableSource, TableSource, TableWriter};
pub use property::{PropertyDef, DEFAULT_PROPERTIES, STANDARD_PROPERTIES};
pub use tables::{init_unicode_tables, install_unicode_tables, unicode_tables, UnicodeTables};

// === Turkish / Azeri ===
const LATIN_CAPITAL_I: OnigCodePoint = 0x0049;
const LATIN_SMALL_I: OnigCodePoint = 0x0069;
const LATIN_CAPITAL_I_WITH_DOT_ABOVE: OnigCodePoint = 0x0130;
const LATIN_SMALL_DOTLESS_I: OnigCodePoint = 0x0131;

#[inline]
fn turkish_azeri_counterpart(code: OnigCodePoint) -> Option<OnigCodePoint> {
    match code {
        LATIN_CAPITAL_I => Some(LATIN_SMALL_DOTLESS_I),
        LATIN_CAPITAL_I_WITH_DOT_ABOVE => Some(LATIN_SMALL_I),
        LATIN_SMALL_DOTLESS_I => Some(LATIN_CAPITAL_I),
        LATIN_SMALL_I => Some(LATIN_CAPITAL_I_WITH_DOT_ABOVE),
        _ => None,
    }
}

// A folded code plus at most three codes unfolding onto it.
const MAX_FOLD_ALTERNATIVES: usize = 4;

/// Shared result for positions without case fold alternatives.
pub static EMPTY_FOLD_CODES: &[OnigCaseFoldCodeItem] = &[];

/// Case fold alternatives for one position.
pub type CaseFoldCodes = Cow<'static, [OnigCaseFoldCodeItem]>;

/// One folded character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseFoldedChar {
    /// Encoded fold.
    pub bytes: SmallVec<[u8; ONIGENC_MBC_CASE_FOLD_MAXLEN]>,
    /// Source bytes consumed; always exactly one character.
    pub consumed: usize,
}

// === Unicode Case Fold Functions ===

/// Case fold the character at pp into fold, advancing pp by one character.
/// Returns the number of bytes written.
/// Port of onigenc_unicode_mbc_case_fold from unicode.c
pub fn onigenc_unicode_mbc_case_fold(
    enc: &dyn Encoding,
    tables: &UnicodeTables,
    flag: OnigCaseFoldType,
    pp: &mut usize,
    end: usize,
    data: &[u8],
    fold: &mut [u8],
) -> usize {
    let p = *pp;
    let code = onigenc_mbc_to_code_at(enc, data, p, end);
    let len = onigenc_mbc_enc_len_at(enc, data, p, end);
    *pp += len;

    if flag.is_turkish_azeri() {
        if code == LATIN_CAPITAL_I {
            return enc.code_to_mbc(LATIN_SMALL_DOTLESS_I, fold);
        } else if code == LATIN_CAPITAL_I_WITH_DOT_ABOVE {
            return enc.code_to_mbc(LATIN_SMALL_I, fold);
        }
    }

    if let Some(to) = tables.case_folds().fold(code) {
        let mut n = 0;
        for &c in to.codes() {
            n += enc.code_to_mbc(c, &mut fold[n..]);
        }
        return n;
    }

    fold[..len].copy_from_slice(&data[p..p + len]);
    len
}

/// Owned-result variant of `onigenc_unicode_mbc_case_fold`.
pub fn onigenc_unicode_case_fold(
    enc: &dyn Encoding,
    tables: &UnicodeTables,
    flag: OnigCaseFoldType,
    data: &[u8],
    pos: usize,
    end: usize,
) -> CaseFoldedChar {
    if pos >= end {
        return CaseFoldedChar {
            bytes: SmallVec::new(),
            consumed: 0,
        };
    }
    let mut buf = [0u8; ONIGENC_MBC_CASE_FOLD_MAXLEN];
    let mut p = pos;
    let n = onigenc_unicode_mbc_case_fold(enc, tables, flag, &mut p, end, data, &mut buf);
    CaseFoldedChar {
        bytes: SmallVec::from_slice(&buf[..n]),
        consumed: p - pos,
    }
}

// Emits `from <-> to` for every listed code, plus both directions between
// every two codes of one list.
fn apply_unfold1_closure<E, F>(entries: &[(OnigCodePoint, CodeList)], f: &mut F) -> Result<(), E>
where
    F: FnMut(OnigCodePoint, &[OnigCodePoint]) -> Result<(), E>,
{
    for (from, to) in entries {
        let to = to.codes();
        for (j, &tj) in to.iter().enumerate() {
            f(tj, &[*from])?;
            f(*from, &[tj])?;

            for &tk in &to[..j] {
                f(tj, &[tk])?;
                f(tk, &[tj])?;
            }
        }
    }
    Ok(())
}

// Emits `key sequence -> code` for every listed code, plus the single-code
// links between codes of one list.
fn apply_unfold_n<const K: usize, E, F>(
    entries: &[([OnigCodePoint; K], CodeList)],
    f: &mut F,
) -> Result<(), E>
where
    F: FnMut(OnigCodePoint, &[OnigCodePoint]) -> Result<(), E>,
{
    for (from, to) in entries {
        let to = to.codes();
        for (j, &tj) in to.iter().enumerate() {
            f(tj, from)?;

            for (k, &tk) in to.iter().enumerate() {
                if k == j {
                    continue;
                }
                f(tj, &[tk])?;
            }
        }
    }
    Ok(())
}

/// Call f(from, to) for every case fold equivalence in the tables.
/// Stops at, and returns, the first error f returns.
/// Port of onigenc_unicode_apply_all_case_fold from unicode.c
pub fn onigenc_unicode_apply_all_case_fold<E, F>(
    tables: &UnicodeTables,
    flag: OnigCaseFoldType,
    mut f: F,
) -> Result<(), E>
where
    F: FnMut(OnigCodePoint, &[OnigCodePoint]) -> Result<(), E>,
{
    let folds = tables.case_folds();
    apply_unfold1_closure(folds.unfold1_default(), &mut f)?;

    if flag.is_turkish_azeri() {
        f(LATIN_CAPITAL_I, &[LATIN_SMALL_DOTLESS_I])?;
        f(LATIN_SMALL_DOTLESS_I, &[LATIN_CAPITAL_I])?;
        f(LATIN_SMALL_I, &[LATIN_CAPITAL_I_WITH_DOT_ABOVE])?;
        f(LATIN_CAPITAL_I_WITH_DOT_ABOVE, &[LATIN_SMALL_I])?;
    } else {
        apply_unfold1_closure(folds.unfold1_locale(), &mut f)?;
    }

    if flag.is_multi_char() {
        apply_unfold_n(folds.unfold2_default(), &mut f)?;
        if !flag.is_turkish_azeri() {
            apply_unfold_n(folds.unfold2_locale(), &mut f)?;
        }
        apply_unfold_n(folds.unfold3_default(), &mut f)?;
    }
    Ok(())
}

// Bounded accumulator for case fold alternatives.
struct FoldCodeItems {
    items: SmallVec<[OnigCaseFoldCodeItem; ONIGENC_GET_CASE_FOLD_CODES_MAX_NUM]>,
    dropped: usize,
}

impl FoldCodeItems {
    fn new() -> Self {
        FoldCodeItems {
            items: SmallVec::new(),
            dropped: 0,
        }
    }

    #[inline]
    fn push(&mut self, byte_len: usize, codes: &[OnigCodePoint]) {
        if self.items.len() < ONIGENC_GET_CASE_FOLD_CODES_MAX_NUM {
            self.items.push(OnigCaseFoldCodeItem::new(byte_len, codes));
        } else {
            self.dropped += 1;
        }
    }

    fn finish(self) -> SmallVec<[OnigCaseFoldCodeItem; ONIGENC_GET_CASE_FOLD_CODES_MAX_NUM]> {
        if self.dropped > 0 {
            tracing::warn!(
                kept = self.items.len(),
                dropped = self.dropped,
                "case fold alternatives truncated"
            );
        }
        self.items
    }
}

// The code a following character contributes to a multi-char key: its
// single-code fold, or itself.
#[inline]
fn single_folded_code(
    enc: &dyn Encoding,
    folds: &CaseFoldTables,
    data: &[u8],
    p: usize,
    end: usize,
) -> (OnigCodePoint, usize) {
    let code = onigenc_mbc_to_code_at(enc, data, p, end);
    let len = onigenc_mbc_enc_len_at(enc, data, p, end);
    match folds.fold(code) {
        Some(to) if to.len() == 1 => (to.codes()[0], len),
        _ => (code, len),
    }
}

fn unicode_case_fold_code_items(
    enc: &dyn Encoding,
    tables: &UnicodeTables,
    flag: OnigCaseFoldType,
    data: &[u8],
    pos: usize,
    end: usize,
) -> SmallVec<[OnigCaseFoldCodeItem; ONIGENC_GET_CASE_FOLD_CODES_MAX_NUM]> {
    let mut items = FoldCodeItems::new();
    if pos >= end {
        return items.finish();
    }

    let source_code = onigenc_mbc_to_code_at(enc, data, pos, end);
    let mut len = onigenc_mbc_enc_len_at(enc, data, pos, end);
    let mut code = source_code;
    let mut multi_char = flag.is_multi_char();

    if flag.is_turkish_azeri() {
        if let Some(counterpart) = turkish_azeri_counterpart(code) {
            items.push(len, &[counterpart]);
            return items.finish();
        }
    }

    let folds = tables.case_folds();
    if let Some(to) = folds.fold(code) {
        if to.len() == 1 {
            let folded = to.codes()[0];
            items.push(len, &[folded]);

            if let Some(siblings) = folds.unfold1(folded) {
                for &s in siblings.codes() {
                    if s != source_code {
                        items.push(len, &[s]);
                    }
                }
            }
            code = folded;
        } else if multi_char {
            // Every folded code with the codes unfolding onto it.
            let alternatives: SmallVec<
                [SmallVec<[OnigCodePoint; MAX_FOLD_ALTERNATIVES]>; ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN],
            > = to
                .codes()
                .iter()
                .map(|&c| {
                    let mut alts: SmallVec<[OnigCodePoint; MAX_FOLD_ALTERNATIVES]> = SmallVec::new();
                    alts.push(c);
                    if let Some(z) = folds.unfold1(c) {
                        alts.extend(z.codes().iter().copied().take(MAX_FOLD_ALTERNATIVES - 1));
                    }
                    alts
                })
                .collect();

            match alternatives.as_slice() {
                [a, b] => {
                    for &x in a {
                        for &y in b {
                            items.push(len, &[x, y]);
                        }
                    }
                }
                [a, b, c] => {
                    for &x in a {
                        for &y in b {
                            for &z in c {
                                items.push(len, &[x, y, z]);
                            }
                        }
                    }
                }
                _ => {}
            }

            if let Some(z) = folds.unfold_n(to.codes()) {
                for &s in z.codes() {
                    if s != code {
                        items.push(len, &[s]);
                    }
                }
            }

            // A multi-char fold is never the head of another multi-char fold.
            multi_char = false;
        }
    } else if let Some(siblings) = folds.unfold1(code) {
        for &s in siblings.codes() {
            items.push(len, &[s]);
        }
    }

    if multi_char {
        let mut p = pos + len;
        if p < end {
            let codes0 = code;
            let (codes1, clen) = single_folded_code(enc, folds, data, p, end);
            len += clen;
            if let Some(z) = folds.unfold2(&[codes0, codes1]) {
                for &s in z.codes() {
                    if s != source_code {
                        items.push(len, &[s]);
                    }
                }
            }

            p += clen;
            if p < end {
                let (codes2, clen) = single_folded_code(enc, folds, data, p, end);
                len += clen;
                if let Some(z) = folds.unfold3(&[codes0, codes1, codes2]) {
                    for &s in z.codes() {
                        if s != source_code {
                            items.push(len, &[s]);
                        }
                    }
                }
            }
        }
    }

    items.finish()
}

/// Get case fold code items for the character(s) at pos.
/// Returns `EMPTY_FOLD_CODES` (borrowed) when there are none.
pub fn onigenc_unicode_case_fold_codes(
    enc: &dyn Encoding,
    tables: &UnicodeTables,
    flag: OnigCaseFoldType,
    data: &[u8],
    pos: usize,
    end: usize,
) -> CaseFoldCodes {
    let items = unicode_case_fold_code_items(enc, tables, flag, data, pos, end);
    if items.is_empty() {
        Cow::Borrowed(EMPTY_FOLD_CODES)
    } else {
        Cow::Owned(items.into_vec())
    }
}

/// Buffer variant: writes at most `items.len()` alternatives, returns the
/// number written.
/// Port of onigenc_unicode_get_case_fold_codes_by_str from unicode.c
pub fn onigenc_unicode_get_case_fold_codes_by_str(
    enc: &dyn Encoding,
    tables: &UnicodeTables,
    flag: OnigCaseFoldType,
    data: &[u8],
    pos: usize,
    end: usize,
    items: &mut [OnigCaseFoldCodeItem],
) -> usize {
    let found = unicode_case_fold_code_items(enc, tables, flag, data, pos, end);
    let n = found.len().min(items.len());
    items[..n].copy_from_slice(&found[..n]);
    n
}

// === Unicode Property Functions ===

/// Convert Unicode property name to ctype.
/// Port of onigenc_unicode_property_name_to_ctype from unicode.c
pub fn onigenc_unicode_property_name_to_ctype(
    enc: &dyn Encoding,
    tables: &UnicodeTables,
    name: &[u8],
) -> UnicodeResult<OnigCtype> {
    tables.properties().property_name_to_ctype(enc, name)
}

/// Check if code point is of the given Unicode ctype.
/// Port of onigenc_unicode_is_code_ctype from unicode.c
pub fn onigenc_unicode_is_code_ctype(
    tables: &UnicodeTables,
    code: OnigCodePoint,
    ctype: OnigCtype,
) -> UnicodeResult<bool> {
    tables.properties().is_code_ctype(code, ctype)
}

/// Get Unicode ctype code range.
/// Port of onigenc_unicode_ctype_code_range from unicode.c
pub fn onigenc_unicode_ctype_code_range(
    tables: &UnicodeTables,
    ctype: OnigCtype,
) -> UnicodeResult<&CodeRange> {
    tables.properties().ctype_code_range(ctype)
}

// === Unicode Encoding ===

/// A multibyte codec bound to a set of Unicode tables.
#[derive(Clone, Copy)]
pub struct UnicodeEncoding<'a> {
    enc: &'a dyn Encoding,
    tables: &'a UnicodeTables,
}

impl<'a> UnicodeEncoding<'a> {
    pub fn new(enc: &'a dyn Encoding, tables: &'a UnicodeTables) -> Self {
        UnicodeEncoding { enc, tables }
    }

    /// UTF-8 over the process-wide tables.
    pub fn utf8() -> UnicodeResult<UnicodeEncoding<'static>> {
        Ok(UnicodeEncoding::new(&ONIG_ENCODING_UTF8, unicode_tables()?))
    }

    pub fn encoding(&self) -> &'a dyn Encoding {
        self.enc
    }

    pub fn tables(&self) -> &'a UnicodeTables {
        self.tables
    }

    pub fn mbc_case_fold(
        &self,
        flag: OnigCaseFoldType,
        pp: &mut usize,
        end: usize,
        data: &[u8],
        fold: &mut [u8],
    ) -> usize {
        onigenc_unicode_mbc_case_fold(self.enc, self.tables, flag, pp, end, data, fold)
    }

    pub fn case_fold(
        &self,
        flag: OnigCaseFoldType,
        data: &[u8],
        pos: usize,
        end: usize,
    ) -> CaseFoldedChar {
        onigenc_unicode_case_fold(self.enc, self.tables, flag, data, pos, end)
    }

    /// Folds every character of data.
    pub fn case_fold_str(&self, flag: OnigCaseFoldType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        let mut buf = [0u8; ONIGENC_MBC_CASE_FOLD_MAXLEN];
        let mut p = 0;
        while p < data.len() {
            let n = self.mbc_case_fold(flag, &mut p, data.len(), data, &mut buf);
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    pub fn apply_all_case_fold<E, F>(&self, flag: OnigCaseFoldType, f: F) -> Result<(), E>
    where
        F: FnMut(OnigCodePoint, &[OnigCodePoint]) -> Result<(), E>,
    {
        onigenc_unicode_apply_all_case_fold(self.tables, flag, f)
    }

    pub fn case_fold_codes(
        &self,
        flag: OnigCaseFoldType,
        data: &[u8],
        pos: usize,
        end: usize,
    ) -> CaseFoldCodes {
        onigenc_unicode_case_fold_codes(self.enc, self.tables, flag, data, pos, end)
    }

    pub fn get_case_fold_codes_by_str(
        &self,
        flag: OnigCaseFoldType,
        data: &[u8],
        pos: usize,
        end: usize,
        items: &mut [OnigCaseFoldCodeItem],
    ) -> usize {
        onigenc_unicode_get_case_fold_codes_by_str(
            self.enc,
            self.tables,
            flag,
            data,
            pos,
            end,
            items,
        )
    }

    pub fn property_name_to_ctype(&self, name: &[u8]) -> UnicodeResult<OnigCtype> {
        onigenc_unicode_property_name_to_ctype(self.enc, self.tables, name)
    }

    pub fn is_code_ctype(&self, code: OnigCodePoint, ctype: OnigCtype) -> UnicodeResult<bool> {
        onigenc_unicode_is_code_ctype(self.tables, code, ctype)
    }

    /// Code range of a ctype; sb_out receives the single-byte boundary.
    pub fn get_ctype_code_range(
        &self,
        ctype: OnigCtype,
        sb_out: &mut OnigCodePoint,
    ) -> UnicodeResult<&'a CodeRange> {
        *sb_out = 0x80;
        onigenc_unicode_ctype_code_range(self.tables, ctype)
    }
}
