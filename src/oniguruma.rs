// oniguruma.rs - Port of the oniguruma.h subset used by the Unicode layer
// Public types, case fold flags, ctype indices, limits, error codes.

use bitflags::bitflags;

// === Base types ===
pub type OnigCodePoint = u32;
pub type OnigCtype = u32;

// === Case Fold Flags ===
bitflags! {
    /// Case fold options passed to every fold entry point.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OnigCaseFoldType: u32 {
        /// Dotted/dotless I mapping for Turkish and Azeri.
        const TURKISH_AZERI = 1 << 20;
        /// Allow one character to match a sequence of several (ß <-> ss).
        const MULTI_CHAR = 1 << 30;
    }
}

pub const ONIGENC_CASE_FOLD_TURKISH_AZERI: OnigCaseFoldType = OnigCaseFoldType::TURKISH_AZERI;
pub const INTERNAL_ONIGENC_CASE_FOLD_MULTI_CHAR: OnigCaseFoldType = OnigCaseFoldType::MULTI_CHAR;
pub const ONIGENC_CASE_FOLD_MIN: OnigCaseFoldType = INTERNAL_ONIGENC_CASE_FOLD_MULTI_CHAR;
pub const ONIGENC_CASE_FOLD_DEFAULT: OnigCaseFoldType = ONIGENC_CASE_FOLD_MIN;

impl OnigCaseFoldType {
    /// True when the Turkish/Azeri override is both requested and compiled in.
    #[inline]
    pub fn is_turkish_azeri(self) -> bool {
        cfg!(feature = "turkish-azeri") && self.contains(OnigCaseFoldType::TURKISH_AZERI)
    }

    #[inline]
    pub fn is_multi_char(self) -> bool {
        self.contains(OnigCaseFoldType::MULTI_CHAR)
    }
}

// === Work Size ===
pub const ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN: usize = 3;
pub const ONIGENC_GET_CASE_FOLD_CODES_MAX_NUM: usize = 13;
pub const ONIGENC_CODE_TO_MBC_MAXLEN: usize = 7;
pub const ONIGENC_MBC_CASE_FOLD_MAXLEN: usize = 18;
pub const ONIGENC_MAX_UNICODE_CODE_POINT: OnigCodePoint = 0x10ffff;

// === Binary table packing ===
// CodeList header: low bits hold the code count, the rest are flags.
pub const ONIGENC_CODE_POINT_MASK_WIDTH: u32 = 3;
pub const ONIGENC_CODE_POINT_MASK: u32 = (1 << ONIGENC_CODE_POINT_MASK_WIDTH) - 1;
// CaseMappingSpecials header: length above this bit, first code below.
pub const ONIGENC_SPECIALS_LENGTH_OFFSET: u32 = 25;

// === Property names ===
#[cfg(feature = "unicode-properties")]
pub const ONIGENC_MAX_WORD_LENGTH: usize = 44;
#[cfg(not(feature = "unicode-properties"))]
pub const ONIGENC_MAX_WORD_LENGTH: usize = 6;
pub const ONIGENC_PROPERTY_NAME_MAX_SIZE: usize = ONIGENC_MAX_WORD_LENGTH + 1;

// === Character Types ===
pub const ONIGENC_CTYPE_NEWLINE: OnigCtype = 0;
pub const ONIGENC_CTYPE_ALPHA: OnigCtype = 1;
pub const ONIGENC_CTYPE_BLANK: OnigCtype = 2;
pub const ONIGENC_CTYPE_CNTRL: OnigCtype = 3;
pub const ONIGENC_CTYPE_DIGIT: OnigCtype = 4;
pub const ONIGENC_CTYPE_GRAPH: OnigCtype = 5;
pub const ONIGENC_CTYPE_LOWER: OnigCtype = 6;
pub const ONIGENC_CTYPE_PRINT: OnigCtype = 7;
pub const ONIGENC_CTYPE_PUNCT: OnigCtype = 8;
pub const ONIGENC_CTYPE_SPACE: OnigCtype = 9;
pub const ONIGENC_CTYPE_UPPER: OnigCtype = 10;
pub const ONIGENC_CTYPE_XDIGIT: OnigCtype = 11;
pub const ONIGENC_CTYPE_WORD: OnigCtype = 12;
pub const ONIGENC_CTYPE_ALNUM: OnigCtype = 13;
pub const ONIGENC_CTYPE_ASCII: OnigCtype = 14;
pub const ONIGENC_MAX_STD_CTYPE: OnigCtype = ONIGENC_CTYPE_ASCII;

// === Case Fold Code Item ===
/// One case-insensitive alternative for the character(s) at a position.
///
/// `byte_len` is how many source bytes the alternative stands for; it spans
/// several characters when a multi-character sequence folds to one code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnigCaseFoldCodeItem {
    pub byte_len: usize,
    pub code_len: usize,
    pub code: [OnigCodePoint; ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN],
}

impl OnigCaseFoldCodeItem {
    pub fn new(byte_len: usize, codes: &[OnigCodePoint]) -> Self {
        debug_assert!(!codes.is_empty() && codes.len() <= ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN);
        let mut code = [0; ONIGENC_MAX_COMP_CASE_FOLD_CODE_LEN];
        code[..codes.len()].copy_from_slice(codes);
        OnigCaseFoldCodeItem {
            byte_len,
            code_len: codes.len(),
            code,
        }
    }

    #[inline]
    pub fn codes(&self) -> &[OnigCodePoint] {
        &self.code[..self.code_len]
    }
}

// === Error Codes ===
pub const ONIGERR_TYPE_BUG: i32 = -6;
pub const ONIGERR_FAIL_TO_INITIALIZE: i32 = -23;
pub const ONIGERR_INVALID_CHAR_PROPERTY_NAME: i32 = -223;
pub const ONIGERR_LIBRARY_IS_NOT_INITIALIZED: i32 = -500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_fold_flag_bits() {
        assert_eq!(ONIGENC_CASE_FOLD_TURKISH_AZERI.bits(), 1 << 20);
        assert_eq!(INTERNAL_ONIGENC_CASE_FOLD_MULTI_CHAR.bits(), 1 << 30);
        assert!(ONIGENC_CASE_FOLD_DEFAULT.is_multi_char());
        assert!(!ONIGENC_CASE_FOLD_DEFAULT.is_turkish_azeri());
    }

    #[cfg(feature = "turkish-azeri")]
    #[test]
    fn turkish_flag_enabled() {
        let flag = ONIGENC_CASE_FOLD_DEFAULT | ONIGENC_CASE_FOLD_TURKISH_AZERI;
        assert!(flag.is_turkish_azeri());
    }

    #[test]
    fn code_item_codes_slice() {
        let item = OnigCaseFoldCodeItem::new(2, &[0x73, 0x73]);
        assert_eq!(item.codes(), &[0x73, 0x73]);
        assert_eq!(item.byte_len, 2);
        assert_eq!(item.code_len, 2);
    }
}
