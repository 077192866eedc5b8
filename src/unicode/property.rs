// unicode/property.rs - Unicode ctype classification
// ISO 8859-1 fast table for code < 256, lazily decoded code range tables
// for everything else, and the property name -> ctype lookup.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use once_cell::race::OnceBox;

use super::loader::{decode_int_array, TableSource};
use crate::error::{UnicodeError, UnicodeResult};
use crate::oniguruma::*;
use crate::regenc::*;

// === Unicode ISO 8859-1 Ctype Table ===
// From unicode.c: EncUNICODE_ISO_8859_1_CtypeTable[256]
// One bit per standard ctype (bit n = ctype n).

pub static ENC_UNICODE_ISO_8859_1_CTYPE_TABLE: [u16; 256] = [
    0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008,
    0x4008, 0x428c, 0x4289, 0x4288, 0x4288, 0x4288, 0x4008, 0x4008,
    0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008,
    0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008,
    0x4284, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0,
    0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0,
    0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0,
    0x78b0, 0x78b0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0,
    0x41a0, 0x7ca2, 0x7ca2, 0x7ca2, 0x7ca2, 0x7ca2, 0x7ca2, 0x74a2,
    0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2,
    0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2,
    0x74a2, 0x74a2, 0x74a2, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x51a0,
    0x41a0, 0x78e2, 0x78e2, 0x78e2, 0x78e2, 0x78e2, 0x78e2, 0x70e2,
    0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2,
    0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2,
    0x70e2, 0x70e2, 0x70e2, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x4008,
    0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0288, 0x0008, 0x0008,
    0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008,
    0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008,
    0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008,
    0x0284, 0x01a0, 0x00a0, 0x00a0, 0x00a0, 0x00a0, 0x00a0, 0x00a0,
    0x00a0, 0x00a0, 0x30e2, 0x01a0, 0x00a0, 0x00a8, 0x00a0, 0x00a0,
    0x00a0, 0x00a0, 0x10a0, 0x10a0, 0x00a0, 0x30e2, 0x00a0, 0x01a0,
    0x00a0, 0x10a0, 0x30e2, 0x01a0, 0x10a0, 0x10a0, 0x10a0, 0x01a0,
    0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2,
    0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2,
    0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x00a0,
    0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x34a2, 0x30e2,
    0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2,
    0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2,
    0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x00a0,
    0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2, 0x30e2,
];

/// Fast-table lookup for a standard ctype and code < 256.
#[inline]
pub fn onigenc_unicode_is_code_ctype_internal(code: OnigCodePoint, ctype: OnigCtype) -> bool {
    (ENC_UNICODE_ISO_8859_1_CTYPE_TABLE[code as usize] as u32 & ctype_to_bit(ctype)) != 0
}

// === Property definitions ===

/// A property name and the code range table backing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: &'static str,
    pub table: &'static str,
}

impl PropertyDef {
    pub const fn new(name: &'static str, table: &'static str) -> Self {
        PropertyDef { name, table }
    }
}

/// The POSIX ctypes, at the indices of the ONIGENC_CTYPE_* constants.
pub static STANDARD_PROPERTIES: [PropertyDef; ONIGENC_MAX_STD_CTYPE as usize + 1] = [
    PropertyDef::new("newline", "CR_NEWLINE"),
    PropertyDef::new("alpha", "CR_Alpha"),
    PropertyDef::new("blank", "CR_Blank"),
    PropertyDef::new("cntrl", "CR_Cntrl"),
    PropertyDef::new("digit", "CR_Digit"),
    PropertyDef::new("graph", "CR_Graph"),
    PropertyDef::new("lower", "CR_Lower"),
    PropertyDef::new("print", "CR_Print"),
    PropertyDef::new("punct", "CR_Punct"),
    PropertyDef::new("space", "CR_Space"),
    PropertyDef::new("upper", "CR_Upper"),
    PropertyDef::new("xdigit", "CR_XDigit"),
    PropertyDef::new("word", "CR_Word"),
    PropertyDef::new("alnum", "CR_Alnum"),
    PropertyDef::new("ascii", "CR_ASCII"),
];

/// Properties loaded after the standard ctypes by `UnicodeTables::load`.
#[cfg(feature = "unicode-properties")]
pub static DEFAULT_PROPERTIES: &[PropertyDef] = &[
    PropertyDef::new("any", "CR_Any"),
    PropertyDef::new("assigned", "CR_Assigned"),
    // General categories
    PropertyDef::new("c", "CR_C"),
    PropertyDef::new("cc", "CR_Cc"),
    PropertyDef::new("cf", "CR_Cf"),
    PropertyDef::new("cn", "CR_Cn"),
    PropertyDef::new("co", "CR_Co"),
    PropertyDef::new("cs", "CR_Cs"),
    PropertyDef::new("l", "CR_L"),
    PropertyDef::new("lc", "CR_LC"),
    PropertyDef::new("ll", "CR_Ll"),
    PropertyDef::new("lm", "CR_Lm"),
    PropertyDef::new("lo", "CR_Lo"),
    PropertyDef::new("lt", "CR_Lt"),
    PropertyDef::new("lu", "CR_Lu"),
    PropertyDef::new("m", "CR_M"),
    PropertyDef::new("mc", "CR_Mc"),
    PropertyDef::new("me", "CR_Me"),
    PropertyDef::new("mn", "CR_Mn"),
    PropertyDef::new("n", "CR_N"),
    PropertyDef::new("nd", "CR_Nd"),
    PropertyDef::new("nl", "CR_Nl"),
    PropertyDef::new("no", "CR_No"),
    PropertyDef::new("p", "CR_P"),
    PropertyDef::new("pc", "CR_Pc"),
    PropertyDef::new("pd", "CR_Pd"),
    PropertyDef::new("pe", "CR_Pe"),
    PropertyDef::new("pf", "CR_Pf"),
    PropertyDef::new("pi", "CR_Pi"),
    PropertyDef::new("po", "CR_Po"),
    PropertyDef::new("ps", "CR_Ps"),
    PropertyDef::new("s", "CR_S"),
    PropertyDef::new("sc", "CR_Sc"),
    PropertyDef::new("sk", "CR_Sk"),
    PropertyDef::new("sm", "CR_Sm"),
    PropertyDef::new("so", "CR_So"),
    PropertyDef::new("z", "CR_Z"),
    PropertyDef::new("zl", "CR_Zl"),
    PropertyDef::new("zp", "CR_Zp"),
    PropertyDef::new("zs", "CR_Zs"),
    // Binary properties
    PropertyDef::new("alphabetic", "CR_Alphabetic"),
    PropertyDef::new("lowercase", "CR_Lowercase"),
    PropertyDef::new("uppercase", "CR_Uppercase"),
    PropertyDef::new("white_space", "CR_White_Space"),
    PropertyDef::new("cased", "CR_Cased"),
    PropertyDef::new("case_ignorable", "CR_Case_Ignorable"),
    PropertyDef::new("changes_when_casefolded", "CR_Changes_When_Casefolded"),
    PropertyDef::new("math", "CR_Math"),
    // Scripts
    PropertyDef::new("arabic", "CR_Arabic"),
    PropertyDef::new("armenian", "CR_Armenian"),
    PropertyDef::new("common", "CR_Common"),
    PropertyDef::new("cyrillic", "CR_Cyrillic"),
    PropertyDef::new("devanagari", "CR_Devanagari"),
    PropertyDef::new("georgian", "CR_Georgian"),
    PropertyDef::new("greek", "CR_Greek"),
    PropertyDef::new("han", "CR_Han"),
    PropertyDef::new("hangul", "CR_Hangul"),
    PropertyDef::new("hebrew", "CR_Hebrew"),
    PropertyDef::new("hiragana", "CR_Hiragana"),
    PropertyDef::new("inherited", "CR_Inherited"),
    PropertyDef::new("katakana", "CR_Katakana"),
    PropertyDef::new("latin", "CR_Latin"),
    PropertyDef::new("thai", "CR_Thai"),
];

#[cfg(not(feature = "unicode-properties"))]
pub static DEFAULT_PROPERTIES: &[PropertyDef] = &[];

// === Code Range ===

/// Sorted, disjoint closed intervals stored flat as `[lo1, hi1, lo2, hi2, ..]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeRange {
    ranges: Box<[OnigCodePoint]>,
}

impl CodeRange {
    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.ranges.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, code: OnigCodePoint) -> bool {
        onig_is_in_code_range(&self.ranges, code)
    }

    pub fn as_slice(&self) -> &[OnigCodePoint] {
        &self.ranges
    }

    pub fn iter(&self) -> impl Iterator<Item = (OnigCodePoint, OnigCodePoint)> + '_ {
        self.ranges.chunks_exact(2).map(|p| (p[0], p[1]))
    }

    // Decodes bytes already checked by `validate_code_range`.
    fn decode(raw: &[u8]) -> Self {
        let ranges = raw
            .chunks_exact(4)
            .skip(2)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
            .collect();
        CodeRange { ranges }
    }
}

/// Binary search over flat `[lo, hi]` pairs.
pub fn onig_is_in_code_range(ranges: &[OnigCodePoint], code: OnigCodePoint) -> bool {
    let n = ranges.len() / 2;
    let mut low = 0usize;
    let mut high = n;
    while low < high {
        let mid = (low + high) / 2;
        if code > ranges[mid * 2 + 1] {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    low < n && code >= ranges[low * 2]
}

// Checks the `[count][n][lo hi]*n` layout and interval ordering.
fn validate_code_range(table: &str, raw: &[u8]) -> UnicodeResult<usize> {
    let ints = decode_int_array(table, raw)?;
    let (&n, pairs) = ints
        .split_first()
        .ok_or_else(|| UnicodeError::malformed(table, "missing range count"))?;
    if n < 0 || pairs.len() != n as usize * 2 {
        return Err(UnicodeError::malformed(
            table,
            format!("range count {n} does not match {} values", pairs.len()),
        ));
    }
    let mut prev_hi: Option<i32> = None;
    for pair in pairs.chunks_exact(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo < 0 || hi < lo || hi as u32 > ONIGENC_MAX_UNICODE_CODE_POINT {
            return Err(UnicodeError::malformed(
                table,
                format!("bad interval {lo:#x}..{hi:#x}"),
            ));
        }
        if prev_hi.is_some_and(|p| lo <= p) {
            return Err(UnicodeError::malformed(
                table,
                format!("interval {lo:#x}..{hi:#x} out of order"),
            ));
        }
        prev_hi = Some(hi);
    }
    Ok(n as usize)
}

// === Code Range Entry ===

/// One property: its name, raw table bytes, and the range decoded on first use.
pub struct CodeRangeEntry {
    name: &'static str,
    table: &'static str,
    raw: Box<[u8]>,
    range: OnceBox<CodeRange>,
}

impl CodeRangeEntry {
    fn load(def: &PropertyDef, source: &dyn TableSource) -> UnicodeResult<Self> {
        let raw = source.open(def.table)?;
        let n = validate_code_range(def.table, &raw)?;
        tracing::debug!(table = def.table, ranges = n, "read code range");
        Ok(CodeRangeEntry {
            name: def.name,
            table: def.table,
            raw: raw.into_owned().into_boxed_slice(),
            range: OnceBox::new(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Decoded range. Concurrent first calls may each decode; one result wins
    /// and every caller sees that one.
    pub fn range(&self) -> &CodeRange {
        self.range.get_or_init(|| {
            tracing::trace!(table = self.table, "decode code range");
            Box::new(CodeRange::decode(&self.raw))
        })
    }

    pub fn is_decoded(&self) -> bool {
        self.range.get().is_some()
    }
}

// === Property Table ===

/// All loaded properties, indexed by ctype.
pub struct PropertyTable {
    entries: Vec<CodeRangeEntry>,
    names: HashMap<Box<[u8]>, OnigCtype>,
}

impl PropertyTable {
    /// Loads the standard ctypes followed by `extra`.
    pub fn load(source: &dyn TableSource, extra: &[PropertyDef]) -> UnicodeResult<Self> {
        let mut entries = Vec::with_capacity(STANDARD_PROPERTIES.len() + extra.len());
        let mut names = HashMap::with_capacity(entries.capacity());
        for def in STANDARD_PROPERTIES.iter().chain(extra) {
            let ctype = entries.len() as OnigCtype;
            entries.push(CodeRangeEntry::load(def, source)?);
            let key: Box<[u8]> = def.name.to_ascii_lowercase().into_bytes().into_boxed_slice();
            match names.entry(key) {
                Entry::Occupied(_) => {
                    tracing::warn!(name = def.name, ctype, "duplicate property name ignored");
                }
                Entry::Vacant(slot) => {
                    slot.insert(ctype);
                }
            }
        }
        Ok(PropertyTable { entries, names })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, ctype: OnigCtype) -> UnicodeResult<&CodeRangeEntry> {
        self.entries
            .get(ctype as usize)
            .ok_or(UnicodeError::TypeBug {
                ctype,
                len: self.entries.len(),
            })
    }

    /// Port of onigenc_unicode_ctype_code_range.
    pub fn ctype_code_range(&self, ctype: OnigCtype) -> UnicodeResult<&CodeRange> {
        Ok(self.entry(ctype)?.range())
    }

    /// Port of onigenc_unicode_is_code_ctype.
    pub fn is_code_ctype(&self, code: OnigCodePoint, ctype: OnigCtype) -> UnicodeResult<bool> {
        if ctype <= ONIGENC_MAX_STD_CTYPE && code < SINGLE_BYTE_SIZE {
            return Ok(onigenc_unicode_is_code_ctype_internal(code, ctype));
        }
        Ok(self.ctype_code_range(ctype)?.contains(code))
    }

    /// Port of onigenc_unicode_property_name_to_ctype.
    ///
    /// The name is decoded with `enc`; lookup is ASCII case-insensitive.
    pub fn property_name_to_ctype(
        &self,
        enc: &dyn Encoding,
        name: &[u8],
    ) -> UnicodeResult<OnigCtype> {
        let invalid = || UnicodeError::InvalidCharPropertyName {
            name: name.to_vec(),
        };

        let mut buf = [0u8; ONIGENC_PROPERTY_NAME_MAX_SIZE];
        let mut len = 0;
        let mut p = 0;
        while p < name.len() {
            let code = enc.mbc_to_code(&name[p..]);
            if code >= 0x80 {
                return Err(invalid());
            }
            buf[len] = (code as u8).to_ascii_lowercase();
            len += 1;
            if len >= ONIGENC_PROPERTY_NAME_MAX_SIZE {
                return Err(invalid());
            }
            p += enc.mbc_enc_len(&name[p..]).max(1);
        }

        self.names.get(&buf[..len]).copied().ok_or_else(invalid)
    }
}
