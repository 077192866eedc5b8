// common/mod.rs - Shared fixtures for the integration tests
//
// A small but realistic slice of the Unicode tables, serialized with
// TableWriter so the loader runs on every test.

#![allow(dead_code)]

use ferroni_unicode::encodings::utf8::ONIG_ENCODING_UTF8;
use ferroni_unicode::oniguruma::*;
use ferroni_unicode::regenc::Encoding;
use ferroni_unicode::unicode::case_fold::*;
use ferroni_unicode::unicode::{MemoryTableSource, PropertyDef, TableWriter, UnicodeTables};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Properties loaded after the standard ctypes (ctypes 15, 16 and 17).
pub static FIXTURE_PROPERTIES: &[PropertyDef] = &[
    PropertyDef::new("any", "CR_Any"),
    PropertyDef::new("greek", "CR_Greek"),
    PropertyDef::new("hiragana", "CR_Hiragana"),
];

pub fn code_ranges() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("CR_NEWLINE", TableWriter::code_range(&[(0x0a, 0x0a)])),
        // Leaves out A-Z so the single-byte fast path is observable.
        (
            "CR_Alpha",
            TableWriter::code_range(&[(0x61, 0x7a), (0xaa, 0xaa), (0x391, 0x3a1), (0x3a3, 0x3f5)]),
        ),
        (
            "CR_Blank",
            TableWriter::code_range(&[(0x09, 0x09), (0x20, 0x20), (0xa0, 0xa0), (0x1680, 0x1680), (0x2000, 0x200a)]),
        ),
        ("CR_Cntrl", TableWriter::code_range(&[(0x00, 0x1f), (0x7f, 0x9f)])),
        ("CR_Digit", TableWriter::code_range(&[(0x30, 0x39), (0x660, 0x669)])),
        ("CR_Graph", TableWriter::code_range(&[(0x21, 0x7e), (0xa1, 0x377)])),
        ("CR_Lower", TableWriter::code_range(&[(0x61, 0x7a), (0x3b1, 0x3c9)])),
        ("CR_Print", TableWriter::code_range(&[(0x20, 0x7e), (0xa0, 0x377)])),
        ("CR_Punct", TableWriter::code_range(&[(0x21, 0x23), (0x25, 0x2a)])),
        (
            "CR_Space",
            TableWriter::code_range(&[(0x09, 0x0d), (0x20, 0x20), (0x2028, 0x2029)]),
        ),
        ("CR_Upper", TableWriter::code_range(&[(0x41, 0x5a), (0x391, 0x3a1)])),
        (
            "CR_XDigit",
            TableWriter::code_range(&[(0x30, 0x39), (0x41, 0x46), (0x61, 0x66)]),
        ),
        (
            "CR_Word",
            TableWriter::code_range(&[(0x30, 0x39), (0x41, 0x5a), (0x5f, 0x5f), (0x61, 0x7a), (0x391, 0x3a1)]),
        ),
        (
            "CR_Alnum",
            TableWriter::code_range(&[(0x30, 0x39), (0x41, 0x5a), (0x61, 0x7a)]),
        ),
        ("CR_ASCII", TableWriter::code_range(&[(0x00, 0x7f)])),
        ("CR_Any", TableWriter::code_range(&[(0x00, 0x10ffff)])),
        (
            "CR_Greek",
            TableWriter::code_range(&[(0x370, 0x373), (0x375, 0x377), (0x37a, 0x37d), (0x391, 0x3a1), (0x3a3, 0x3e1)]),
        ),
        (
            "CR_Hiragana",
            TableWriter::code_range(&[(0x3041, 0x3096), (0x309d, 0x309f)]),
        ),
    ]
}

pub fn case_fold() -> Vec<u8> {
    let mut entries: Vec<([OnigCodePoint; 1], &[OnigCodePoint])> = Vec::new();
    let upper: Vec<[OnigCodePoint; 1]> = (0x41..=0x5a).map(|c| [c + 0x20]).collect();
    for (i, to) in upper.iter().enumerate() {
        entries.push(([0x41 + i as OnigCodePoint], &to[..]));
    }
    entries.extend_from_slice(&[
        ([0xb5], &[0x3bc][..]),
        ([0xdf], &[0x73, 0x73][..]),
        ([0x130], &[0x69, 0x307][..]),
        ([0x17f], &[0x73][..]),
        ([0x391], &[0x3b1][..]),
        ([0x39c], &[0x3bc][..]),
        ([0x3a3], &[0x3c3][..]),
        ([0x3c2], &[0x3c3][..]),
        ([0x1e9e], &[0x73, 0x73][..]),
        ([0x212a], &[0x6b][..]),
        ([0xfb00], &[0x66, 0x66][..]),
        ([0xfb03], &[0x66, 0x66, 0x69][..]),
    ]);
    TableWriter::code_list_table(&entries)
}

pub fn case_unfold_11() -> Vec<u8> {
    let mut entries: Vec<([OnigCodePoint; 1], Vec<OnigCodePoint>)> = Vec::new();
    for lower in 0x61..=0x7a {
        let upper = lower - 0x20;
        match lower {
            // Only in the locale table.
            0x69 => continue,
            0x6b => entries.push(([lower], vec![upper, 0x212a])),
            0x73 => entries.push(([lower], vec![upper, 0x17f])),
            _ => entries.push(([lower], vec![upper])),
        }
    }
    entries.push(([0x3b1], vec![0x391]));
    entries.push(([0x3bc], vec![0xb5, 0x39c]));
    entries.push(([0x3c3], vec![0x3a3, 0x3c2]));
    let borrowed: Vec<([OnigCodePoint; 1], &[OnigCodePoint])> =
        entries.iter().map(|(k, v)| (*k, v.as_slice())).collect();
    TableWriter::code_list_table(&borrowed)
}

pub fn source() -> MemoryTableSource {
    let mut source = MemoryTableSource::new()
        .with(CASE_FOLD_TABLE, case_fold())
        .with(CASE_UNFOLD_11_TABLE, case_unfold_11())
        .with(
            CASE_UNFOLD_11_LOCALE_TABLE,
            TableWriter::code_list_table(&[([0x69], &[0x49][..])]),
        )
        .with(
            CASE_UNFOLD_12_TABLE,
            TableWriter::code_list_table(&[
                ([0x66, 0x66], &[0xfb00][..]),
                ([0x73, 0x73], &[0xdf, 0x1e9e][..]),
            ]),
        )
        .with(
            CASE_UNFOLD_12_LOCALE_TABLE,
            TableWriter::code_list_table(&[([0x69, 0x307], &[0x130][..])]),
        )
        .with(
            CASE_UNFOLD_13_TABLE,
            TableWriter::code_list_table(&[([0x66, 0x66, 0x69], &[0xfb03][..])]),
        )
        .with(
            CASE_MAPPING_SPECIALS_TABLE,
            TableWriter::specials(&[&[0x53, 0x73], &[0x130, 0x69, 0x307]]),
        );
    for (name, bytes) in code_ranges() {
        source.insert(name, bytes);
    }
    source
}

pub fn tables() -> UnicodeTables {
    init_tracing();
    UnicodeTables::load_with(&source(), FIXTURE_PROPERTIES).unwrap()
}

pub fn utf8() -> &'static dyn Encoding {
    &ONIG_ENCODING_UTF8
}

pub fn encode(codes: &[OnigCodePoint]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; ONIGENC_CODE_TO_MBC_MAXLEN];
    for &c in codes {
        let n = ONIG_ENCODING_UTF8.code_to_mbc(c, &mut buf);
        out.extend_from_slice(&buf[..n]);
    }
    out
}
