// Criterion benchmark suite: case folding and ctype lookup
//
// Run: cargo bench
// With real tables: FERRONI_UNICODE_TABLES=/path/to/tables cargo bench
// Specific group: cargo bench -- fold_codes
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ferroni_unicode::encodings::utf8::ONIG_ENCODING_UTF8;
use ferroni_unicode::oniguruma::*;
use ferroni_unicode::regenc::Encoding;
use ferroni_unicode::unicode::case_fold::*;
use ferroni_unicode::unicode::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// ASCII letters, sharp s and the ffi ligature; enough to exercise every
// branch of the fold engine.
fn synthetic_source() -> MemoryTableSource {
    let folds: Vec<([OnigCodePoint; 1], [OnigCodePoint; 1])> =
        (0x41..=0x5a).map(|c| ([c], [c + 0x20])).collect();
    let mut fold: Vec<([OnigCodePoint; 1], &[OnigCodePoint])> =
        folds.iter().map(|(k, v)| (*k, &v[..])).collect();
    fold.push(([0xdf], &[0x73, 0x73][..]));
    fold.push(([0xfb03], &[0x66, 0x66, 0x69][..]));

    let unfolds: Vec<([OnigCodePoint; 1], [OnigCodePoint; 1])> =
        (0x61..=0x7a).map(|c| ([c], [c - 0x20])).collect();
    let unfold: Vec<([OnigCodePoint; 1], &[OnigCodePoint])> =
        unfolds.iter().map(|(k, v)| (*k, &v[..])).collect();

    let mut source = MemoryTableSource::new()
        .with(CASE_FOLD_TABLE, TableWriter::code_list_table(&fold))
        .with(CASE_UNFOLD_11_TABLE, TableWriter::code_list_table(&unfold))
        .with(CASE_UNFOLD_11_LOCALE_TABLE, TableWriter::code_list_table::<1>(&[]))
        .with(
            CASE_UNFOLD_12_TABLE,
            TableWriter::code_list_table(&[([0x73, 0x73], &[0xdf][..])]),
        )
        .with(CASE_UNFOLD_12_LOCALE_TABLE, TableWriter::code_list_table::<2>(&[]))
        .with(
            CASE_UNFOLD_13_TABLE,
            TableWriter::code_list_table(&[([0x66, 0x66, 0x69], &[0xfb03][..])]),
        )
        .with(CASE_MAPPING_SPECIALS_TABLE, TableWriter::specials(&[]));
    for def in STANDARD_PROPERTIES.iter() {
        source.insert(
            def.table,
            TableWriter::code_range(&[(0x41, 0x5a), (0x61, 0x7a), (0x391, 0x3a1), (0x3a3, 0x3f5)]),
        );
    }
    source
}

fn load_tables() -> UnicodeTables {
    match DirTableSource::from_env() {
        Some(source) => UnicodeTables::load(&source).expect("failed to load FERRONI_UNICODE_TABLES"),
        None => UnicodeTables::load_with(&synthetic_source(), &[]).expect("synthetic tables"),
    }
}

const TEXTS: &[(&str, &str)] = &[
    ("ascii", "The Quick Brown Fox Jumps Over The Lazy Dog"),
    ("sharp_s", "STRASSE Straße strasse"),
    ("ligature", "ﬃ ffi FFI office"),
    ("greek", "ΑΒΓΔ αβγδ"),
];

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_mbc_case_fold(c: &mut Criterion) {
    let tables = load_tables();
    let enc = UnicodeEncoding::new(&ONIG_ENCODING_UTF8, &tables);
    let mut group = c.benchmark_group("mbc_case_fold");
    for (name, text) in TEXTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text.as_bytes(), |b, text| {
            b.iter(|| black_box(enc.case_fold_str(ONIGENC_CASE_FOLD_DEFAULT, black_box(text))));
        });
    }
    group.finish();
}

fn bench_fold_codes(c: &mut Criterion) {
    let tables = load_tables();
    let enc = UnicodeEncoding::new(&ONIG_ENCODING_UTF8, &tables);
    let mut group = c.benchmark_group("fold_codes");
    for (name, text) in TEXTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text.as_bytes(), |b, text| {
            b.iter(|| {
                let mut items = [OnigCaseFoldCodeItem::default(); ONIGENC_GET_CASE_FOLD_CODES_MAX_NUM];
                let mut total = 0;
                let mut p = 0;
                while p < text.len() {
                    total += enc.get_case_fold_codes_by_str(
                        ONIGENC_CASE_FOLD_DEFAULT,
                        text,
                        p,
                        text.len(),
                        &mut items,
                    );
                    p += ONIG_ENCODING_UTF8.mbc_enc_len(&text[p..]);
                }
                black_box(total)
            });
        });
    }
    group.finish();
}

fn bench_apply_all_case_fold(c: &mut Criterion) {
    let tables = load_tables();
    c.bench_function("apply_all_case_fold", |b| {
        b.iter(|| {
            let mut n = 0usize;
            onigenc_unicode_apply_all_case_fold::<(), _>(&tables, ONIGENC_CASE_FOLD_DEFAULT, |from, to| {
                n += from as usize + to.len();
                Ok(())
            })
            .ok();
            black_box(n)
        });
    });
}

fn bench_is_code_ctype(c: &mut Criterion) {
    let tables = load_tables();
    let mut group = c.benchmark_group("is_code_ctype");
    group.bench_function("latin1_fast_path", |b| {
        b.iter(|| {
            (0..256u32)
                .filter(|&code| onigenc_unicode_is_code_ctype(&tables, black_box(code), ONIGENC_CTYPE_ALPHA).unwrap_or(false))
                .count()
        });
    });
    group.bench_function("range_search", |b| {
        b.iter(|| {
            (0x370..0x470u32)
                .filter(|&code| onigenc_unicode_is_code_ctype(&tables, black_box(code), ONIGENC_CTYPE_ALPHA).unwrap_or(false))
                .count()
        });
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion harness
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_mbc_case_fold,
    bench_fold_codes,
    bench_apply_all_case_fold,
    bench_is_code_ctype,
);
criterion_main!(benches);
