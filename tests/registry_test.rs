// registry_test.rs - Process-wide table registry
//
// The registry is a process-wide singleton, so the whole lifecycle runs in a
// single test.

mod common;

use ferroni_unicode::error::UnicodeError;
use ferroni_unicode::prelude::*;

#[test]
fn registry_lifecycle() {
    assert!(matches!(unicode_tables(), Err(UnicodeError::NotInitialized)));
    assert!(matches!(UnicodeEncoding::utf8(), Err(UnicodeError::NotInitialized)));

    let installed = match install_unicode_tables(common::tables()) {
        Ok(tables) => tables,
        Err(_) => panic!("registry already initialized"),
    };
    assert!(std::ptr::eq(installed, unicode_tables().unwrap()));

    // A second install hands the tables back.
    assert!(install_unicode_tables(common::tables()).is_err());

    // Init after install returns the installed tables without reading the source.
    let empty = MemoryTableSource::new();
    assert!(std::ptr::eq(init_unicode_tables(&empty).unwrap(), installed));

    let enc = UnicodeEncoding::utf8().unwrap();
    assert_eq!(enc.encoding().name(), "UTF-8");
    assert_eq!(enc.case_fold_str(ONIGENC_CASE_FOLD_DEFAULT, b"ABC"), b"abc");

    let greek = enc.property_name_to_ctype(b"Greek").unwrap();
    assert!(enc.is_code_ctype(0x3b1, greek).unwrap());

    let codes = enc.case_fold_codes(ONIGENC_CASE_FOLD_DEFAULT, b"k", 0, 1);
    assert_eq!(codes.len(), 2);

    let mut pairs = 0;
    enc.apply_all_case_fold::<(), _>(ONIGENC_CASE_FOLD_DEFAULT, |_, _| {
        pairs += 1;
        Ok(())
    })
    .unwrap();
    assert!(pairs > 0);

    // Shared across threads.
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let enc = UnicodeEncoding::utf8().unwrap();
                let folded = enc.case_fold(ONIGENC_CASE_FOLD_DEFAULT, "ß".as_bytes(), 0, 2);
                assert_eq!(folded.bytes.as_slice(), b"ss");
            });
        }
    });
}
