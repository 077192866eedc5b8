// unicode/loader.rs - Binary table loader
//
// Every table is a stream of big-endian int32 words. Scalar tables are
// `[count][count x int32]`; CodeList tables are `[count]` followed by
// `count` entries of `{key codes.., header, header & MASK codes}`.
// The transport that produces the bytes is pluggable through `TableSource`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{UnicodeError, UnicodeResult};
use crate::oniguruma::*;

/// Environment variable naming the directory of `<name>.bin` tables.
pub const TABLES_DIR_ENV: &str = "FERRONI_UNICODE_TABLES";

/// Where compiled tables come from.
pub trait TableSource: Send + Sync {
    /// Returns the raw bytes of the named table.
    fn open(&self, name: &str) -> UnicodeResult<Cow<'_, [u8]>>;
}

// === Directory source ===

/// Reads `<dir>/<name>.bin` from the filesystem.
#[derive(Clone, Debug)]
pub struct DirTableSource {
    dir: PathBuf,
}

impl DirTableSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirTableSource { dir: dir.into() }
    }

    /// Source configured by `FERRONI_UNICODE_TABLES`, if set.
    pub fn from_env() -> Option<Self> {
        env::var_os(TABLES_DIR_ENV).map(DirTableSource::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.bin"))
    }
}

impl TableSource for DirTableSource {
    fn open(&self, name: &str) -> UnicodeResult<Cow<'_, [u8]>> {
        let path = self.table_path(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(UnicodeError::MissingTable {
                table: name.to_string(),
            }),
            Err(source) => Err(UnicodeError::TableIo {
                table: name.to_string(),
                source,
            }),
        }
    }
}

// === In-memory source ===

/// Tables held in memory, e.g. embedded with `include_bytes!` or built with
/// `TableWriter`.
#[derive(Clone, Debug, Default)]
pub struct MemoryTableSource {
    tables: HashMap<String, Cow<'static, [u8]>>,
}

impl MemoryTableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        self.tables.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Cow<'static, [u8]>> {
        self.tables.remove(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableSource for MemoryTableSource {
    fn open(&self, name: &str) -> UnicodeResult<Cow<'_, [u8]>> {
        self.tables
            .get(name)
            .map(|bytes| Cow::Borrowed(bytes.as_ref()))
            .ok_or_else(|| UnicodeError::MissingTable {
                table: name.to_string(),
            })
    }
}

// === Int stream ===

/// Sequential big-endian int32 reader over one table.
pub struct IntReader<'a> {
    table: &'a str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> IntReader<'a> {
    pub fn new(table: &'a str, data: &'a [u8]) -> Self {
        IntReader { table, data, pos: 0 }
    }

    pub fn table(&self) -> &'a str {
        self.table
    }

    pub fn read_i32(&mut self) -> UnicodeResult<i32> {
        let end = self.pos + 4;
        let word = self.data.get(self.pos..end).ok_or_else(|| {
            UnicodeError::malformed(self.table, format!("truncated at byte {}", self.pos))
        })?;
        self.pos = end;
        Ok(i32::from_be_bytes([word[0], word[1], word[2], word[3]]))
    }

    /// Reads an element count; negative counts are malformed.
    pub fn read_count(&mut self) -> UnicodeResult<usize> {
        let n = self.read_i32()?;
        usize::try_from(n)
            .map_err(|_| UnicodeError::malformed(self.table, format!("negative count {n}")))
    }

    /// Reads one code point, checked against the Unicode range.
    pub fn read_code(&mut self) -> UnicodeResult<OnigCodePoint> {
        let n = self.read_i32()?;
        match u32::try_from(n) {
            Ok(code) if code <= ONIGENC_MAX_UNICODE_CODE_POINT => Ok(code),
            _ => Err(UnicodeError::malformed(
                self.table,
                format!("code point {n:#x} out of range"),
            )),
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(self) -> UnicodeResult<()> {
        if self.pos == self.data.len() {
            Ok(())
        } else {
            Err(UnicodeError::malformed(
                self.table,
                format!("{} trailing bytes", self.data.len() - self.pos),
            ))
        }
    }
}

/// Reads a scalar `[count][count x int32]` table.
pub fn read_int_array(source: &dyn TableSource, name: &str) -> UnicodeResult<Vec<i32>> {
    let bytes = source.open(name)?;
    let ints = decode_int_array(name, &bytes)?;
    tracing::debug!(table = name, len = ints.len(), "read int array");
    Ok(ints)
}

pub(crate) fn decode_int_array(name: &str, bytes: &[u8]) -> UnicodeResult<Vec<i32>> {
    let mut reader = IntReader::new(name, bytes);
    let count = reader.read_count()?;
    if count > reader.remaining() / 4 {
        return Err(UnicodeError::malformed(
            name,
            format!("count {count} exceeds payload"),
        ));
    }
    let mut ints = Vec::with_capacity(count);
    for _ in 0..count {
        ints.push(reader.read_i32()?);
    }
    reader.finish()?;
    Ok(ints)
}

// === Writer ===

/// Serializes tables in the loader's binary layout.
#[derive(Clone, Debug, Default)]
pub struct TableWriter {
    buf: Vec<u8>,
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn push_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Appends one CodeList: packed header followed by the codes.
    pub fn push_code_list(&mut self, codes: &[OnigCodePoint], flags: u32) -> &mut Self {
        debug_assert!(codes.len() as u32 <= ONIGENC_CODE_POINT_MASK);
        self.push_u32((flags & !ONIGENC_CODE_POINT_MASK) | codes.len() as u32);
        for &code in codes {
            self.push_u32(code);
        }
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// `[count][ints..]`
    pub fn int_array(ints: &[i32]) -> Vec<u8> {
        let mut w = TableWriter::new();
        w.push_i32(ints.len() as i32);
        for &v in ints {
            w.push_i32(v);
        }
        w.into_bytes()
    }

    /// A code range table: an int array holding `[n, lo1, hi1, ..]`.
    pub fn code_range(ranges: &[(OnigCodePoint, OnigCodePoint)]) -> Vec<u8> {
        let mut ints = Vec::with_capacity(ranges.len() * 2 + 1);
        ints.push(ranges.len() as i32);
        for &(lo, hi) in ranges {
            ints.push(lo as i32);
            ints.push(hi as i32);
        }
        Self::int_array(&ints)
    }

    /// A keyed CodeList table with `K` key codes per entry.
    pub fn code_list_table<const K: usize>(
        entries: &[([OnigCodePoint; K], &[OnigCodePoint])],
    ) -> Vec<u8> {
        let mut w = TableWriter::new();
        w.push_i32(entries.len() as i32);
        for (key, codes) in entries {
            for &k in key {
                w.push_u32(k);
            }
            w.push_code_list(codes, 0);
        }
        w.into_bytes()
    }

    /// The case mapping specials table; the count covers every word.
    pub fn specials(records: &[&[OnigCodePoint]]) -> Vec<u8> {
        let words: usize = records.iter().map(|r| r.len()).sum();
        let mut w = TableWriter::new();
        w.push_i32(words as i32);
        for record in records {
            let Some((first, rest)) = record.split_first() else {
                continue;
            };
            w.push_u32(((record.len() as u32) << ONIGENC_SPECIALS_LENGTH_OFFSET) | first);
            for &code in rest {
                w.push_u32(code);
            }
        }
        w.into_bytes()
    }
}
