// regenc.rs - Port of the regenc.h encoding interface
// Encoding trait (the byte <-> code point half of OnigEncodingType) and
// shared encoding helpers used by the Unicode layer.

use crate::oniguruma::*;

// === Constants ===
pub const SINGLE_BYTE_SIZE: OnigCodePoint = 256;

// === Encoding Trait ===
// The Unicode layer needs nothing from an encoding beyond decoding and
// encoding single characters. Callers pass the subslice starting at the
// character; implementations never read past its end.
pub trait Encoding: Send + Sync {
    /// Returns the byte length of the multibyte character at the start of p.
    fn mbc_enc_len(&self, p: &[u8]) -> usize;

    /// Encoding name (e.g. "UTF-8")
    fn name(&self) -> &str;

    /// Maximum encoded character length in bytes
    fn max_enc_len(&self) -> usize;

    /// Minimum encoded character length in bytes
    fn min_enc_len(&self) -> usize;

    /// Decode the multibyte character at the start of p to a code point
    fn mbc_to_code(&self, p: &[u8]) -> OnigCodePoint;

    /// Returns the byte length needed to encode a code point
    fn code_to_mbclen(&self, code: OnigCodePoint) -> usize;

    /// Encode a code point into buf, returns number of bytes written.
    /// `buf` must hold `code_to_mbclen(code)` bytes. A code above
    /// `ONIGENC_MAX_UNICODE_CODE_POINT` writes nothing and returns 0.
    fn code_to_mbc(&self, code: OnigCodePoint, buf: &mut [u8]) -> usize;
}

// === Character stepping ===

/// Byte length of the character at pos, clamped to end.
#[inline]
pub fn onigenc_mbc_enc_len_at(enc: &dyn Encoding, data: &[u8], pos: usize, end: usize) -> usize {
    enc.mbc_enc_len(&data[pos..end]).min(end - pos)
}

/// Decode the character at pos without reading past end.
#[inline]
pub fn onigenc_mbc_to_code_at(
    enc: &dyn Encoding,
    data: &[u8],
    pos: usize,
    end: usize,
) -> OnigCodePoint {
    enc.mbc_to_code(&data[pos..end])
}

// === Ctype bit helpers (from regenc.h) ===

// Bit of `ctype` in the single-byte ctype table.
#[inline]
pub fn ctype_to_bit(ctype: OnigCtype) -> u32 {
    1 << ctype
}
