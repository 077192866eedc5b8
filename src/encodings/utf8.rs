// encodings/utf8.rs - Port of utf8.c (code point conversion only)
// UTF-8 encoding implementation (RFC 3629 range: U+0000 - U+10FFFF).

use crate::oniguruma::*;
use crate::regenc::*;

// === EncLen_UTF8 Table ===
// Maps first byte to character length (RFC 3629: max 4 bytes).

static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

// === UTF-8 Encoding Struct ===

pub struct Utf8Encoding;

pub static ONIG_ENCODING_UTF8: Utf8Encoding = Utf8Encoding;

impl Encoding for Utf8Encoding {
    fn mbc_enc_len(&self, p: &[u8]) -> usize {
        ENC_LEN_UTF8[p[0] as usize] as usize
    }

    fn name(&self) -> &str {
        "UTF-8"
    }

    fn max_enc_len(&self) -> usize {
        4
    }

    fn min_enc_len(&self) -> usize {
        1
    }

    fn mbc_to_code(&self, p: &[u8]) -> OnigCodePoint {
        let len = (ENC_LEN_UTF8[p[0] as usize] as usize).min(p.len());

        let c = p[0] as u32;
        if len > 1 {
            let remaining = len - 1;
            let mut n = c & ((1u32 << (6 - remaining)) - 1);
            for &b in &p[1..len] {
                n = (n << 6) | ((b as u32) & 0x3f);
            }
            n
        } else {
            c
        }
    }

    fn code_to_mbclen(&self, code: OnigCodePoint) -> usize {
        if (code & 0xffffff80) == 0 {
            1
        } else if (code & 0xfffff800) == 0 {
            2
        } else if (code & 0xffff0000) == 0 {
            3
        } else {
            4
        }
    }

    fn code_to_mbc(&self, code: OnigCodePoint, buf: &mut [u8]) -> usize {
        if code > ONIGENC_MAX_UNICODE_CODE_POINT {
            return 0;
        }
        if (code & 0xffffff80) == 0 {
            buf[0] = code as u8;
            1
        } else {
            let mut i = 0;
            if (code & 0xfffff800) == 0 {
                buf[i] = ((code >> 6) & 0x1f) as u8 | 0xc0;
                i += 1;
            } else if (code & 0xffff0000) == 0 {
                buf[i] = ((code >> 12) & 0x0f) as u8 | 0xe0;
                i += 1;
                buf[i] = ((code >> 6) & 0x3f) as u8 | 0x80;
                i += 1;
            } else {
                buf[i] = ((code >> 18) & 0x07) as u8 | 0xf0;
                i += 1;
                buf[i] = ((code >> 12) & 0x3f) as u8 | 0x80;
                i += 1;
                buf[i] = ((code >> 6) & 0x3f) as u8 | 0x80;
                i += 1;
            }
            buf[i] = (code & 0x3f) as u8 | 0x80;
            i + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(code: OnigCodePoint) -> Vec<u8> {
        let mut buf = [0u8; ONIGENC_CODE_TO_MBC_MAXLEN];
        let n = ONIG_ENCODING_UTF8.code_to_mbc(code, &mut buf);
        buf[..n].to_vec()
    }

    #[test]
    fn encodes_like_std() {
        for c in ['a', 'ß', 'ı', '\u{212a}', '\u{1f600}'] {
            let mut expect = [0u8; 4];
            assert_eq!(encode(c as u32), c.encode_utf8(&mut expect).as_bytes());
            assert_eq!(ONIG_ENCODING_UTF8.code_to_mbclen(c as u32), c.len_utf8());
        }
    }

    #[test]
    fn code_space_boundary() {
        assert_eq!(encode(0x10ffff), [0xf4, 0x8f, 0xbf, 0xbf]);
        assert_eq!(encode(0x10000), [0xf0, 0x90, 0x80, 0x80]);
        // Beyond U+10FFFF nothing is written.
        let mut buf = [0xaau8; ONIGENC_CODE_TO_MBC_MAXLEN];
        assert_eq!(ONIG_ENCODING_UTF8.code_to_mbc(0x110000, &mut buf), 0);
        assert_eq!(ONIG_ENCODING_UTF8.code_to_mbc(u32::MAX, &mut buf), 0);
        assert!(buf.iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn decodes_like_std() {
        let s = "Aß\u{130}\u{fb03}\u{10400}";
        let bytes = s.as_bytes();
        let mut p = 0;
        for c in s.chars() {
            assert_eq!(ONIG_ENCODING_UTF8.mbc_enc_len(&bytes[p..]), c.len_utf8());
            assert_eq!(ONIG_ENCODING_UTF8.mbc_to_code(&bytes[p..]), c as u32);
            p += c.len_utf8();
        }
    }

    #[test]
    fn truncated_sequence_returns_lead_byte() {
        // 0xc4 announces two bytes; only the lead byte is there.
        assert_eq!(ONIG_ENCODING_UTF8.mbc_to_code(&[0xc4]), 0xc4);
    }
}
