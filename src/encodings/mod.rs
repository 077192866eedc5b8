// encodings/mod.rs - Encoding registry
// Concrete codecs the Unicode layer can be driven with.

pub mod utf8;

pub use utf8::ONIG_ENCODING_UTF8;
