//! Per-record string dictionary.
//!
//! Every name record carries a symbol table at the head of its body. The
//! table deduplicates strings that repeat across fields: a compressed
//! string is either a one-byte reference into the table (high bit set,
//! seven-bit index) or an inline literal (`{u8 len <= 0x7f}{bytes}`).
//!
//! Encoding runs in two phases. The learn phase walks every string the
//! record will serialize and [`Compressor::add`]s it; the emit phase then
//! writes the table followed by references or literals. The
//! [`Decompressor`] reads the table once and resolves references for the
//! rest of the decode.

use std::collections::HashMap;

use bytes::{Buf, BufMut};

use crate::errors::CodecError;
use crate::wire;

/// The reference byte has a seven-bit index.
pub const MAX_SYMBOLS: usize = 128;
/// The literal length byte must keep its high bit clear.
pub const MAX_STRING: usize = 0x7f;

#[derive(Debug, Default)]
pub struct Compressor {
    words: Vec<String>,
    map: HashMap<String, u8>,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns a string. Duplicates, empty strings, and strings too long to
    /// reference are ignored; once the table is full further strings are
    /// emitted as literals.
    pub fn add(&mut self, word: &str) {
        if word.is_empty() || word.len() > MAX_STRING {
            return;
        }
        if self.map.contains_key(word) {
            return;
        }
        if self.words.len() == MAX_SYMBOLS {
            return;
        }
        self.map.insert(word.to_string(), self.words.len() as u8);
        self.words.push(word.to_string());
    }

    /// Number of bytes [`Compressor::write_string`] will emit for `word`.
    pub fn size(&self, word: &str) -> usize {
        if self.map.contains_key(word) {
            1
        } else {
            1 + word.len()
        }
    }

    /// Byte size of the emitted symbol table.
    pub fn table_size(&self) -> usize {
        let mut size = 1;
        for word in &self.words {
            size += 1 + word.len();
        }
        size
    }

    pub fn write_table(&self, bw: &mut Vec<u8>) {
        bw.put_u8(self.words.len() as u8);
        for word in &self.words {
            bw.put_u8(word.len() as u8);
            bw.put_slice(word.as_bytes());
        }
    }

    pub fn write_string(&self, bw: &mut Vec<u8>, word: &str) -> Result<(), CodecError> {
        if let Some(&index) = self.map.get(word) {
            bw.put_u8(0x80 | index);
            return Ok(());
        }
        if word.len() > MAX_STRING {
            return Err(CodecError::StringTooLong {
                len: word.len(),
                max: MAX_STRING,
            });
        }
        bw.put_u8(word.len() as u8);
        bw.put_slice(word.as_bytes());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Decompressor {
    words: Vec<String>,
}

impl Decompressor {
    /// Reads the symbol table from the head of a record body.
    pub fn read<B: Buf>(br: &mut B) -> Result<Self, CodecError> {
        let count = wire::read_u8(br)?;
        let mut words = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let len = wire::read_u8(br)?;
            let bytes = wire::read_bytes(br, len as usize)?;
            words.push(String::from_utf8(bytes).map_err(|_| CodecError::InvalidString)?);
        }
        Ok(Self { words })
    }

    pub fn read_string<B: Buf>(&self, br: &mut B) -> Result<String, CodecError> {
        let head = wire::read_u8(br)?;
        if head & 0x80 != 0 {
            let index = head & 0x7f;
            return self
                .words
                .get(index as usize)
                .cloned()
                .ok_or(CodecError::BadSymbolReference(index));
        }
        let bytes = wire::read_bytes(br, head as usize)?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidString)
    }
}
