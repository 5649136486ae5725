// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical binary encoding of signed payloads.
//!
//! The encoding is deliberately tiny: unsigned LEB128 varints, fixed-width
//! little-endian integers, single-byte booleans and varint-length-prefixed
//! UTF-8 strings. There are no maps, so encoding the same values twice always
//! yields the same bytes.

/// Types that can write themselves into a [`TransactionEncoder`].
pub trait Encode {
    fn encode(&self, enc: &mut TransactionEncoder);
}

/// Append-only byte writer for canonical transaction encoding.
#[derive(Debug, Default, Clone)]
pub struct TransactionEncoder {
    buf: Vec<u8>,
}

impl TransactionEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing prefix (e.g. the raw chain id).
    pub fn with_prefix(prefix: &[u8]) -> Self {
        Self {
            buf: prefix.to_vec(),
        }
    }

    pub fn encode_uvarint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    pub fn encode_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn encode_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn encode_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn encode_str(&mut self, value: &str) {
        self.encode_uvarint(value.len() as u64);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) {
        value.encode(self);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(self);
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(self);
    }
}

impl Encode for u16 {
    fn encode(&self, enc: &mut TransactionEncoder) {
        enc.encode_u16(*self);
    }
}

impl Encode for u32 {
    fn encode(&self, enc: &mut TransactionEncoder) {
        enc.encode_u32(*self);
    }
}

impl Encode for bool {
    fn encode(&self, enc: &mut TransactionEncoder) {
        enc.encode_bool(*self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(value: u64) -> String {
        let mut enc = TransactionEncoder::new();
        enc.encode_uvarint(value);
        hex::encode(enc.as_bytes())
    }

    #[test]
    fn uvarint_uses_leb128() {
        assert_eq!(varint(0), "00");
        assert_eq!(varint(1), "01");
        assert_eq!(varint(127), "7f");
        assert_eq!(varint(128), "8001");
        assert_eq!(varint(300), "ac02");
    }

    #[test]
    fn integers_are_little_endian() {
        let mut enc = TransactionEncoder::new();
        enc.encode(&16u16);
        enc.encode(&1234u32);
        assert_eq!(hex::encode(enc.as_bytes()), "1000d2040000");
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut enc = TransactionEncoder::new();
        enc.encode("acc1");
        enc.encode(&String::new());
        assert_eq!(hex::encode(enc.as_bytes()), "046163633100");
    }

    #[test]
    fn multibyte_strings_prefix_byte_length() {
        let mut enc = TransactionEncoder::new();
        enc.encode("ü");
        assert_eq!(enc.into_bytes(), vec![2, 0xc3, 0xbc]);
    }

    #[test]
    fn booleans_are_single_bytes() {
        let mut enc = TransactionEncoder::with_prefix(&[0xff]);
        enc.encode(&true);
        enc.encode(&false);
        assert_eq!(enc.into_bytes(), vec![0xff, 1, 0]);
    }
}
