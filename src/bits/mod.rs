// Bit-level input handling.
//
// - `Bits`   — packed, read-only bit sequence (MSB first within each byte)
// - `hex`    — hexadecimal text to bit expansion
// - `reader` — forward-only cursor reading fixed-width big-endian fields

pub mod hex;
pub mod reader;

pub use hex::{HexError, expand_hex};
pub use reader::{BitReader, BitUnderflow};

use std::fmt;

// ---------------------------------------------------------------------------
// Bits
// ---------------------------------------------------------------------------

/// An ordered, indexable sequence of bits.
///
/// Bits are packed eight to a byte, most-significant bit first. The bit
/// length is tracked separately so sequences that do not end on a byte
/// boundary (odd hex digit counts) are represented exactly. Padding bits
/// in the last byte are always zero.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bits {
    bytes: Vec<u8>,
    len: usize,
}

impl Bits {
    /// Empty bit sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty bit sequence with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// View raw bytes as a bit sequence of `8 * bytes.len()` bits.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let len = bytes.len() * 8;
        Self { bytes, len }
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        let shift = self.len % 8;
        if shift == 0 {
            self.bytes.push(0);
        }
        if bit {
            // `bytes` is non-empty: a byte was pushed above when needed.
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> shift;
        }
        self.len += 1;
    }

    /// Append the low `width` bits of `value`, most-significant first.
    pub fn push_bits(&mut self, value: u32, width: u32) {
        for i in (0..width).rev() {
            self.push((value >> i) & 1 != 0);
        }
    }

    /// Underlying packed bytes (last byte zero-padded).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }

    /// Render as a string of `'0'`/`'1'` characters.
    pub fn to_bit_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bits = Bits::with_capacity(iter.size_hint().0);
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({}: {self})", self.len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
