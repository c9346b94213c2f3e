// Forward-only bit cursor.
//
// Reads fixed-width unsigned fields, big-endian (first bit is the most
// significant). A field that does not fit in the remaining bits is
// rejected before anything is consumed, so the cursor never passes the end.

use super::Bits;

/// Widest field `read_bits` accepts.
pub const MAX_FIELD_BITS: u32 = 32;

/// Not enough bits left to read a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bit underflow: wanted {wanted} bits, {available} available")]
pub struct BitUnderflow {
    pub wanted: u32,
    pub available: usize,
}

/// Cursor over a borrowed [`Bits`] sequence.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a Bits,
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a Bits) -> Self {
        Self { bits, pos: 0 }
    }

    /// Bits consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bits.len()
    }

    /// Read one bit, or `None` at the end.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    /// Read a `width`-bit big-endian field.
    ///
    /// On underflow the cursor is left where it was.
    pub fn read_bits(&mut self, width: u32) -> Result<u32, BitUnderflow> {
        debug_assert!(width <= MAX_FIELD_BITS);
        let available = self.remaining();
        if (width as usize) > available {
            return Err(BitUnderflow {
                wanted: width,
                available,
            });
        }
        let mut value = 0u32;
        for _ in 0..width {
            // Length checked above.
            let bit = self.bits.get(self.pos).unwrap_or(false);
            value = (value << 1) | u32::from(bit);
            self.pos += 1;
        }
        Ok(value)
    }

    /// True if every bit from the cursor to the end is zero.
    pub fn rest_is_zero(&self) -> bool {
        (self.pos..self.bits.len()).all(|i| self.bits.get(i) == Some(false))
    }

    /// Consume all remaining bits.
    pub fn skip_to_end(&mut self) {
        self.pos = self.bits.len();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
