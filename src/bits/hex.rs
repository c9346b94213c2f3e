// Hexadecimal text to bit expansion.
//
// Each hex digit becomes four bits, most-significant first, in digit order.
// Whitespace anywhere in the text (byte grouping, line breaks) is cosmetic
// and skipped. Digits are case-insensitive.

use super::Bits;

/// Error raised while expanding hex text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    /// A non-whitespace character that is not a hex digit.
    /// `position` is the character index in the original text.
    #[error("invalid hex digit {ch:?} at position {position}")]
    InvalidDigit { ch: char, position: usize },
}

/// Value of a single hex digit, or `None`.
#[inline]
pub fn digit_value(ch: char) -> Option<u8> {
    ch.to_digit(16).map(|v| v as u8)
}

/// Expand hex text into its bit sequence.
///
/// Fails on the first invalid character; no partial output is returned.
pub fn expand_hex(text: &str) -> Result<Bits, HexError> {
    let mut bytes = Vec::with_capacity(text.len() / 2 + 1);
    let mut digits = 0usize;

    for (position, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let nibble = digit_value(ch).ok_or(HexError::InvalidDigit { ch, position })?;
        if digits % 2 == 0 {
            bytes.push(nibble << 4);
        } else if let Some(last) = bytes.last_mut() {
            *last |= nibble;
        }
        digits += 1;
    }

    let mut bits = Bits::from_bytes(bytes);
    bits.len = digits * 4;
    Ok(bits)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
