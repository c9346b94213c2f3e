// LZSS token decoder.
//
// Reads a mode flag, then a flag-dependent payload, until a terminator,
// a token cut short by the end of input, or a clean end of input before
// the next flag. Each step consumes at least one bit, so decoding always
// terminates. Tokens are produced lazily through `Iterator`.

use log::{debug, trace, warn};

use super::format::{
    END_OF_STREAM_INDEX, HISTORY_INDEX_BITS, LITERAL_BITS, MATCH_LENGTH_BITS, MIN_MATCH_LENGTH,
};
use super::token::{Token, render_trace};
use crate::bits::{BitReader, BitUnderflow, Bits, HexError, expand_hex};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Field that was cut short by the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Literal,
    Index,
    Length,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Literal => "literal",
            Field::Index => "index",
            Field::Length => "length",
        }
    }
}

/// How decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A terminator was read (possibly with its trailing zeros cut off).
    EndOfStream,
    /// A token was cut short; a `Truncated` token was emitted.
    Truncated(Field),
    /// Input ran out before a mode flag. No token was emitted.
    EndOfInput,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::EndOfStream => "end_of_stream",
            Termination::Truncated(_) => "truncated",
            Termination::EndOfInput => "end_of_input",
        }
    }
}

/// Counters collected while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub literals: usize,
    pub back_references: usize,
    /// Bits consumed (final cursor position).
    pub bits_consumed: usize,
    /// Length of the input bit sequence.
    pub total_bits: usize,
    /// `None` while decoding is still in progress.
    pub termination: Option<Termination>,
}

// ---------------------------------------------------------------------------
// TokenDecoder
// ---------------------------------------------------------------------------

/// Lazy decoder over a borrowed bit sequence.
///
/// Yields tokens in stream order; after `EndOfStream`, `Truncated`, or the
/// end of input, it yields `None` forever.
pub struct TokenDecoder<'a> {
    reader: BitReader<'a>,
    summary: DecodeSummary,
}

impl<'a> TokenDecoder<'a> {
    pub fn new(bits: &'a Bits) -> Self {
        Self {
            reader: BitReader::new(bits),
            summary: DecodeSummary {
                total_bits: bits.len(),
                ..Default::default()
            },
        }
    }

    /// Current cursor position in bits.
    #[inline]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// True once a terminal condition was reached.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.summary.termination.is_some()
    }

    pub fn summary(&self) -> &DecodeSummary {
        &self.summary
    }

    pub fn into_summary(self) -> DecodeSummary {
        self.summary
    }

    /// Decode the next token.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.is_finished() {
            return None;
        }
        let start = self.reader.position();

        let Some(flag) = self.reader.read_bit() else {
            warn!(
                "reached end of data at bit {start} without finding a terminator ({} tokens)",
                self.summary.literals + self.summary.back_references
            );
            self.finish(Termination::EndOfInput);
            self.log_summary();
            return None;
        };

        let token = if flag {
            self.literal()
        } else {
            self.reference()
        };
        trace!("bit {start}: {token}");
        if self.is_finished() {
            self.log_summary();
        }
        Some(token)
    }

    fn literal(&mut self) -> Token {
        match self.reader.read_bits(LITERAL_BITS) {
            Ok(value) => {
                self.summary.literals += 1;
                Token::Literal(value as u8)
            }
            Err(e) => self.truncated(Field::Literal, e),
        }
    }

    fn reference(&mut self) -> Token {
        let index = match self.reader.read_bits(HISTORY_INDEX_BITS) {
            Ok(index) => index,
            // Encoders may cut the terminator's trailing zeros at the end of data.
            Err(e) if self.reader.rest_is_zero() => {
                debug!(
                    "terminator cut short: {} of {} index bits present",
                    e.available, e.wanted
                );
                self.reader.skip_to_end();
                return self.end_of_stream();
            }
            Err(e) => return self.truncated(Field::Index, e),
        };

        if index == END_OF_STREAM_INDEX {
            return self.end_of_stream();
        }

        match self.reader.read_bits(MATCH_LENGTH_BITS) {
            Ok(raw_length) => {
                self.summary.back_references += 1;
                Token::BackReference {
                    distance: (index - 1) as u16,
                    length: raw_length as u8 + MIN_MATCH_LENGTH,
                }
            }
            Err(e) => self.truncated(Field::Length, e),
        }
    }

    fn end_of_stream(&mut self) -> Token {
        self.finish(Termination::EndOfStream);
        Token::EndOfStream
    }

    fn truncated(&mut self, field: Field, e: BitUnderflow) -> Token {
        warn!(
            "unexpected end of data in {} field at bit {}: {e}",
            field.as_str(),
            self.reader.position()
        );
        self.finish(Termination::Truncated(field));
        Token::Truncated
    }

    fn finish(&mut self, termination: Termination) {
        self.summary.bits_consumed = self.reader.position();
        self.summary.termination = Some(termination);
    }

    fn log_summary(&self) {
        let termination = self.summary.termination.map_or("running", |t| t.as_str());
        debug!(
            "decode finished ({termination}): {} literals, {} back-references, {}/{} bits",
            self.summary.literals,
            self.summary.back_references,
            self.summary.bits_consumed,
            self.summary.total_bits
        );
    }
}

impl Iterator for TokenDecoder<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for TokenDecoder<'_> {}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Tokens, their starting bit offsets, and the decode summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub tokens: Vec<Token>,
    /// `offsets[i]` is the bit at which `tokens[i]` starts.
    pub offsets: Vec<usize>,
    pub summary: DecodeSummary,
}

impl Decoded {
    /// Space-joined trace line.
    pub fn trace(&self) -> String {
        render_trace(&self.tokens)
    }

    /// Tokens paired with their starting bit offsets.
    pub fn with_offsets(&self) -> impl Iterator<Item = (usize, Token)> + '_ {
        self.offsets.iter().copied().zip(self.tokens.iter().copied())
    }
}

/// Decode a whole bit sequence, keeping offsets and the summary.
pub fn decode(bits: &Bits) -> Decoded {
    let mut decoder = TokenDecoder::new(bits);
    let mut tokens = Vec::new();
    let mut offsets = Vec::new();
    loop {
        let start = decoder.position();
        let Some(token) = decoder.next_token() else {
            break;
        };
        offsets.push(start);
        tokens.push(token);
    }
    Decoded {
        tokens,
        offsets,
        summary: decoder.into_summary(),
    }
}

/// Decode a whole bit sequence into tokens.
pub fn decode_tokens(bits: &Bits) -> Vec<Token> {
    TokenDecoder::new(bits).collect()
}

/// Decode, pairing each token with the bit offset it started at.
pub fn decode_with_offsets(bits: &Bits) -> Vec<(usize, Token)> {
    decode(bits).with_offsets().collect()
}

/// Expand hex text and render its trace line.
pub fn trace_hex(text: &str) -> Result<String, HexError> {
    let bits = expand_hex(text)?;
    Ok(render_trace(&decode_tokens(&bits)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(fields: &[(u32, u32)]) -> Bits {
        let mut bits = Bits::new();
        for &(value, width) in fields {
            bits.push_bits(value, width);
        }
        bits
    }

    #[test]
    fn terminator_consumes_fourteen_bits() {
        // Trailing content after the terminator is never read.
        let bits = bits_of(&[(0, 1), (0, 13), (0b1111_1111, 8)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.tokens, vec![Token::EndOfStream]);
        assert_eq!(decoded.summary.bits_consumed, 14);
        assert_eq!(decoded.summary.termination, Some(Termination::EndOfStream));
    }

    #[test]
    fn literal_token() {
        let bits = bits_of(&[(1, 1), (0xAA, 8)]);
        assert_eq!(decode_tokens(&bits), vec![Token::Literal(0xAA)]);
    }

    #[test]
    fn back_reference_biases() {
        let bits = bits_of(&[(0, 1), (1, 13), (0, 4)]);
        assert_eq!(
            decode_tokens(&bits),
            vec![Token::BackReference {
                distance: 0,
                length: 3
            }]
        );

        let bits = bits_of(&[(0, 1), (8191, 13), (15, 4)]);
        assert_eq!(
            decode_tokens(&bits),
            vec![Token::BackReference {
                distance: 8190,
                length: 18
            }]
        );
    }

    #[test]
    fn short_length_field_is_truncated() {
        let bits = bits_of(&[(1, 1), (0x41, 8), (0, 1), (5, 13), (0b11, 2)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.tokens, vec![Token::Literal(0x41), Token::Truncated]);
        assert_eq!(
            decoded.summary.termination,
            Some(Termination::Truncated(Field::Length))
        );
        assert!(decoded.summary.bits_consumed <= bits.len());
    }

    #[test]
    fn short_literal_is_truncated() {
        let bits = bits_of(&[(1, 1), (0b101, 3)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.tokens, vec![Token::Truncated]);
        assert_eq!(
            decoded.summary.termination,
            Some(Termination::Truncated(Field::Literal))
        );
        assert_eq!(decoded.summary.bits_consumed, 1);
    }

    #[test]
    fn short_zero_index_is_end_of_stream() {
        let bits = bits_of(&[(1, 1), (0x20, 8), (0, 1), (0, 6)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.tokens, vec![Token::Literal(0x20), Token::EndOfStream]);
        assert_eq!(decoded.summary.bits_consumed, bits.len());

        // Flag bit is the very last bit.
        let bits = bits_of(&[(1, 1), (0x20, 8), (0, 1)]);
        assert_eq!(
            decode_tokens(&bits),
            vec![Token::Literal(0x20), Token::EndOfStream]
        );
    }

    #[test]
    fn short_nonzero_index_is_truncated() {
        let bits = bits_of(&[(0, 1), (0b0010, 4)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.tokens, vec![Token::Truncated]);
        assert_eq!(
            decoded.summary.termination,
            Some(Termination::Truncated(Field::Index))
        );
    }

    #[test]
    fn end_of_input_emits_nothing() {
        let bits = bits_of(&[(1, 1), (0x61, 8), (1, 1), (0x62, 8)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.tokens, vec![Token::Literal(0x61), Token::Literal(0x62)]);
        assert_eq!(decoded.summary.termination, Some(Termination::EndOfInput));
        assert_eq!(decoded.summary.literals, 2);

        let empty = Bits::new();
        assert!(decode_tokens(&empty).is_empty());
    }

    #[test]
    fn decoder_is_fused() {
        let bits = bits_of(&[(0, 14)]);
        let mut decoder = TokenDecoder::new(&bits);
        assert_eq!(decoder.next(), Some(Token::EndOfStream));
        assert!(decoder.is_finished());
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn offsets_track_token_starts() {
        let bits = bits_of(&[(1, 1), (0x54, 8), (0, 1), (14, 13), (1, 4), (0, 14)]);
        assert_eq!(
            decode_with_offsets(&bits),
            vec![
                (0, Token::Literal(0x54)),
                (
                    9,
                    Token::BackReference {
                        distance: 13,
                        length: 4
                    }
                ),
                (27, Token::EndOfStream),
            ]
        );
    }

    #[test]
    fn summary_counts() {
        let bits = bits_of(&[(1, 1), (0x54, 8), (0, 1), (14, 13), (1, 4), (0, 14)]);
        let decoded = decode(&bits);
        assert_eq!(decoded.summary.literals, 1);
        assert_eq!(decoded.summary.back_references, 1);
        assert_eq!(decoded.summary.bits_consumed, 41);
        assert_eq!(decoded.summary.total_bits, 41);
        assert_eq!(decoded.offsets, vec![0, 9, 27]);
        assert_eq!(decoded.trace(), "54 (13,4) EOF");
    }

    #[test]
    fn trace_from_hex() {
        // 1 | 0x54 | 0 | 0000000000000 (padding)
        assert_eq!(trace_hex("AA 00 00").unwrap(), "54 EOF");
        assert!(matches!(
            trace_hex("AG"),
            Err(HexError::InvalidDigit { ch: 'G', .. })
        ));
    }
}
