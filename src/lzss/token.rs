// Decoded tokens and their trace rendering.

use std::fmt;

/// One decoded unit of an LZSS stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A byte copied verbatim.
    Literal(u8),
    /// Copy `length` bytes from `distance` in the history window.
    BackReference { distance: u16, length: u8 },
    /// Stream terminator (index field zero).
    EndOfStream,
    /// Input ended in the middle of a token.
    Truncated,
}

impl Token {
    /// True for the tokens that stop decoding.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Token::EndOfStream | Token::Truncated)
    }

    /// Short lowercase name, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Literal(_) => "literal",
            Token::BackReference { .. } => "back_reference",
            Token::EndOfStream => "end_of_stream",
            Token::Truncated => "truncated",
        }
    }
}

/// Trace rendering: `54`, `(13,4)`, `EOF`, `Unexpected EOF`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(byte) => write!(f, "{byte:02X}"),
            Token::BackReference { distance, length } => write!(f, "({distance},{length})"),
            Token::EndOfStream => f.write_str("EOF"),
            Token::Truncated => f.write_str("Unexpected EOF"),
        }
    }
}

/// Join rendered tokens with single spaces.
pub fn render_trace(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.len() * 4);
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&token.to_string());
    }
    out
}
