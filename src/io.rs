// Input sources for the decoder.
//
// The decoder works on a fully materialized `Bits` sequence. Where that
// sequence comes from (inline hex, a hex file, a raw binary dump, the
// built-in sample) is decided here, behind the `BitSource` trait.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::bits::{Bits, HexError, expand_hex};

/// Reference stream: 17 literals and 39 back-references. Its terminator is
/// cut short by the end of the data.
pub const SAMPLE_HEX: &str = "AA 59 6E 77 49 04 82 41 20 00 38 65 DE AB A5 94 01 41 00 68 \
60 38 08 90 06 C3 00 81 80 85 E0 2A 78 0C DE 03 C7 81 15 E0 4E 78 15 DE 06 07 81 A5 E0 72 \
78 1E DE 08 47 82 35 E0 8F 78 23 DE 09 87 82 85 E0 AA 78 2C DE 0B C7 83 15 E0 CE 78 35 DE \
0E 07 83 A5 E0 F2 78 3E DE 10 47 84 35 E1 16 78 47 DE 13 87 85 05 E1 4A 78 54 DA 00";

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for loading input bits.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// I/O error (file open, read).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Text input was not valid hex.
    #[error("{0}")]
    Hex(#[from] HexError),
    /// Hex input read from a stream was not UTF-8.
    #[error("hex input is not valid UTF-8")]
    NotUtf8,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Supplies the complete bit sequence to decode.
pub trait BitSource {
    fn load_bits(&mut self) -> Result<Bits, InputError>;
}

/// Inline hex text.
pub struct HexText<'a>(pub &'a str);

impl BitSource for HexText<'_> {
    fn load_bits(&mut self) -> Result<Bits, InputError> {
        Ok(expand_hex(self.0)?)
    }
}

/// Hex text read to the end of a stream.
pub struct HexReader<R: Read>(pub R);

impl<R: Read> BitSource for HexReader<R> {
    fn load_bits(&mut self) -> Result<Bits, InputError> {
        let mut raw = Vec::new();
        self.0.read_to_end(&mut raw)?;
        let text = String::from_utf8(raw).map_err(|_| InputError::NotUtf8)?;
        Ok(expand_hex(&text)?)
    }
}

/// Binary data read to the end of a stream, 8 bits per byte.
pub struct RawReader<R: Read>(pub R);

impl<R: Read> BitSource for RawReader<R> {
    fn load_bits(&mut self) -> Result<Bits, InputError> {
        let mut raw = Vec::new();
        self.0.read_to_end(&mut raw)?;
        Ok(Bits::from_bytes(raw))
    }
}

/// The built-in [`SAMPLE_HEX`] stream.
pub struct Sample;

impl BitSource for Sample {
    fn load_bits(&mut self) -> Result<Bits, InputError> {
        HexText(SAMPLE_HEX).load_bits()
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

/// Load a file containing hex text.
pub fn load_hex_file(path: &Path) -> Result<Bits, InputError> {
    let f = File::open(path)?;
    HexReader(BufReader::with_capacity(BUF_SIZE, f)).load_bits()
}

/// Load a binary file as raw bits.
pub fn load_raw_file(path: &Path) -> Result<Bits, InputError> {
    Ok(Bits::from_bytes(std::fs::read(path)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
