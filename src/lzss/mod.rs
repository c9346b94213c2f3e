// ZUN LZSS token decoding.
//
// - `format`  — field widths, biases, and the terminator index
// - `token`   — decoded tokens and trace rendering
// - `decoder` — bitstream to token sequence

pub mod decoder;
pub mod format;
pub mod token;

pub use decoder::{
    DecodeSummary, Decoded, Field, Termination, TokenDecoder, decode, decode_tokens,
    decode_with_offsets, trace_hex,
};
pub use token::{Token, render_trace};
