//! lzss-trace: diagnostic decoder for ZUN-style LZSS bitstreams.
//!
//! The crate provides:
//! - Bit sequences and hex expansion (`bits`)
//! - The LZSS token decoder and trace rendering (`lzss`)
//! - Input sources: hex text, hex/raw files, the built-in sample (`io`)
//! - An optional CLI (`cli` feature)
//!
//! The output is a token trace (literals, back-references, terminator),
//! not decompressed bytes.
//!
//! # Quick Start
//!
//! ```
//! use lzss_trace::bits::expand_hex;
//! use lzss_trace::lzss::{Token, decode_tokens, render_trace};
//!
//! let bits = expand_hex("AA 00 00").unwrap();
//! let tokens = decode_tokens(&bits);
//! assert_eq!(tokens, vec![Token::Literal(0x54), Token::EndOfStream]);
//! assert_eq!(render_trace(&tokens), "54 EOF");
//! ```

pub mod bits;
pub mod io;
pub mod lzss;

#[cfg(feature = "cli")]
pub mod cli;
