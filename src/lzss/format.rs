// ZUN LZSS stream layout.
//
//   literal:    1 | byte (8 bits)
//   reference:  0 | index (13 bits) | length (4 bits)
//   terminator: 0 | index = 0 (13 bits, trailing zeros may be cut off)
//
// Stored index is history position + 1; stored length is match length - 3.

/// Width of the mode flag.
pub const FLAG_BITS: u32 = 1;

/// Width of a literal byte.
pub const LITERAL_BITS: u32 = 8;

/// Width of the history index field.
pub const HISTORY_INDEX_BITS: u32 = 13;

/// Sliding window size (8 KiB).
pub const HISTORY_SIZE: usize = 1 << HISTORY_INDEX_BITS;

/// Width of the match length field.
pub const MATCH_LENGTH_BITS: u32 = 4;

/// Bias added to the stored match length.
pub const MIN_MATCH_LENGTH: u8 = 3;

/// Longest encodable match (18).
pub const MAX_MATCH_LENGTH: u8 = MIN_MATCH_LENGTH + (1 << MATCH_LENGTH_BITS) - 1;

/// Index value reserved for the end-of-stream marker.
pub const END_OF_STREAM_INDEX: u32 = 0;

/// Largest decoded distance (stored index 8191).
pub const MAX_DISTANCE: u16 = (HISTORY_SIZE - 2) as u16;

/// Bits taken by a literal token, flag included.
pub const LITERAL_TOKEN_BITS: u32 = FLAG_BITS + LITERAL_BITS;

/// Bits taken by a back-reference token, flag included.
pub const REFERENCE_TOKEN_BITS: u32 = FLAG_BITS + HISTORY_INDEX_BITS + MATCH_LENGTH_BITS;

/// Bits taken by a complete terminator.
pub const END_OF_STREAM_BITS: u32 = FLAG_BITS + HISTORY_INDEX_BITS;
