//! Wire layout constants for transaction output records

/// Width of the little-endian amount field
pub const AMOUNT_SIZE: usize = 8;

/// Varint prefix bytes. Anything below `VARINT_PREFIX_U16` is the value itself.
pub const VARINT_PREFIX_U16: u8 = 0xFD;
pub const VARINT_PREFIX_U32: u8 = 0xFE;
pub const VARINT_PREFIX_U64: u8 = 0xFF;

/// Largest value that fits in a single varint byte
pub const VARINT_MAX_SINGLE_BYTE: u64 = 0xFC;

/// Widest varint tier: prefix plus 8 bytes
pub const MAX_VARINT_SIZE: usize = 9;

/// Smallest possible record: amount, one-byte length, empty script
pub const MIN_TXOUT_SIZE: usize = AMOUNT_SIZE + 1;
