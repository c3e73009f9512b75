use tracing::{error, trace};

use crate::protocol::constants::{
    MAX_VARINT_SIZE, VARINT_MAX_SINGLE_BYTE, VARINT_PREFIX_U16, VARINT_PREFIX_U32, VARINT_PREFIX_U64,
};
use crate::protocol::error::{DataField, ProtocolError};

/// Encode u64 as a CompactSize varint, always in its shortest form
pub fn encode_varint(value: u64, out: &mut Vec<u8>) {
    if value <= VARINT_MAX_SINGLE_BYTE {
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(VARINT_PREFIX_U16);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(VARINT_PREFIX_U32);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(VARINT_PREFIX_U64);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Number of bytes `encode_varint` writes for `value`
pub fn varint_size(value: u64) -> usize {
    if value <= VARINT_MAX_SINGLE_BYTE {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        MAX_VARINT_SIZE
    }
}

/// Decode a CompactSize varint from the start of `buf`.
///
/// Returns the value and the width of the tier it was read from (1, 3, 5 or 9).
/// Non-minimal encodings are accepted as-is.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), ProtocolError> {
    let Some(&prefix) = buf.first() else {
        error!("Varint requested from empty buffer");
        return Err(ProtocolError::EmptyInput);
    };

    let width = match prefix {
        VARINT_PREFIX_U16 => 3,
        VARINT_PREFIX_U32 => 5,
        VARINT_PREFIX_U64 => MAX_VARINT_SIZE,
        b => return Ok((b as u64, 1)),
    };

    if buf.len() < width {
        error!("Varint too short: prefix {:#04x} needs {} bytes, {} available", prefix, width, buf.len());
        return Err(ProtocolError::InsufficientData {
            field: DataField::VarInt,
            needed: width as u64,
            available: buf.len(),
        });
    }

    let tail = &buf[1..width];
    let value = match width {
        3 => u16::from_le_bytes([tail[0], tail[1]]) as u64,
        5 => u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]) as u64,
        _ => u64::from_le_bytes([
            tail[0], tail[1], tail[2], tail[3], tail[4], tail[5], tail[6], tail[7],
        ]),
    };
    trace!("Decoded varint {} from {} bytes", value, width);

    Ok((value, width))
}
