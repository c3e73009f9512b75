use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::protocol::constants::AMOUNT_SIZE;
use crate::protocol::error::{DataField, ProtocolError};
use crate::utils::varint::{decode_varint, encode_varint, varint_size};

/// A single transaction output as it appears on the wire.
///
/// The script length is not stored separately: it is always `script.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxOut {
    /// Value in the smallest denomination unit
    pub amount: u64,
    /// Locking script, uninterpreted
    #[serde(with = "hex::serde")]
    pub script: Vec<u8>,
}

/// Field identifiers for slot-style access to a `TxOut`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutField {
    Amount,
    ScriptLength,
    Script,
}

impl TxOutField {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TxOutField::Amount),
            1 => Some(TxOutField::ScriptLength),
            2 => Some(TxOutField::Script),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Integer(u64),
    Bytes(&'a [u8]),
}

impl TxOut {
    pub fn new(amount: u64, script: Vec<u8>) -> Self {
        Self { amount, script }
    }

    pub fn script_length(&self) -> u64 {
        self.script.len() as u64
    }

    pub fn field(&self, field: TxOutField) -> FieldValue<'_> {
        match field {
            TxOutField::Amount => FieldValue::Integer(self.amount),
            TxOutField::ScriptLength => FieldValue::Integer(self.script_length()),
            TxOutField::Script => FieldValue::Bytes(&self.script),
        }
    }

    /// Encoded size in bytes
    pub fn size(&self) -> usize {
        AMOUNT_SIZE + varint_size(self.script_length()) + self.script.len()
    }

    /// Decode a record from the start of `buf`. See [`decode_tx_out`].
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), ProtocolError> {
        decode_tx_out(buf, 0)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.amount.to_le_bytes());
        encode_varint(self.script_length(), out);
        out.extend_from_slice(&self.script);
    }
}

/// Decode one transaction output starting at `start` in `buf`.
///
/// Returns the record and the number of bytes it occupied, counted from
/// `start`. Bytes after the record are left for the caller. Nothing is
/// returned unless all three fields were read in full.
pub fn decode_tx_out(buf: &[u8], start: usize) -> Result<(TxOut, usize), ProtocolError> {
    let data = buf.get(start..).unwrap_or(&[]);
    trace!("Decoding txout at offset {} from {} bytes", start, data.len());

    if data.len() < AMOUNT_SIZE {
        error!("TxOut amount too short: {} bytes, expected {}", data.len(), AMOUNT_SIZE);
        return Err(ProtocolError::InsufficientData {
            field: DataField::Amount,
            needed: AMOUNT_SIZE as u64,
            available: data.len(),
        });
    }
    let amount = u64::from_le_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]);
    let mut cursor = AMOUNT_SIZE;

    let (script_length, width) = decode_varint(&data[cursor..])
        .map_err(|e| e.within(DataField::ScriptLength))?;
    cursor += width;

    let remaining = data.len() - cursor;
    let script_len = match usize::try_from(script_length) {
        Ok(len) if len <= remaining => len,
        _ => {
            error!("TxOut script too short: declared {} bytes, {} available", script_length, remaining);
            return Err(ProtocolError::InsufficientData {
                field: DataField::Script,
                needed: script_length,
                available: remaining,
            });
        }
    };
    let script = data[cursor..cursor + script_len].to_vec();
    cursor += script_len;

    debug!("Decoded txout: amount={}, script_length={}, consumed={}", amount, script_len, cursor);

    Ok((TxOut { amount, script }, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: u64, length_prefix: &[u8], script: &[u8]) -> Vec<u8> {
        let mut buf = amount.to_le_bytes().to_vec();
        buf.extend_from_slice(length_prefix);
        buf.extend_from_slice(script);
        buf
    }

    #[test]
    fn decodes_one_bitcoin_output() {
        let buf = hex::decode("00e1f5050000000003abcdef").unwrap();
        let (tx_out, consumed) = decode_tx_out(&buf, 0).unwrap();
        assert_eq!(tx_out.amount, 100_000_000);
        assert_eq!(tx_out.script_length(), 3);
        assert_eq!(tx_out.script, vec![0xAB, 0xCD, 0xEF]);
        assert_eq!(consumed, 12);
    }

    #[test]
    fn decodes_three_byte_length() {
        let script: Vec<u8> = (0..=255u8).collect();
        let buf = record(0, &[0xFD, 0x00, 0x01], &script);
        let (tx_out, consumed) = decode_tx_out(&buf, 0).unwrap();
        assert_eq!(tx_out.amount, 0);
        assert_eq!(tx_out.script_length(), 256);
        assert_eq!(tx_out.script, script);
        assert_eq!(consumed, 8 + 3 + 256);
    }

    #[test]
    fn empty_script() {
        let buf = record(42, &[0x00], &[]);
        let (tx_out, consumed) = TxOut::decode(&buf).unwrap();
        assert_eq!(tx_out, TxOut::new(42, Vec::new()));
        assert_eq!(consumed, 9);
    }

    #[test]
    fn start_offset_is_relative() {
        let mut buf = vec![0xEE; 5];
        buf.extend(record(7, &[0x02], &[0x51, 0x52]));
        buf.extend_from_slice(&[0x99, 0x98]);
        let (tx_out, consumed) = decode_tx_out(&buf, 5).unwrap();
        assert_eq!(tx_out, TxOut::new(7, vec![0x51, 0x52]));
        assert_eq!(consumed, 11);
    }

    #[test]
    fn short_amount() {
        let err = decode_tx_out(&[0u8; 7], 0).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InsufficientData { field: DataField::Amount, needed: 8, available: 7 }
        );
    }

    #[test]
    fn start_past_end() {
        let err = decode_tx_out(&[0u8; 4], 10).unwrap_err();
        assert_eq!(err.field(), Some(DataField::Amount));
    }

    #[test]
    fn missing_length() {
        let err = decode_tx_out(&[0u8; 8], 0).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InsufficientData { field: DataField::ScriptLength, needed: 1, available: 0 }
        );
    }

    #[test]
    fn truncated_length() {
        let buf = record(1, &[0xFD, 0x01], &[]);
        let err = decode_tx_out(&buf, 0).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InsufficientData { field: DataField::ScriptLength, needed: 3, available: 2 }
        );
    }

    #[test]
    fn truncated_script() {
        let buf = record(1, &[0x05], &[1, 2, 3]);
        let err = decode_tx_out(&buf, 0).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InsufficientData { field: DataField::Script, needed: 5, available: 3 }
        );
    }

    #[test]
    fn huge_declared_length() {
        let buf = record(1, &[0xFF, 0, 0, 0, 0, 0, 0, 0, 0x80], &[1, 2]);
        let err = decode_tx_out(&buf, 0).unwrap_err();
        assert_eq!(err.field(), Some(DataField::Script));
    }

    #[test]
    fn field_access_by_slot() {
        let tx_out = TxOut::new(5000, vec![0x6a, 0x01]);
        assert_eq!(tx_out.field(TxOutField::Amount), FieldValue::Integer(5000));
        assert_eq!(tx_out.field(TxOutField::ScriptLength), FieldValue::Integer(2));
        assert_eq!(tx_out.field(TxOutField::Script), FieldValue::Bytes(&[0x6a, 0x01]));
        assert_eq!(TxOutField::from_index(1), Some(TxOutField::ScriptLength));
        assert_eq!(TxOutField::from_index(3), None);
    }

    #[test]
    fn encode_matches_size() {
        let tx_out = TxOut::new(4_400_044_000, vec![7; 300]);
        let bytes = tx_out.encode();
        assert_eq!(bytes.len(), tx_out.size());
        assert_eq!(TxOut::decode(&bytes).unwrap(), (tx_out, 8 + 3 + 300));
    }

    #[test]
    fn default_is_empty() {
        let tx_out = TxOut::default();
        assert_eq!(tx_out.amount, 0);
        assert_eq!(tx_out.script_length(), 0);
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(TxOut::new(1, vec![0xab, 0xcd])).unwrap();
        assert_eq!(json, serde_json::json!({ "amount": 1, "script": "abcd" }));
    }
}
