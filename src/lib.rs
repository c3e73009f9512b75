//! Decoder for serialized transaction outputs: an 8-byte amount, a
//! CompactSize script length and the script bytes.

pub mod config;
pub mod protocol;
pub mod utils;

pub use protocol::{
    decode_all, decode_tx_out, DataField, DecodedTxOut, ProtocolError, TxOut, TxOutField,
    TxOutStream,
};
pub use utils::varint::{decode_varint, encode_varint};
