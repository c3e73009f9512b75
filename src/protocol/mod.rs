pub mod constants;
pub mod error;
pub mod stream;
pub mod txout;

pub use constants::*;
pub use error::{DataField, ProtocolError};
pub use stream::{decode_all, DecodedTxOut, TxOutStream};
pub use txout::{decode_tx_out, FieldValue, TxOut, TxOutField};
