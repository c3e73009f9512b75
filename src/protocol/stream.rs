use serde::Serialize;
use tracing::debug;

use crate::protocol::constants::MIN_TXOUT_SIZE;
use crate::protocol::error::ProtocolError;
use crate::protocol::txout::{decode_tx_out, TxOut};

/// A record together with where it sat in the source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTxOut {
    pub offset: usize,
    pub consumed: usize,
    pub tx_out: TxOut,
}

#[derive(Serialize)]
struct DecodedTxOutView {
    offset: usize,
    consumed: usize,
    amount: u64,
    script_length: u64,
    script: String,
}

impl Serialize for DecodedTxOut {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DecodedTxOutView {
            offset: self.offset,
            consumed: self.consumed,
            amount: self.tx_out.amount,
            script_length: self.tx_out.script_length(),
            script: hex::encode(&self.tx_out.script),
        }
        .serialize(serializer)
    }
}

/// Walks a buffer of back-to-back transaction outputs.
///
/// Yields one item per record and stops at the end of the buffer or after
/// the first error.
pub struct TxOutStream<'a> {
    buf: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> TxOutStream<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0, failed: false }
    }

    /// Offset of the next record to be decoded
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.position..]
    }
}

impl Iterator for TxOutStream<'_> {
    type Item = Result<DecodedTxOut, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.buf.len() {
            return None;
        }

        match decode_tx_out(self.buf, self.position) {
            Ok((tx_out, consumed)) => {
                let offset = self.position;
                self.position += consumed;
                debug!("Record at offset {} ({} bytes)", offset, consumed);
                Some(Ok(DecodedTxOut { offset, consumed, tx_out }))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let left = self.buf.len() - self.position;
        // A trailing fragment still yields one error item
        (0, Some(left.div_ceil(MIN_TXOUT_SIZE)))
    }
}

impl std::iter::FusedIterator for TxOutStream<'_> {}

/// Decode every record in `buf`, failing on the first malformed one
pub fn decode_all(buf: &[u8]) -> Result<Vec<TxOut>, ProtocolError> {
    TxOutStream::new(buf)
        .map(|item| item.map(|decoded| decoded.tx_out))
        .collect()
}
