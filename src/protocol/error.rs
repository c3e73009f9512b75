use std::fmt;

use serde::Serialize;

/// The part of a record that was being read when decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataField {
    Amount,
    ScriptLength,
    Script,
    /// A bare varint decoded outside of a record.
    VarInt,
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataField::Amount => write!(f, "amount"),
            DataField::ScriptLength => write!(f, "script length"),
            DataField::Script => write!(f, "script"),
            DataField::VarInt => write!(f, "varint"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    EmptyInput,
    InsufficientData {
        field: DataField,
        needed: u64,
        available: usize,
    },
}

impl ProtocolError {
    /// Re-attributes a nested failure to `field` of the enclosing record.
    /// An empty buffer inside a record is a truncation of that record.
    pub fn within(self, field: DataField) -> Self {
        match self {
            ProtocolError::EmptyInput => ProtocolError::InsufficientData {
                field,
                needed: 1,
                available: 0,
            },
            ProtocolError::InsufficientData { needed, available, .. } => {
                ProtocolError::InsufficientData { field, needed, available }
            }
        }
    }

    pub fn field(&self) -> Option<DataField> {
        match self {
            ProtocolError::EmptyInput => None,
            ProtocolError::InsufficientData { field, .. } => Some(*field),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::EmptyInput =>
                write!(f, "empty input"),
            ProtocolError::InsufficientData { field, needed, available } =>
                write!(f, "insufficient data for {}: need {} bytes, {} available", field, needed, available),
        }
    }
}

impl std::error::Error for ProtocolError {}
