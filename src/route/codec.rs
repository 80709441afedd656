//! Record codec
//!
//! Records are stored as bincode. There is no version tag; changing a record
//! layout means rewriting both keyspaces.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Encode a record to bytes
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(record)?)
}

/// Decode a record from bytes
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}
