// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Payload serializer seam.
//!
//! The codecs frame payload bytes; producing and consuming those bytes is an
//! injected capability. Implementations must surface malformed payloads as a
//! [`SerializerError`], never a panic -- the codecs map it into their own
//! taxonomy at the call boundary.

use crate::schema::Schema;
use std::fmt;

/// Error raised by a payload serializer.
#[derive(Debug, Clone)]
pub struct SerializerError(pub String);

impl SerializerError {
    /// Build from anything displayable.
    pub fn new(msg: impl fmt::Display) -> Self {
        SerializerError(msg.to_string())
    }
}

impl fmt::Display for SerializerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "serializer error: {}", self.0)
    }
}

impl std::error::Error for SerializerError {}

/// Converts between schema-typed values and payload bytes.
pub trait ValueSerializer: Send + Sync {
    /// The structured value type this serializer understands.
    type Value;

    /// Encode `value` against `schema`, appending the payload to `buf`.
    ///
    /// Any internal buffering must be flushed into `buf` before returning so
    /// the emitted byte count is exact.
    fn encode(
        &self,
        schema: &Schema,
        value: &Self::Value,
        buf: &mut Vec<u8>,
    ) -> Result<(), SerializerError>;

    /// Decode a payload against `schema`.
    fn decode(&self, schema: &Schema, bytes: &[u8]) -> Result<Self::Value, SerializerError>;
}

/// Compact-JSON payload serializer.
///
/// The batteries-included default: values are `serde_json::Value`, payloads
/// are compact JSON text. The schema is carried for framing identity only;
/// this serializer trusts the caller to hand it values that fit.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl ValueSerializer for JsonSerializer {
    type Value = serde_json::Value;

    fn encode(
        &self,
        _schema: &Schema,
        value: &Self::Value,
        buf: &mut Vec<u8>,
    ) -> Result<(), SerializerError> {
        serde_json::to_writer(buf, value).map_err(SerializerError::new)
    }

    fn decode(&self, _schema: &Schema, bytes: &[u8]) -> Result<Self::Value, SerializerError> {
        serde_json::from_slice(bytes).map_err(SerializerError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::parse(r#"{"type":"record","name":"T","fields":[]}"#).unwrap()
    }

    #[test]
    fn json_round_trip() {
        let s = JsonSerializer;
        let value = json!({"a": 1, "b": "two"});
        let mut buf = Vec::new();
        s.encode(&schema(), &value, &mut buf).unwrap();
        let back = s.decode(&schema(), &buf).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn json_payload_is_compact() {
        let s = JsonSerializer;
        let mut buf = Vec::new();
        s.encode(&schema(), &json!({"a": 1}), &mut buf).unwrap();
        assert_eq!(buf, br#"{"a":1}"#);
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_panic() {
        let s = JsonSerializer;
        let err = s.decode(&schema(), b"\xff\xfe not json").unwrap_err();
        assert!(!err.0.is_empty());
    }
}
