// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bare schema-id framing (wire format C).
//!
//! The minimal framing primitive: a 4-byte schema id, no magic byte, then
//! the payload. The caller resolves and verifies schema identity out of band
//! -- this codec performs no caching and no registry I/O.
//!
//! ```text
//! bytes 0..4   schema id, big-endian two's-complement
//! bytes 4..    serializer payload
//! ```
//!
//! Earlier incarnations of this format wrote the id in host byte order; we
//! write big-endian unconditionally so frames survive crossing hosts.

use crate::error::{CodecError, CodecResult};
use crate::schema::{Schema, SchemaId};
use crate::serializer::ValueSerializer;
use std::io::{Read, Write};

/// Bare-id framing codec.
pub struct SchemaIdCodec<S> {
    serializer: S,
}

impl<S: ValueSerializer> SchemaIdCodec<S> {
    /// Create a codec around the injected payload serializer.
    pub fn new(serializer: S) -> Self {
        Self { serializer }
    }

    /// Write `id + payload(value)` to `sink`.
    ///
    /// `schema` is the payload encoder's input; the caller vouches that `id`
    /// identifies it. The payload is staged so a serializer failure writes
    /// zero bytes.
    pub fn encode<W: Write>(
        &self,
        id: SchemaId,
        schema: &Schema,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<()> {
        let mut frame = Vec::with_capacity(4 + 64);
        frame.extend_from_slice(&id.to_be_bytes());
        self.serializer
            .encode(schema, value, &mut frame)
            .map_err(|e| CodecError::EncodeFailed(e.0))?;

        sink.write_all(&frame)?;
        Ok(())
    }

    /// Read a frame, verify its id against `expected_id`, decode the payload.
    ///
    /// An id mismatch short-circuits before any payload byte is read.
    pub fn decode<R: Read>(
        &self,
        source: &mut R,
        expected_id: SchemaId,
        schema: &Schema,
    ) -> CodecResult<S::Value> {
        let mut header = [0u8; 4];
        source.read_exact(&mut header)?;
        let found = SchemaId::from_be_bytes(header);

        if found != expected_id {
            return Err(CodecError::IdMismatch {
                expected: expected_id,
                found,
            });
        }

        let mut payload = Vec::new();
        source.read_to_end(&mut payload)?;

        self.serializer
            .decode(schema, &payload)
            .map_err(|e| CodecError::DecodeFailed(e.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::JsonSerializer;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::parse(r#"{"type":"record","name":"T","fields":[{"name":"v","type":"long"}]}"#)
            .unwrap()
    }

    #[test]
    fn header_is_big_endian() {
        let codec = SchemaIdCodec::new(JsonSerializer);
        let mut frame = Vec::new();
        codec
            .encode(0x0102_0304, &schema(), &json!({"v": 1}), &mut frame)
            .unwrap();
        assert_eq!(&frame[..4], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn round_trip() {
        let codec = SchemaIdCodec::new(JsonSerializer);
        let value = json!({"v": 42});

        let mut frame = Vec::new();
        codec.encode(9, &schema(), &value, &mut frame).unwrap();
        let back = codec.decode(&mut frame.as_slice(), 9, &schema()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn id_mismatch_short_circuits() {
        let codec = SchemaIdCodec::new(JsonSerializer);

        let mut frame = Vec::new();
        codec
            .encode(9, &schema(), &json!({"v": 42}), &mut frame)
            .unwrap();
        // Corrupt payload: a mismatch must fail before decoding it.
        frame.truncate(4);
        frame.extend_from_slice(b"\xff\xff");

        let err = codec.decode(&mut frame.as_slice(), 8, &schema()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::IdMismatch {
                expected: 8,
                found: 9
            }
        ));
    }

    #[test]
    fn negative_ids_survive_the_wire() {
        // Ids are registry-assigned and positive in practice, but the frame
        // carries two's-complement and must not mangle other values.
        let codec = SchemaIdCodec::new(JsonSerializer);
        let mut frame = Vec::new();
        codec.encode(-2, &schema(), &json!({"v": 0}), &mut frame).unwrap();
        assert_eq!(&frame[..4], &[0xff, 0xff, 0xff, 0xfe]);
        let back = codec.decode(&mut frame.as_slice(), -2, &schema()).unwrap();
        assert_eq!(back, json!({"v": 0}));
    }
}
