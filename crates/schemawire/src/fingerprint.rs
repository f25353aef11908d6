// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema fingerprints and fingerprint-first framing (wire format B).
//!
//! A fingerprint is the 128-bit MD5 of a schema's canonical text, giving a
//! registry-free schema identity: equal schemas canonicalize to equal text
//! and hence equal fingerprints, across independent processes.
//!
//! Wire layout:
//!
//! ```text
//! bytes 0..16   schema fingerprint
//! bytes 16..    serializer payload
//! ```
//!
//! The receiver must already hold every candidate schema and compute matching
//! fingerprints locally; no registry is involved.

use crate::error::{CodecError, CodecResult};
use crate::schema::Schema;
use crate::serializer::ValueSerializer;
use std::fmt;
use std::io::{Read, Write};

/// Byte width of a fingerprint on the wire.
pub const FINGERPRINT_LEN: usize = 16;

/// 128-bit schema identity derived from the canonical schema text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaFingerprint([u8; FINGERPRINT_LEN]);

impl SchemaFingerprint {
    /// Compute the fingerprint of a schema.
    pub fn of(schema: &Schema) -> Self {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(schema.canonical_form().as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; FINGERPRINT_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Create from a raw 16-byte array.
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw 16-byte array.
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Debug for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaFingerprint(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; FINGERPRINT_LEN]> for SchemaFingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for SchemaFingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Fingerprint-first framing codec.
///
/// Frames payloads with the encoding schema's fingerprint instead of a
/// registry id. Decoding verifies the header against a locally held schema
/// before any payload byte is interpreted.
pub struct FingerprintCodec<S> {
    serializer: S,
}

impl<S: ValueSerializer> FingerprintCodec<S> {
    /// Create a codec around the injected payload serializer.
    pub fn new(serializer: S) -> Self {
        Self { serializer }
    }

    /// Write `fingerprint(schema) + payload(value)` to `sink`.
    ///
    /// The payload is staged in memory first: a serializer failure writes
    /// zero bytes, and the frame goes out in a single write.
    pub fn encode<W: Write>(
        &self,
        schema: &Schema,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<()> {
        let fingerprint = SchemaFingerprint::of(schema);

        let mut frame = Vec::with_capacity(FINGERPRINT_LEN + 64);
        frame.extend_from_slice(fingerprint.as_bytes());
        self.serializer
            .encode(schema, value, &mut frame)
            .map_err(|e| CodecError::EncodeFailed(e.0))?;

        sink.write_all(&frame)?;
        Ok(())
    }

    /// Read a frame and decode its payload against `local_schema`.
    ///
    /// A fingerprint mismatch short-circuits before any payload byte is
    /// touched, so bytes are never misinterpreted under the wrong schema.
    pub fn decode<R: Read>(&self, source: &mut R, local_schema: &Schema) -> CodecResult<S::Value> {
        let mut header = [0u8; FINGERPRINT_LEN];
        source.read_exact(&mut header)?;
        let found = SchemaFingerprint::from_bytes(header);

        let expected = SchemaFingerprint::of(local_schema);
        if found != expected {
            return Err(CodecError::FingerprintMismatch { expected, found });
        }

        let mut payload = Vec::new();
        source.read_to_end(&mut payload)?;

        self.serializer
            .decode(local_schema, &payload)
            .map_err(|e| CodecError::DecodeFailed(e.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{JsonSerializer, SerializerError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const POINT: &str = r#"{"type":"record","name":"Point","fields":[
        {"name":"x","type":"long"},
        {"name":"y","type":"long"}
    ]}"#;

    #[test]
    fn known_vectors() {
        // MD5 of the canonical text, independently computed.
        let s = Schema::parse(r#""string""#).unwrap();
        assert_eq!(
            SchemaFingerprint::of(&s).to_string(),
            "095d71cf12556b9d5e330ad575b3df5d"
        );

        let p = Schema::parse(POINT).unwrap();
        assert_eq!(
            SchemaFingerprint::of(&p).to_string(),
            "44ff312577a33041aa8a2ebb3fe47c51"
        );
    }

    #[test]
    fn textual_variance_does_not_change_fingerprint() {
        let a = Schema::parse(POINT).unwrap();
        let b = Schema::parse(
            r#"{  "name" : "Point",
                  "fields": [ {"type":"long","name":"x"}, {"type":"long","name":"y"} ],
                  "type": "record" }"#,
        )
        .unwrap();
        assert_eq!(SchemaFingerprint::of(&a), SchemaFingerprint::of(&b));
    }

    #[test]
    fn semantic_variance_changes_fingerprint() {
        let base = Schema::parse(POINT).unwrap();

        let renamed = Schema::parse(
            r#"{"type":"record","name":"Point","fields":[
                {"name":"x","type":"long"},
                {"name":"z","type":"long"}
            ]}"#,
        )
        .unwrap();
        assert_ne!(SchemaFingerprint::of(&base), SchemaFingerprint::of(&renamed));

        let reordered = Schema::parse(
            r#"{"type":"record","name":"Point","fields":[
                {"name":"y","type":"long"},
                {"name":"x","type":"long"}
            ]}"#,
        )
        .unwrap();
        assert_ne!(
            SchemaFingerprint::of(&base),
            SchemaFingerprint::of(&reordered)
        );
    }

    #[test]
    fn frame_starts_with_fingerprint() {
        let schema = Schema::parse(POINT).unwrap();
        let codec = FingerprintCodec::new(JsonSerializer);

        let mut frame = Vec::new();
        codec
            .encode(&schema, &json!({"x": 1, "y": 2}), &mut frame)
            .unwrap();

        assert_eq!(
            &frame[..FINGERPRINT_LEN],
            SchemaFingerprint::of(&schema).as_bytes()
        );
    }

    #[test]
    fn round_trip() {
        let schema = Schema::parse(POINT).unwrap();
        let codec = FingerprintCodec::new(JsonSerializer);
        let value = json!({"x": 7, "y": -3});

        let mut frame = Vec::new();
        codec.encode(&schema, &value, &mut frame).unwrap();
        let back = codec.decode(&mut frame.as_slice(), &schema).unwrap();
        assert_eq!(back, value);
    }

    /// Serializer that counts decode calls; used to prove short-circuits.
    struct CountingSerializer {
        decodes: AtomicUsize,
    }

    impl ValueSerializer for CountingSerializer {
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
            self.decodes.fetch_add(1, Ordering::SeqCst);
            serde_json::from_slice(bytes).map_err(SerializerError::new)
        }
    }

    #[test]
    fn mismatch_short_circuits_before_payload_decode() {
        let writer_schema = Schema::parse(POINT).unwrap();
        let reader_schema = Schema::parse(r#""string""#).unwrap();

        let counting = CountingSerializer {
            decodes: AtomicUsize::new(0),
        };
        let codec = FingerprintCodec::new(counting);

        let mut frame = Vec::new();
        codec
            .encode(&writer_schema, &json!({"x": 1, "y": 2}), &mut frame)
            .unwrap();

        let err = codec
            .decode(&mut frame.as_slice(), &reader_schema)
            .unwrap_err();
        assert!(matches!(err, CodecError::FingerprintMismatch { .. }));
        assert_eq!(codec.serializer.decodes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn encode_failure_writes_nothing() {
        struct FailingSerializer;
        impl ValueSerializer for FailingSerializer {
            type Value = ();
            fn encode(
                &self,
                _schema: &Schema,
                _value: &Self::Value,
                _buf: &mut Vec<u8>,
            ) -> Result<(), SerializerError> {
                Err(SerializerError::new("boom"))
            }
            fn decode(&self, _schema: &Schema, _bytes: &[u8]) -> Result<(), SerializerError> {
                Ok(())
            }
        }

        let schema = Schema::parse(POINT).unwrap();
        let codec = FingerprintCodec::new(FailingSerializer);
        let mut sink = Vec::new();
        let err = codec.encode(&schema, &(), &mut sink).unwrap_err();
        assert!(matches!(err, CodecError::EncodeFailed(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn truncated_header_is_io_error() {
        let schema = Schema::parse(POINT).unwrap();
        let codec = FingerprintCodec::new(JsonSerializer);
        let short = [0u8; 5];
        let err = codec.decode(&mut short.as_slice(), &schema).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
