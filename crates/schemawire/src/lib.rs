// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # schemawire - Schema-tagged binary framing
//!
//! Codecs that prefix serialized payloads with a schema identity so a
//! consumer can recover the writer schema before touching the payload.
//! Three wire formats are supported: the Confluent magic + registry id
//! frame, a self-contained 128-bit schema fingerprint frame, and a bare
//! 4-byte id frame for callers that manage ids themselves.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemawire::{ConfluentCodec, HttpSchemaRegistry, JsonSerializer, Schema};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(HttpSchemaRegistry::new("http://localhost:8081"));
//! let codec = ConfluentCodec::new(registry, JsonSerializer, tokio::runtime::Handle::current());
//!
//! let schema = Schema::parse_shared(
//!     r#"{"type":"record","name":"Order","fields":[{"name":"qty","type":"long"}]}"#,
//! )?;
//!
//! // Register once (round trips to the registry), then frame without I/O.
//! let id = codec.register_schema("orders-value", &schema).await?;
//! let mut frame = Vec::new();
//! codec.encode_nonblocking(&schema, &serde_json::json!({"qty": 3}), &mut frame)?;
//!
//! // The reverse direction: header -> schema -> value.
//! let decoded = codec.decode(&mut frame.as_slice()).await?;
//! assert_eq!(decoded.id, id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                      Framing codecs                          |
//! |  ConfluentCodec (A) | FingerprintCodec (B) | SchemaIdCodec (C)|
//! +--------------------------------------------------------------+
//! |                   Schema + serializer seam                   |
//! |     Schema (canonical text) | ValueSerializer (payloads)     |
//! +--------------------------------------------------------------+
//! |                  Registry + cache (A only)                   |
//! |  SchemaRegistry trait | HttpSchemaRegistry | id<->schema map |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Wire Formats
//!
//! | Format | Header | Needs a registry |
//! |--------|--------|------------------|
//! | A ([`ConfluentCodec`]) | `0x00` + 4-byte big-endian id | yes |
//! | B ([`FingerprintCodec`]) | 16-byte MD5 fingerprint of the canonical schema | no |
//! | C ([`SchemaIdCodec`]) | 4-byte big-endian id, no magic | caller-managed |
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Schema`] | Parsed schema with a canonical text form |
//! | [`ValueSerializer`] | Pluggable payload encoder/decoder |
//! | [`ConfluentCodec`] | Registry-backed codec with a schema/id cache |
//! | [`SchemaRegistry`] | Async registry client seam |
//! | [`CodecError`] | Error taxonomy shared by all codecs |

/// Sync/async bridge for blocking wrappers.
mod bridge;
/// Bidirectional schema/id cache.
mod cache;
/// Registry-backed framing codec (wire format A).
pub mod confluent;
/// Error taxonomy shared by all codecs.
pub mod error;
/// Fingerprint-framed codec (wire format B).
pub mod fingerprint;
/// Registry client seam and bundled HTTP implementation.
pub mod registry;
/// Schema parsing and canonicalization.
pub mod schema;
/// Bare-id framing codec (wire format C).
pub mod schema_id;
/// Payload serializer seam.
pub mod serializer;

pub use confluent::{ConfluentCodec, Decoded, CONFLUENT_MAGIC, HEADER_LEN};
pub use error::{CodecError, CodecResult};
pub use fingerprint::{FingerprintCodec, SchemaFingerprint, FINGERPRINT_LEN};
pub use registry::{RegistryError, RegistryResult, SchemaRegistry};
pub use schema::{Schema, SchemaError, SchemaId, SchemaRef};
pub use schema_id::SchemaIdCodec;
pub use serializer::{JsonSerializer, SerializerError, ValueSerializer};

#[cfg(feature = "registry-http")]
pub use registry::{HttpRegistryConfig, HttpSchemaRegistry, RegistryAuth};
