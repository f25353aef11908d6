// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry-backed framing codec (wire format A).
//!
//! Frames payloads with a magic byte and the registry-assigned schema id:
//!
//! ```text
//! byte  0      0x00 (magic)
//! bytes 1..5   schema id, big-endian two's-complement
//! bytes 5..    serializer payload
//! ```
//!
//! There is no length prefix; the frame boundary is carrier-defined (a Kafka
//! record, a file, a datagram).
//!
//! # Cache and registry
//!
//! The codec keeps a process-lifetime bidirectional schema/id cache,
//! populated as a write-through side effect of successful registry calls --
//! never pre-populated, never evicted. Registration always performs the
//! round trip: the registry is authoritative for subject/version semantics,
//! so a cached schema is not a reason to skip the call.
//!
//! Every operation comes in up to three shapes:
//!
//! - `*_nonblocking`: consults only the cache; a miss returns
//!   [`CodecError::WouldBlock`] and performs no I/O (and, for encodes,
//!   writes zero bytes).
//! - async: may call the registry on a miss.
//! - `*_blocking`: posts the async operation onto the codec's runtime handle
//!   and parks the calling thread until it completes. Intended for callers
//!   *outside* that runtime; calling from inside it risks deadlock, which
//!   the codec does not detect.
//!
//! Concurrent misses for the same id are not deduplicated: each issues its
//! own registry call and the last completion overwrites the cache with an
//! equivalent value. Operations are never cancelled by the codec and carry
//! no codec-owned timeout.

use crate::bridge;
use crate::cache::SchemaCache;
use crate::error::{CodecError, CodecResult};
use crate::registry::{RegistryError, SchemaRegistry};
use crate::schema::{Schema, SchemaId, SchemaRef};
use crate::serializer::ValueSerializer;
use parking_lot::Mutex;
use std::io::{Read, Write};
use std::sync::Arc;
use tokio::runtime::Handle;

/// First byte of every format-A frame.
pub const CONFLUENT_MAGIC: u8 = 0x00;

/// Magic byte plus 4-byte schema id.
pub const HEADER_LEN: usize = 5;

/// A decoded frame: the schema identity it carried and the payload value.
#[derive(Debug)]
pub struct Decoded<V> {
    /// Schema id from the frame header.
    pub id: SchemaId,
    /// The schema the payload was decoded against.
    pub schema: SchemaRef,
    /// The decoded value.
    pub value: V,
}

/// Cache + registry handle, shared with futures posted to the runtime.
struct Shared {
    registry: Arc<dyn SchemaRegistry>,
    cache: Mutex<SchemaCache>,
}

impl Shared {
    async fn register(&self, subject: &str, schema: &SchemaRef) -> CodecResult<SchemaId> {
        let id = self
            .registry
            .put_schema(subject, schema)
            .await
            .map_err(registry_error)?;

        if id <= 0 {
            log::warn!("registry assigned non-positive id {} to subject {}", id, subject);
            return Err(CodecError::InternalServerError);
        }

        self.cache.lock().insert(schema, id);
        log::debug!("subject {} registered as id {}", subject, id);
        Ok(id)
    }

    async fn resolve(&self, id: SchemaId) -> CodecResult<SchemaRef> {
        let hit = self.cache.lock().schema_for(id);
        if let Some(schema) = hit {
            // Completion is posted to the runtime, never delivered inline
            // within the call.
            tokio::task::yield_now().await;
            return Ok(schema);
        }

        log::debug!("cache miss for id {}, asking registry", id);
        let schema = self
            .registry
            .get_schema_by_id(id)
            .await
            .map_err(registry_error)?;

        self.cache.lock().insert(&schema, id);
        Ok(schema)
    }
}

/// Map a collaborator failure into the codec taxonomy.
fn registry_error(e: RegistryError) -> CodecError {
    match e {
        RegistryError::Transport(msg) => CodecError::NoConnection(msg),
        RegistryError::NotFound(_) => CodecError::NotFound,
        RegistryError::Server { status, message } => {
            log::warn!("registry server error {}: {}", status, message);
            CodecError::InternalServerError
        }
        RegistryError::MalformedResponse(msg) => {
            log::warn!("malformed registry response: {}", msg);
            CodecError::InternalServerError
        }
    }
}

/// Registry-backed schema-id framing codec.
///
/// # Example
///
/// ```rust,no_run
/// use schemawire::{ConfluentCodec, HttpSchemaRegistry, JsonSerializer, Schema};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = Arc::new(HttpSchemaRegistry::new("http://localhost:8081"));
/// let codec = ConfluentCodec::new(registry, JsonSerializer, tokio::runtime::Handle::current());
///
/// let schema = Schema::parse_shared(r#"{"type":"record","name":"Order","fields":[]}"#)?;
/// let mut frame = Vec::new();
/// let id = codec
///     .encode("orders-value", &schema, &serde_json::json!({}), &mut frame)
///     .await?;
/// println!("framed under id {}", id);
/// # Ok(())
/// # }
/// ```
pub struct ConfluentCodec<S> {
    shared: Arc<Shared>,
    serializer: S,
    handle: Handle,
}

impl<S: ValueSerializer> ConfluentCodec<S> {
    /// Create a codec over an injected registry client and payload
    /// serializer.
    ///
    /// `handle` is the externally owned runtime the codec posts registry
    /// continuations and blocking-wrapper work onto.
    pub fn new(registry: Arc<dyn SchemaRegistry>, serializer: S, handle: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry,
                cache: Mutex::new(SchemaCache::new()),
            }),
            serializer,
            handle,
        }
    }

    // ------------------------------------------------------------------
    // Registration / resolution
    // ------------------------------------------------------------------

    /// Register `schema` under `subject` and cache the assigned id.
    ///
    /// Always a registry round trip; the cache is a write-through side
    /// effect. A transport failure is [`CodecError::NoConnection`]; a
    /// non-positive id from the registry is
    /// [`CodecError::InternalServerError`] and mutates nothing.
    pub async fn register_schema(&self, subject: &str, schema: &SchemaRef) -> CodecResult<SchemaId> {
        self.shared.register(subject, schema).await
    }

    /// Blocking form of [`register_schema`](Self::register_schema); call
    /// only from outside the codec's runtime.
    pub fn register_schema_blocking(
        &self,
        subject: &str,
        schema: &SchemaRef,
    ) -> CodecResult<SchemaId> {
        let shared = Arc::clone(&self.shared);
        let subject = subject.to_string();
        let schema = Arc::clone(schema);
        bridge::wait_on(&self.handle, async move {
            shared.register(&subject, &schema).await
        })
    }

    /// Resolve the schema behind `id`, consulting the cache first.
    ///
    /// A cache hit resolves without I/O but still completes through the
    /// runtime, never inline within the call. A miss asks the registry and
    /// populates both cache sides on success.
    pub async fn resolve_schema(&self, id: SchemaId) -> CodecResult<SchemaRef> {
        self.shared.resolve(id).await
    }

    /// Blocking form of [`resolve_schema`](Self::resolve_schema); call only
    /// from outside the codec's runtime.
    pub fn resolve_schema_blocking(&self, id: SchemaId) -> CodecResult<SchemaRef> {
        let shared = Arc::clone(&self.shared);
        bridge::wait_on(&self.handle, async move { shared.resolve(id).await })
    }

    // ------------------------------------------------------------------
    // Encode
    // ------------------------------------------------------------------

    /// Frame `value` under an already-cached schema, without any I/O.
    ///
    /// If `schema` was never registered (or resolved) through this instance,
    /// returns [`CodecError::WouldBlock`] with zero bytes written; retry via
    /// [`encode`](Self::encode) or register first.
    pub fn encode_nonblocking<W: Write>(
        &self,
        schema: &SchemaRef,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<()> {
        let Some(id) = self.shared.cache.lock().id_for(schema) else {
            return Err(CodecError::WouldBlock);
        };
        self.write_frame(id, schema, value, sink)
    }

    /// Frame `value` under an already-cached id, without any I/O.
    ///
    /// The payload encoder needs the schema, so an id this instance has not
    /// cached returns [`CodecError::WouldBlock`] with zero bytes written.
    pub fn encode_nonblocking_by_id<W: Write>(
        &self,
        id: SchemaId,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<()> {
        let Some(schema) = self.shared.cache.lock().schema_for(id) else {
            return Err(CodecError::WouldBlock);
        };
        self.write_frame(id, &schema, value, sink)
    }

    /// Register `schema` under `subject`, then frame `value` with the
    /// assigned id. Returns that id.
    pub async fn encode<W: Write>(
        &self,
        subject: &str,
        schema: &SchemaRef,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<SchemaId> {
        let id = self.shared.register(subject, schema).await?;
        self.write_frame(id, schema, value, sink)?;
        Ok(id)
    }

    /// Blocking form of [`encode`](Self::encode); call only from outside the
    /// codec's runtime.
    pub fn encode_blocking<W: Write>(
        &self,
        subject: &str,
        schema: &SchemaRef,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<SchemaId> {
        let id = self.register_schema_blocking(subject, schema)?;
        self.write_frame(id, schema, value, sink)?;
        Ok(id)
    }

    /// Stage header + payload and emit the frame in a single write, so a
    /// serializer failure writes nothing and the byte count is exact.
    fn write_frame<W: Write>(
        &self,
        id: SchemaId,
        schema: &Schema,
        value: &S::Value,
        sink: &mut W,
    ) -> CodecResult<()> {
        let mut frame = Vec::with_capacity(HEADER_LEN + 64);
        frame.push(CONFLUENT_MAGIC);
        frame.extend_from_slice(&id.to_be_bytes());
        self.serializer
            .encode(schema, value, &mut frame)
            .map_err(|e| CodecError::EncodeFailed(e.0))?;

        sink.write_all(&frame)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Decode
    // ------------------------------------------------------------------

    /// Decode a frame using only the cache.
    ///
    /// A magic mismatch is [`CodecError::BadMagic`] (the byte is consumed;
    /// no rewind is attempted). The 4-byte id is then read unconditionally.
    /// An id this instance has not cached returns
    /// [`CodecError::WouldBlock`] without any network call; retry via
    /// [`decode`](Self::decode).
    pub fn decode_nonblocking<R: Read>(&self, source: &mut R) -> CodecResult<Decoded<S::Value>> {
        let id = read_header(source)?;
        let Some(schema) = self.shared.cache.lock().schema_for(id) else {
            log::debug!("non-blocking decode: id {} not cached", id);
            return Err(CodecError::WouldBlock);
        };
        self.decode_payload(id, schema, source)
    }

    /// Decode a frame, resolving an uncached id through the registry.
    pub async fn decode<R: Read>(&self, source: &mut R) -> CodecResult<Decoded<S::Value>> {
        let id = read_header(source)?;
        let schema = self.shared.resolve(id).await?;
        self.decode_payload(id, schema, source)
    }

    /// Blocking form of [`decode`](Self::decode); call only from outside the
    /// codec's runtime.
    pub fn decode_blocking<R: Read>(&self, source: &mut R) -> CodecResult<Decoded<S::Value>> {
        let id = read_header(source)?;
        let schema = {
            let shared = Arc::clone(&self.shared);
            bridge::wait_on(&self.handle, async move { shared.resolve(id).await })?
        };
        self.decode_payload(id, schema, source)
    }

    fn decode_payload<R: Read>(
        &self,
        id: SchemaId,
        schema: SchemaRef,
        source: &mut R,
    ) -> CodecResult<Decoded<S::Value>> {
        let mut payload = Vec::new();
        source.read_to_end(&mut payload)?;

        let value = self
            .serializer
            .decode(&schema, &payload)
            .map_err(|e| CodecError::DecodeFailed(e.0))?;

        Ok(Decoded { id, schema, value })
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Number of schema ids this instance has cached.
    pub fn cached_schemas(&self) -> usize {
        self.shared.cache.lock().len()
    }
}

/// Parse the magic byte, then the id -- the id bytes are consumed
/// unconditionally once the magic matched.
fn read_header<R: Read>(source: &mut R) -> CodecResult<SchemaId> {
    let mut magic = [0u8; 1];
    source.read_exact(&mut magic)?;
    if magic[0] != CONFLUENT_MAGIC {
        return Err(CodecError::BadMagic { found: magic[0] });
    }

    let mut id = [0u8; 4];
    source.read_exact(&mut id)?;
    Ok(SchemaId::from_be_bytes(id))
}
