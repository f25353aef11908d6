// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by all framing codecs.
//!
//! Two failure classes exist. Local protocol failures (bad magic, id or
//! fingerprint mismatch) are detected without any I/O and never mutate the
//! cache. Collaborator failures (registry transport, payload serializer) are
//! caught at the call boundary and mapped into this taxonomy; they never
//! propagate unmapped.
//!
//! [`CodecError::WouldBlock`] is a control-flow signal, not a failure: it
//! tells the caller that completing the operation would require registry I/O
//! the non-blocking variant is not allowed to perform.

use crate::fingerprint::SchemaFingerprint;
use crate::schema::SchemaId;
use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced by the framing codecs.
#[derive(Debug)]
pub enum CodecError {
    /// The operation needs registry I/O that the non-blocking variant must
    /// not perform. Retry via the registry-calling counterpart.
    WouldBlock,

    /// The registry has no entry for the requested id or subject.
    NotFound,

    /// The registry could not be reached.
    NoConnection(String),

    /// The registry answered, but the answer was unusable (missing schema,
    /// non-positive id, malformed body).
    InternalServerError,

    /// The frame does not start with the expected magic byte.
    ///
    /// The offending byte has already been consumed from the source; no
    /// rewind is attempted.
    BadMagic {
        /// The byte actually read.
        found: u8,
    },

    /// The frame's schema id does not match the caller-supplied id.
    IdMismatch {
        /// Id the caller expected.
        expected: SchemaId,
        /// Id found in the frame header.
        found: SchemaId,
    },

    /// The frame's schema fingerprint does not match the local schema.
    FingerprintMismatch {
        /// Fingerprint of the local schema.
        expected: SchemaFingerprint,
        /// Fingerprint found in the frame header.
        found: SchemaFingerprint,
    },

    /// The payload serializer failed while encoding.
    EncodeFailed(String),

    /// The payload serializer failed while decoding.
    DecodeFailed(String),

    /// Sink or source I/O error while reading/writing frame bytes.
    Io(std::io::Error),

    /// The codec's runtime was shut down while an operation was pending.
    Shutdown,
}

impl CodecError {
    /// Returns true for the non-blocking control-flow signal.
    pub const fn is_would_block(&self) -> bool {
        matches!(self, CodecError::WouldBlock)
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::WouldBlock => write!(f, "operation would block on registry I/O"),
            CodecError::NotFound => write!(f, "schema not found in registry"),
            CodecError::NoConnection(msg) => write!(f, "registry unreachable: {}", msg),
            CodecError::InternalServerError => write!(f, "registry returned an unusable answer"),
            CodecError::BadMagic { found } => {
                write!(f, "bad magic byte: expected 0x00, found {:#04x}", found)
            }
            CodecError::IdMismatch { expected, found } => {
                write!(f, "schema id mismatch: expected {}, found {}", expected, found)
            }
            CodecError::FingerprintMismatch { expected, found } => {
                write!(
                    f,
                    "schema fingerprint mismatch: expected {}, found {}",
                    expected, found
                )
            }
            CodecError::EncodeFailed(msg) => write!(f, "payload encode failed: {}", msg),
            CodecError::DecodeFailed(msg) => write!(f, "payload decode failed: {}", msg),
            CodecError::Io(e) => write!(f, "frame I/O error: {}", e),
            CodecError::Shutdown => write!(f, "codec runtime shut down"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e)
    }
}
