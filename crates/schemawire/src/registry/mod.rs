// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema registry collaborator seam.
//!
//! The codec talks to the registry through [`SchemaRegistry`], an injected
//! async client. Transport, JSON framing, authentication and retry policy
//! are the implementation's business; the codec only maps the typed outcome
//! into its own taxonomy.
//!
//! [`HttpSchemaRegistry`] (feature `registry-http`, on by default) is the
//! bundled Confluent-compatible REST implementation.

#[cfg(feature = "registry-http")]
pub mod http;

#[cfg(feature = "registry-http")]
pub use http::{HttpRegistryConfig, HttpSchemaRegistry, RegistryAuth};

use crate::schema::{SchemaId, SchemaRef};
use async_trait::async_trait;
use std::fmt;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors produced by a registry client.
#[derive(Debug)]
pub enum RegistryError {
    /// The registry could not be reached (connect, DNS, timeout).
    Transport(String),

    /// The registry answered 404 for the requested id or subject.
    NotFound(String),

    /// The registry answered with a non-success status.
    Server {
        /// HTTP-style status code.
        status: u16,
        /// Response body or reason, if any.
        message: String,
    },

    /// The registry answered success but the body was unusable.
    MalformedResponse(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Transport(msg) => write!(f, "registry transport error: {}", msg),
            RegistryError::NotFound(what) => write!(f, "registry has no entry for {}", what),
            RegistryError::Server { status, message } => {
                write!(f, "registry error {}: {}", status, message)
            }
            RegistryError::MalformedResponse(msg) => {
                write!(f, "malformed registry response: {}", msg)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Async schema registry client.
///
/// Implementations own their transport entirely; the codec never retries or
/// times out on their behalf.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// Register `schema` under `subject`, returning the assigned id.
    ///
    /// Registering the same (subject, schema) pair again returns the same id.
    async fn put_schema(&self, subject: &str, schema: &SchemaRef) -> RegistryResult<SchemaId>;

    /// Fetch the schema a registry previously assigned `id` to.
    async fn get_schema_by_id(&self, id: SchemaId) -> RegistryResult<SchemaRef>;
}
