// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Confluent-compatible REST registry client.
//!
//! Speaks the two endpoints the codec needs:
//!
//! - `POST {base}/subjects/{subject}/versions` with `{"schema": "<text>"}`
//!   returning `{"id": N}`
//! - `GET {base}/schemas/ids/{id}` returning `{"schema": "<text>"}`
//!
//! Connection errors and timeouts surface as [`RegistryError::Transport`],
//! HTTP 404 as [`RegistryError::NotFound`], other non-success statuses as
//! [`RegistryError::Server`], and unparsable bodies as
//! [`RegistryError::MalformedResponse`]. There is no retry loop here; if a
//! deployment wants one it belongs in this layer, not in the codec.

use super::{RegistryError, RegistryResult, SchemaRegistry};
use crate::schema::{Schema, SchemaId, SchemaRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// Authentication for the registry endpoint.
#[derive(Debug, Clone, Default)]
pub enum RegistryAuth {
    /// No authentication.
    #[default]
    None,
    /// HTTP basic auth.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// Bearer token.
    Bearer {
        /// Token value.
        token: String,
    },
}

/// Configuration for [`HttpSchemaRegistry`].
#[derive(Debug, Clone)]
pub struct HttpRegistryConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Authentication to attach to every request.
    pub auth: RegistryAuth,
}

impl Default for HttpRegistryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            auth: RegistryAuth::None,
        }
    }
}

/// REST client for a Confluent-compatible schema registry.
pub struct HttpSchemaRegistry {
    base_url: String,
    client: reqwest::Client,
    config: HttpRegistryConfig,
}

#[derive(Serialize)]
struct RegisterSchemaRequest<'a> {
    schema: &'a str,
}

#[derive(Deserialize)]
struct RegisterSchemaResponse {
    id: SchemaId,
}

#[derive(Deserialize)]
struct GetSchemaResponse {
    schema: String,
}

impl HttpSchemaRegistry {
    /// Create a client against `base_url` (e.g. `http://localhost:8081`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, HttpRegistryConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(base_url: impl Into<String>, config: HttpRegistryConfig) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The registry endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .timeout(self.config.timeout);

        req = match &self.config.auth {
            RegistryAuth::None => req,
            RegistryAuth::Basic { username, password } => req.basic_auth(username, Some(password)),
            RegistryAuth::Bearer { token } => req.bearer_auth(token),
        };

        req
    }

    async fn check_status(
        response: reqwest::Response,
        what: &str,
    ) -> RegistryResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::debug!("registry 404 for {}", what);
            return Err(RegistryError::NotFound(what.to_string()));
        }

        log::warn!("registry error {} for {}: {}", status, what, message);
        Err(RegistryError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SchemaRegistry for HttpSchemaRegistry {
    async fn put_schema(&self, subject: &str, schema: &SchemaRef) -> RegistryResult<SchemaId> {
        let url = format!("{}/subjects/{}/versions", self.base_url, subject);
        let body = RegisterSchemaRequest {
            schema: schema.canonical_form(),
        };

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        let response = Self::check_status(response, &format!("subject {}", subject)).await?;

        let parsed: RegisterSchemaResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        log::debug!("registered subject {} as id {}", subject, parsed.id);
        Ok(parsed.id)
    }

    async fn get_schema_by_id(&self, id: SchemaId) -> RegistryResult<SchemaRef> {
        let url = format!("{}/schemas/ids/{}", self.base_url, id);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        let response = Self::check_status(response, &format!("schema id {}", id)).await?;

        let parsed: GetSchemaResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        let schema = Schema::parse_shared(&parsed.schema)
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        log::debug!("fetched schema for id {}", id);
        Ok(schema)
    }
}
