// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema handle and canonical text form.
//!
//! A [`Schema`] is parsed once from JSON text and then treated as opaque by
//! the codecs: the cache compares schemas by *identity* (`Arc` pointer), not
//! by re-parsing per call. Two independently parsed but structurally
//! identical schemas are therefore distinct cache keys unless the caller
//! reuses the same [`SchemaRef`].
//!
//! The canonical form backs fingerprinting: the parsed document is re-emitted
//! compact with lexicographically sorted object keys, which collapses
//! whitespace and attribute-order variance. JSON array order is preserved --
//! record field order is part of a schema's meaning.

use std::fmt;
use std::sync::Arc;

/// Registry-assigned schema id.
///
/// Positive and stable per (subject, schema) pair; not guaranteed contiguous
/// or meaningful across registries.
pub type SchemaId = i32;

/// Shared, immutable schema handle.
///
/// Cache identity follows the `Arc` pointer, so hold on to this and reuse it
/// for every encode call against the same schema.
pub type SchemaRef = Arc<Schema>;

/// Errors produced while parsing schema text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema text is empty or whitespace only.
    EmptyContent,
    /// The schema text is not valid JSON.
    Syntax(String),
    /// The JSON root is not a usable schema shape (object, string or array).
    UnsupportedRoot(&'static str),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptyContent => write!(f, "schema content is empty"),
            SchemaError::Syntax(msg) => write!(f, "schema is not valid JSON: {}", msg),
            SchemaError::UnsupportedRoot(kind) => {
                write!(f, "schema root must be an object, string or array, got {}", kind)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A validated schema: parsed JSON document plus its canonical text form.
#[derive(Debug, Clone)]
pub struct Schema {
    canonical: String,
    document: serde_json::Value,
}

impl Schema {
    /// Parse schema text, validate its shape and compute the canonical form.
    pub fn parse(text: &str) -> Result<Schema, SchemaError> {
        if text.trim().is_empty() {
            return Err(SchemaError::EmptyContent);
        }

        let document: serde_json::Value =
            serde_json::from_str(text).map_err(|e| SchemaError::Syntax(e.to_string()))?;

        match &document {
            serde_json::Value::Object(_)
            | serde_json::Value::String(_)
            | serde_json::Value::Array(_) => {}
            serde_json::Value::Null => return Err(SchemaError::UnsupportedRoot("null")),
            serde_json::Value::Bool(_) => return Err(SchemaError::UnsupportedRoot("bool")),
            serde_json::Value::Number(_) => return Err(SchemaError::UnsupportedRoot("number")),
        }

        // serde_json maps are key-sorted, so re-serializing the parsed
        // document yields the canonical compact form directly.
        let canonical =
            serde_json::to_string(&document).map_err(|e| SchemaError::Syntax(e.to_string()))?;

        Ok(Schema { canonical, document })
    }

    /// Parse schema text into a shared handle.
    pub fn parse_shared(text: &str) -> Result<SchemaRef, SchemaError> {
        Self::parse(text).map(Arc::new)
    }

    /// Canonical compact text form (sorted keys, no incidental whitespace).
    pub fn canonical_form(&self) -> &str {
        &self.canonical
    }

    /// The parsed schema document.
    pub fn document(&self) -> &serde_json::Value {
        &self.document
    }

    /// The schema's `"name"` attribute, if the root carries one.
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(|n| n.as_str())
    }
}

// Structural equality follows the canonical form; cache keys do not use this
// (they key on Arc identity).
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Schema {}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{"type":"record","name":"Point","fields":[
        {"name":"x","type":"long"},
        {"name":"y","type":"long"}
    ]}"#;

    #[test]
    fn canonical_collapses_whitespace_and_key_order() {
        let a = Schema::parse(RECORD).unwrap();
        let b = Schema::parse(
            r#"{ "fields": [ {"type":"long","name":"x"}, {"type":"long","name":"y"} ],
                 "name": "Point", "type": "record" }"#,
        )
        .unwrap();
        assert_eq!(a.canonical_form(), b.canonical_form());
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_preserves_field_order() {
        let xy = Schema::parse(RECORD).unwrap();
        let yx = Schema::parse(
            r#"{"type":"record","name":"Point","fields":[
                {"name":"y","type":"long"},
                {"name":"x","type":"long"}
            ]}"#,
        )
        .unwrap();
        assert_ne!(xy.canonical_form(), yx.canonical_form());
    }

    #[test]
    fn parse_rejects_empty_and_garbage() {
        assert_eq!(Schema::parse("   "), Err(SchemaError::EmptyContent));
        assert!(matches!(Schema::parse("{not json"), Err(SchemaError::Syntax(_))));
        assert_eq!(
            Schema::parse("42"),
            Err(SchemaError::UnsupportedRoot("number"))
        );
        assert_eq!(
            Schema::parse("true"),
            Err(SchemaError::UnsupportedRoot("bool"))
        );
    }

    #[test]
    fn primitive_and_union_roots_are_accepted() {
        assert!(Schema::parse(r#""string""#).is_ok());
        assert!(Schema::parse(r#"["null","long"]"#).is_ok());
    }

    #[test]
    fn name_attribute() {
        let s = Schema::parse(RECORD).unwrap();
        assert_eq!(s.name(), Some("Point"));
        assert_eq!(Schema::parse(r#""string""#).unwrap().name(), None);
    }

    #[test]
    fn independent_parses_are_distinct_handles() {
        let a = Schema::parse_shared(RECORD).unwrap();
        let b = Schema::parse_shared(RECORD).unwrap();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
