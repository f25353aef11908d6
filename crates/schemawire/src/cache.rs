// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bidirectional schema/id cache.
//!
//! A process-lifetime, append-only bijection between schema handles and
//! registry ids. Both directions are written by a single [`SchemaCache::insert`]
//! call, so under the owning lock no id ever appears on one side without the
//! other.
//!
//! The schema side is keyed on `Arc` identity: two independently parsed but
//! structurally identical schemas are distinct keys. Callers that want cache
//! hits must reuse the same [`SchemaRef`].

use crate::schema::{SchemaId, SchemaRef};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity key for the schema side of the cache.
#[derive(Clone)]
struct SchemaKey(SchemaRef);

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

/// Bidirectional schema <-> id map.
#[derive(Default)]
pub(crate) struct SchemaCache {
    schema_to_id: HashMap<SchemaKey, SchemaId>,
    id_to_schema: HashMap<SchemaId, SchemaRef>,
}

impl SchemaCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert into both directions in one step.
    ///
    /// Re-inserting an id overwrites with an equivalent value: the registry
    /// is deterministic per id, so the last of several concurrent misses
    /// winning the write is acceptable.
    pub(crate) fn insert(&mut self, schema: &SchemaRef, id: SchemaId) {
        self.schema_to_id.insert(SchemaKey(Arc::clone(schema)), id);
        self.id_to_schema.insert(id, Arc::clone(schema));
    }

    pub(crate) fn id_for(&self, schema: &SchemaRef) -> Option<SchemaId> {
        self.schema_to_id.get(&SchemaKey(Arc::clone(schema))).copied()
    }

    pub(crate) fn schema_for(&self, id: SchemaId) -> Option<SchemaRef> {
        self.id_to_schema.get(&id).cloned()
    }

    /// Number of cached ids.
    pub(crate) fn len(&self) -> usize {
        self.id_to_schema.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.id_to_schema.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    const TEXT: &str = r#"{"type":"record","name":"T","fields":[]}"#;

    #[test]
    fn insert_populates_both_sides() {
        let schema = Schema::parse_shared(TEXT).unwrap();
        let mut cache = SchemaCache::new();
        assert!(cache.is_empty());

        cache.insert(&schema, 7);
        assert_eq!(cache.id_for(&schema), Some(7));
        let back = cache.schema_for(7).unwrap();
        assert!(Arc::ptr_eq(&back, &schema));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn identity_keying_distinguishes_equal_parses() {
        let a = Schema::parse_shared(TEXT).unwrap();
        let b = Schema::parse_shared(TEXT).unwrap();

        let mut cache = SchemaCache::new();
        cache.insert(&a, 7);

        // Structurally equal, but a different handle: not a hit.
        assert_eq!(cache.id_for(&b), None);
        assert_eq!(cache.id_for(&a), Some(7));
    }

    #[test]
    fn reinsert_overwrites_with_equivalent_value() {
        let a = Schema::parse_shared(TEXT).unwrap();
        let b = Schema::parse_shared(TEXT).unwrap();

        let mut cache = SchemaCache::new();
        cache.insert(&a, 7);
        cache.insert(&b, 7);

        // Last write wins on the id side; both handles stay resolvable
        // on the schema side.
        let resolved = cache.schema_for(7).unwrap();
        assert!(Arc::ptr_eq(&resolved, &b));
        assert_eq!(cache.id_for(&a), Some(7));
        assert_eq!(cache.id_for(&b), Some(7));
        assert_eq!(cache.len(), 1);
    }
}
