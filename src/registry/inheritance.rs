//! Object-class inheritance resolution.
//!
//! Resolves a set of object classes, as attached to a directory entry, to the
//! closure of their superiors and the merged must/may attribute sets. The result
//! depends only on the set of classes, never on the order they were supplied,
//! and is memoized per combination on the frozen registry.

use super::core::{Frozen, SchemaRegistry};
use crate::error::{SchemaError, SchemaResult};
use crate::schema::{ObjectClassKind, SchemaObjectKind};

use log::trace;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, PoisonError};

/// Effective attribute sets for a combination of object classes.
///
/// All members are canonical OIDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveAttributes {
    /// The requested classes
    pub requested: BTreeSet<String>,
    /// Requested classes plus every transitive superior
    pub closure: BTreeSet<String>,
    /// Structural classes found in the closure
    pub structural: BTreeSet<String>,
    /// Union of `must` across the closure
    pub must: BTreeSet<String>,
    /// Union of `may` across the closure, including every `must` attribute
    pub may: BTreeSet<String>,
}

impl EffectiveAttributes {
    /// Whether `oid` is mandatory.
    pub fn requires(&self, oid: &str) -> bool {
        self.must.contains(oid)
    }

    /// Whether `oid` may appear on the entry at all.
    pub fn permits(&self, oid: &str) -> bool {
        self.may.contains(oid)
    }

    /// Whether the closure includes the class `oid`.
    pub fn includes_class(&self, oid: &str) -> bool {
        self.closure.contains(oid)
    }
}

impl SchemaRegistry<Frozen> {
    /// Compute the effective must/may attribute sets for a set of object classes.
    ///
    /// Classes may be given by OID or name, in any order, with repeats. Fails
    /// with `NotFound` for an unknown class.
    pub fn resolve_effective_attributes<I, S>(
        &self,
        object_classes: I,
    ) -> SchemaResult<Arc<EffectiveAttributes>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut requested = BTreeSet::new();
        for id in object_classes {
            let class = self.lookup_object_class(id.as_ref())?;
            requested.insert(class.oid.clone());
        }
        let key: Vec<String> = requested.iter().cloned().collect();

        if self.config.cache_resolutions {
            let cached = self
                .resolutions
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&key)
                .cloned();
            if let Some(cached) = cached {
                trace!("Resolution cache hit for {:?}", key);
                return Ok(cached);
            }
        }

        // Computed outside the lock; a concurrent miss on the same key keeps
        // whichever result was stored first
        let resolved = Arc::new(self.compute_effective_attributes(requested)?);

        if !self.config.cache_resolutions {
            return Ok(resolved);
        }
        let stored = self
            .resolutions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(resolved)
            .clone();
        Ok(stored)
    }

    /// Transitive superior closure of a set of classes, including the classes.
    pub fn superior_closure<I, S>(&self, object_classes: I) -> SchemaResult<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.resolve_effective_attributes(object_classes)?.closure.clone())
    }

    fn compute_effective_attributes(
        &self,
        requested: BTreeSet<String>,
    ) -> SchemaResult<EffectiveAttributes> {
        let mut result = EffectiveAttributes {
            requested: requested.clone(),
            ..Default::default()
        };

        // Breadth-first walk of the superior DAG; the visited set keeps shared
        // ancestors from being expanded twice.
        let mut queue: VecDeque<String> = requested.into_iter().collect();
        while let Some(oid) = queue.pop_front() {
            if !result.closure.insert(oid.clone()) {
                continue;
            }
            let class = self
                .store
                .object_classes
                .get(&oid)
                .ok_or_else(|| SchemaError::not_found(SchemaObjectKind::ObjectClass, &oid))?;

            if class.kind == ObjectClassKind::Structural {
                result.structural.insert(oid.clone());
            }
            result.must.extend(class.must.iter().cloned());
            result.may.extend(class.may.iter().cloned());
            queue.extend(
                class
                    .superiors
                    .iter()
                    .filter(|superior| !result.closure.contains(*superior))
                    .cloned(),
            );
        }

        let must = result.must.clone();
        result.may.extend(must);
        Ok(result)
    }
}
