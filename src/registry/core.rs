//! Registry storage, state markers, lookups and freezing.

use super::inheritance::EffectiveAttributes;
use crate::config::RegistryConfig;
use crate::error::{SchemaError, SchemaResult};
use crate::schema::types::{fold_name, looks_like_oid};
use crate::schema::{
    AttributeType, MatchingRule, ObjectClass, SchemaDescriptor, SchemaObjectKind, Syntax,
};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

/// State marker for a registry that is still accepting schemas.
///
/// Lookups are not available in this state.
#[derive(Debug)]
pub struct Loading;

/// State marker for an immutable registry serving queries.
#[derive(Debug)]
pub struct Frozen;

/// Registry lifecycle state.
pub trait RegistryState: private::Sealed {
    const FROZEN: bool;
}

impl RegistryState for Loading {
    const FROZEN: bool = false;
}

impl RegistryState for Frozen {
    const FROZEN: bool = true;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Loading {}
    impl Sealed for super::Frozen {}
}

/// Record of one schema merged into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSchema {
    pub descriptor: SchemaDescriptor,
    /// OIDs contributed by the schema, in emission order
    pub oids: Vec<String>,
}

/// Indexed store of every merged definition.
///
/// References inside stored definitions (superiors, must/may, syntaxes and
/// matching rules) are canonical OIDs.
#[derive(Debug, Default)]
pub(crate) struct SchemaStore {
    pub(crate) syntaxes: HashMap<String, Syntax>,
    pub(crate) matching_rules: HashMap<String, MatchingRule>,
    pub(crate) attribute_types: HashMap<String, AttributeType>,
    pub(crate) object_classes: HashMap<String, ObjectClass>,
    /// OID -> (kind, owning schema)
    pub(crate) owners: HashMap<String, (SchemaObjectKind, String)>,
    /// (kind, folded name) -> OID
    pub(crate) names: HashMap<(SchemaObjectKind, String), String>,
}

impl SchemaStore {
    /// Resolve an OID or name to the OID of a stored object of `kind`.
    pub(crate) fn resolve(&self, kind: SchemaObjectKind, id: &str) -> Option<&str> {
        if looks_like_oid(id) {
            match self.owners.get_key_value(id) {
                Some((oid, (owner_kind, _))) if *owner_kind == kind => Some(oid.as_str()),
                _ => None,
            }
        } else {
            self.names
                .get(&(kind, fold_name(id)))
                .map(String::as_str)
        }
    }

    fn len(&self) -> usize {
        self.owners.len()
    }
}

/// Registry of directory schema objects.
///
/// The type parameter encodes the lifecycle: a `SchemaRegistry<Loading>` merges
/// schemas, a `SchemaRegistry<Frozen>` (the default) answers queries. Freezing
/// is one-way; a reload builds a new registry from scratch.
pub struct SchemaRegistry<State: RegistryState = Frozen> {
    pub(crate) config: RegistryConfig,
    pub(crate) store: SchemaStore,
    pub(crate) schemas: Vec<LoadedSchema>,
    generation: u64,
    frozen_at: Option<DateTime<Utc>>,
    fingerprint: Option<String>,
    pub(crate) resolutions: RwLock<HashMap<Vec<String>, Arc<EffectiveAttributes>>>,
    _state: PhantomData<State>,
}

impl<State: RegistryState> fmt::Debug for SchemaRegistry<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("state", &std::any::type_name::<State>())
            .field("generation", &self.generation)
            .field("schemas", &self.schema_names())
            .field("objects", &self.store.len())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl<State: RegistryState> SchemaRegistry<State> {
    /// Whether the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        State::FROZEN
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Whether a schema of this name has been merged.
    pub fn is_loaded(&self, schema: &str) -> bool {
        self.schemas.iter().any(|s| s.descriptor.name == schema)
    }

    /// Names of merged schemas in load order.
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas
            .iter()
            .map(|s| s.descriptor.name.as_str())
            .collect()
    }

    /// Whether any schema object already uses `oid`.
    pub fn contains_oid(&self, oid: &str) -> bool {
        self.store.owners.contains_key(oid)
    }

    /// Total number of schema objects.
    pub fn object_count(&self) -> usize {
        self.store.len()
    }
}

impl SchemaRegistry<Loading> {
    /// Create an empty registry ready to load schemas.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            store: SchemaStore::default(),
            schemas: Vec::new(),
            generation: 1,
            frozen_at: None,
            fingerprint: None,
            resolutions: RwLock::new(HashMap::new()),
            _state: PhantomData,
        }
    }

    /// Generation number the frozen registry will carry.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Stop accepting schemas and switch to query mode.
    pub fn freeze(self) -> SchemaRegistry<Frozen> {
        let fingerprint = match canonical_content(&self.store) {
            Ok(content) => digest(&content),
            Err(e) => {
                error!("Cannot serialise schema content, fingerprinting OIDs only: {}", e);
                let mut oids: Vec<&str> = self.store.owners.keys().map(String::as_str).collect();
                oids.sort_unstable();
                digest(oids.join("\n").as_bytes())
            }
        };
        let frozen_at = Utc::now();
        info!(
            "Schema registry generation {} frozen: {} schemas, {} objects, fingerprint {}",
            self.generation,
            self.schemas.len(),
            self.store.len(),
            fingerprint
        );

        SchemaRegistry {
            config: self.config,
            store: self.store,
            schemas: self.schemas,
            generation: self.generation,
            frozen_at: Some(frozen_at),
            fingerprint: Some(fingerprint),
            resolutions: self.resolutions,
            _state: PhantomData,
        }
    }
}

impl SchemaRegistry<Frozen> {
    /// Look up an attribute type by OID or case-insensitive name.
    pub fn lookup_attribute_type(&self, id: &str) -> SchemaResult<&AttributeType> {
        self.store
            .resolve(SchemaObjectKind::AttributeType, id)
            .and_then(|oid| self.store.attribute_types.get(oid))
            .ok_or_else(|| SchemaError::not_found(SchemaObjectKind::AttributeType, id))
    }

    /// Look up an object class by OID or case-insensitive name.
    pub fn lookup_object_class(&self, id: &str) -> SchemaResult<&ObjectClass> {
        self.store
            .resolve(SchemaObjectKind::ObjectClass, id)
            .and_then(|oid| self.store.object_classes.get(oid))
            .ok_or_else(|| SchemaError::not_found(SchemaObjectKind::ObjectClass, id))
    }

    /// Look up a syntax by OID.
    pub fn lookup_syntax(&self, oid: &str) -> SchemaResult<&Syntax> {
        self.store
            .syntaxes
            .get(oid)
            .ok_or_else(|| SchemaError::not_found(SchemaObjectKind::Syntax, oid))
    }

    /// Look up a matching rule by OID or case-insensitive name.
    pub fn lookup_matching_rule(&self, id: &str) -> SchemaResult<&MatchingRule> {
        self.store
            .resolve(SchemaObjectKind::MatchingRule, id)
            .and_then(|oid| self.store.matching_rules.get(oid))
            .ok_or_else(|| SchemaError::not_found(SchemaObjectKind::MatchingRule, id))
    }

    /// Name of the schema that contributed `oid`.
    pub fn owning_schema(&self, oid: &str) -> Option<&str> {
        self.store
            .owners
            .get(oid)
            .map(|(_, schema)| schema.as_str())
    }

    /// Every merged schema in load order.
    pub fn schemas(&self) -> &[LoadedSchema] {
        &self.schemas
    }

    pub fn schema(&self, name: &str) -> Option<&LoadedSchema> {
        self.schemas.iter().find(|s| s.descriptor.name == name)
    }

    pub fn attribute_types(&self) -> impl Iterator<Item = &AttributeType> {
        self.store.attribute_types.values()
    }

    pub fn object_classes(&self) -> impl Iterator<Item = &ObjectClass> {
        self.store.object_classes.values()
    }

    /// Canonical names for a set of attribute-type OIDs, in OID order.
    pub fn attribute_names<'a, I>(&'a self, oids: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        oids.into_iter()
            .map(|oid| {
                self.store
                    .attribute_types
                    .get(oid)
                    .map(AttributeType::name)
                    .unwrap_or(oid.as_str())
            })
            .collect()
    }

    /// Reload generation this registry belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frozen_at(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_default()
    }

    /// Content fingerprint over every definition, stable across load orders.
    pub fn fingerprint(&self) -> &str {
        self.fingerprint.as_deref().unwrap_or_default()
    }

    /// Number of memoized inheritance resolutions.
    pub fn cached_resolutions(&self) -> usize {
        self.resolutions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum CanonicalObject<'a> {
    Syntax(&'a Syntax),
    MatchingRule(&'a MatchingRule),
    AttributeType(&'a AttributeType),
    ObjectClass(&'a ObjectClass),
}

/// Canonical JSON of every definition, keyed by OID.
fn canonical_content(store: &SchemaStore) -> serde_json::Result<Vec<u8>> {
    let mut canonical: BTreeMap<&str, CanonicalObject<'_>> = BTreeMap::new();
    canonical.extend(
        store
            .syntaxes
            .iter()
            .map(|(k, v)| (k.as_str(), CanonicalObject::Syntax(v))),
    );
    canonical.extend(
        store
            .matching_rules
            .iter()
            .map(|(k, v)| (k.as_str(), CanonicalObject::MatchingRule(v))),
    );
    canonical.extend(
        store
            .attribute_types
            .iter()
            .map(|(k, v)| (k.as_str(), CanonicalObject::AttributeType(v))),
    );
    canonical.extend(
        store
            .object_classes
            .iter()
            .map(|(k, v)| (k.as_str(), CanonicalObject::ObjectClass(v))),
    );

    serde_json::to_vec(&canonical)
}

/// SHA-256 of `content`, base64 of the first 8 bytes.
fn digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let hash = hasher.finalize();
    BASE64.encode(&hash[..8])
}
