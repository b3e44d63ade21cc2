//! Schema merging and validation.
//!
//! A schema is merged in three steps. Its producers run and their output is
//! staged. The validator then checks every staged definition against the store
//! and against the rest of the stage, canonicalising references to OIDs as it
//! goes. Only when the whole stage is clean is it committed; otherwise every
//! violation is returned and the store is left untouched.

use super::core::{LoadedSchema, Loading, SchemaRegistry, SchemaStore};
use crate::config::RegistryConfig;
use crate::error::SchemaError;
use crate::producer::{SchemaSource, StagedDefinition, StagingCallback};
use crate::schema::types::{fold_name, is_valid_name, is_valid_oid, looks_like_oid};
use crate::schema::{AttributeType, MatchingRule, ObjectClass, SchemaObject, SchemaObjectKind};

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

impl SchemaRegistry<Loading> {
    /// Merge one schema into the registry.
    ///
    /// Runs the source's producers, validates their output and commits it as a
    /// unit. On failure nothing from the schema is visible and every violation
    /// found is returned.
    pub fn load(&mut self, source: &SchemaSource) -> Result<&LoadedSchema, Vec<SchemaError>> {
        let name = source.name();
        debug!("Loading schema '{}'", name);

        if self.is_loaded(name) {
            return Err(vec![SchemaError::DuplicateSchema {
                schema: name.to_string(),
            }]);
        }

        let missing: Vec<SchemaError> = source
            .descriptor
            .dependencies
            .iter()
            .filter(|dep| !self.is_loaded(dep))
            .map(|dep| SchemaError::missing_dependency(name, dep))
            .collect();
        if !missing.is_empty() {
            warn!("Schema '{}' loaded before its dependencies", name);
            return Err(missing);
        }

        let mut staging = StagingCallback::default();
        for producer in source.producers() {
            if let Err(error) = producer.produce(self, &mut staging) {
                warn!(
                    "Producer '{}' failed for schema '{}', discarding {} staged definitions: {}",
                    producer.name(),
                    name,
                    staging.definitions.len(),
                    error
                );
                return Err(vec![SchemaError::Producer {
                    producer: producer.name().to_string(),
                    source: error,
                }]);
            }
        }

        let definitions = Validator::new(&self.store, &self.config, name)
            .validate(staging.definitions)
            .inspect_err(|errors| {
                warn!("Schema '{}' rejected with {} violations", name, errors.len());
            })?;

        let oids = self.commit(name, definitions);
        info!("Loaded schema '{}' ({} definitions)", name, oids.len());

        self.schemas.push(LoadedSchema {
            descriptor: source.descriptor.clone(),
            oids,
        });
        let index = self.schemas.len() - 1;
        Ok(&self.schemas[index])
    }

    fn commit(&mut self, schema: &str, definitions: Vec<SchemaObject>) -> Vec<String> {
        let store = &mut self.store;
        let mut oids = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let oid = definition.oid().to_string();
            let kind = definition.kind();
            for name in definition.names() {
                store.names.insert((kind, fold_name(name)), oid.clone());
            }
            store
                .owners
                .insert(oid.clone(), (kind, schema.to_string()));

            match definition {
                SchemaObject::Syntax(s) => {
                    store.syntaxes.insert(oid.clone(), s);
                }
                SchemaObject::MatchingRule(m) => {
                    store.matching_rules.insert(oid.clone(), m);
                }
                SchemaObject::AttributeType(a) => {
                    store.attribute_types.insert(oid.clone(), a);
                }
                SchemaObject::ObjectClass(o) => {
                    store.object_classes.insert(oid.clone(), o);
                }
            }
            oids.push(oid);
        }

        oids
    }
}

/// Checks one schema's staged definitions against the store.
struct Validator<'a> {
    store: &'a SchemaStore,
    config: &'a RegistryConfig,
    schema: &'a str,
    errors: Vec<SchemaError>,
    /// OID -> kind, for definitions staged so far
    staged_oids: HashMap<String, SchemaObjectKind>,
    /// (kind, folded name) -> OID, for definitions staged so far
    staged_names: HashMap<(SchemaObjectKind, String), String>,
}

impl<'a> Validator<'a> {
    fn new(store: &'a SchemaStore, config: &'a RegistryConfig, schema: &'a str) -> Self {
        Self {
            store,
            config,
            schema,
            errors: Vec::new(),
            staged_oids: HashMap::new(),
            staged_names: HashMap::new(),
        }
    }

    fn validate(
        mut self,
        staged: Vec<StagedDefinition>,
    ) -> Result<Vec<SchemaObject>, Vec<SchemaError>> {
        // Step 1: Well-formedness and uniqueness, in emission order
        for item in &staged {
            self.check_identity(item);
        }

        // Step 2: Canonicalise every reference to an OID
        let definitions: Vec<SchemaObject> = staged
            .into_iter()
            .map(|item| self.canonicalize(item.definition))
            .collect();

        // Step 3: Superior chains introduced by this schema must be acyclic
        self.check_inheritance_cycles(&definitions);

        if self.errors.is_empty() {
            Ok(definitions)
        } else {
            Err(self.errors)
        }
    }

    fn check_identity(&mut self, item: &StagedDefinition) {
        let definition = &item.definition;
        let oid = definition.oid();
        let kind = definition.kind();

        if item.announced_oid != oid {
            self.errors.push(SchemaError::invalid_definition(
                oid,
                format!(
                    "producer '{}' announced it as {}",
                    item.producer, item.announced_oid
                ),
            ));
        }

        if !is_valid_oid(oid) {
            self.errors.push(SchemaError::InvalidOid {
                oid: oid.to_string(),
            });
        }

        if matches!(definition, SchemaObject::AttributeType(a) if a.length == Some(0)) {
            self.errors.push(SchemaError::invalid_definition(
                oid,
                "length bound must be positive",
            ));
        }

        let names = definition.names();
        if names.is_empty()
            && matches!(
                kind,
                SchemaObjectKind::AttributeType | SchemaObjectKind::ObjectClass
            )
        {
            self.errors.push(SchemaError::invalid_definition(
                oid,
                format!("{} requires at least one name", kind),
            ));
        }

        if let Some((existing_kind, existing_schema)) = self.store.owners.get(oid) {
            debug!("OID {} already registered as {}", oid, existing_kind);
            self.errors.push(SchemaError::DuplicateOid {
                oid: oid.to_string(),
                kind,
                existing_schema: existing_schema.clone(),
            });
        } else if self.staged_oids.contains_key(oid) {
            self.errors.push(SchemaError::DuplicateOid {
                oid: oid.to_string(),
                kind,
                existing_schema: self.schema.to_string(),
            });
        } else {
            self.staged_oids.insert(oid.to_string(), kind);
        }

        let mut own_names = HashSet::new();
        for name in names {
            if !is_valid_name(name) {
                self.errors.push(SchemaError::invalid_definition(
                    oid,
                    format!("invalid name '{}'", name),
                ));
                continue;
            }

            let folded = fold_name(name);
            if !own_names.insert(folded.clone()) {
                self.errors.push(SchemaError::DuplicateName {
                    name: name.clone(),
                    kind,
                    existing_oid: oid.to_string(),
                });
                continue;
            }

            let key = (kind, folded);
            let existing = self
                .store
                .names
                .get(&key)
                .or_else(|| self.staged_names.get(&key))
                .cloned();
            match existing {
                Some(existing_oid) => self.errors.push(SchemaError::DuplicateName {
                    name: name.clone(),
                    kind,
                    existing_oid,
                }),
                None => {
                    self.staged_names.insert(key, oid.to_string());
                }
            }
        }
    }

    /// Resolve an OID or name against the store, then the stage.
    fn resolve(&self, kind: SchemaObjectKind, id: &str) -> Option<String> {
        if let Some(oid) = self.store.resolve(kind, id) {
            return Some(oid.to_string());
        }
        if looks_like_oid(id) {
            (self.staged_oids.get(id) == Some(&kind)).then(|| id.to_string())
        } else {
            self.staged_names.get(&(kind, fold_name(id))).cloned()
        }
    }

    fn canonicalize(&mut self, definition: SchemaObject) -> SchemaObject {
        match definition {
            SchemaObject::Syntax(s) => SchemaObject::Syntax(s),
            SchemaObject::MatchingRule(m) => SchemaObject::MatchingRule(self.canonical_rule(m)),
            SchemaObject::AttributeType(a) => {
                SchemaObject::AttributeType(self.canonical_attribute(a))
            }
            SchemaObject::ObjectClass(o) => SchemaObject::ObjectClass(self.canonical_class(o)),
        }
    }

    fn canonical_rule(&mut self, mut rule: MatchingRule) -> MatchingRule {
        match self.resolve(SchemaObjectKind::Syntax, &rule.syntax) {
            Some(oid) => rule.syntax = oid,
            None => self.errors.push(SchemaError::UnresolvedSyntax {
                owner: format!("Matching rule {}", rule.oid),
                syntax: rule.syntax.clone(),
            }),
        }
        rule
    }

    fn canonical_attribute(&mut self, mut attribute: AttributeType) -> AttributeType {
        match self.resolve(SchemaObjectKind::Syntax, &attribute.syntax) {
            Some(oid) => attribute.syntax = oid,
            None => self.errors.push(SchemaError::UnresolvedSyntax {
                owner: format!("Attribute type {}", attribute.oid),
                syntax: attribute.syntax.clone(),
            }),
        }

        let oid = attribute.oid.clone();
        for slot in [
            &mut attribute.equality,
            &mut attribute.ordering,
            &mut attribute.substring,
        ] {
            let Some(reference) = slot.as_ref() else {
                continue;
            };
            match self.resolve(SchemaObjectKind::MatchingRule, reference) {
                Some(rule) => *slot = Some(rule),
                None if self.config.require_matching_rules => {
                    self.errors.push(SchemaError::UnresolvedMatchingRule {
                        attribute_type: oid.clone(),
                        matching_rule: reference.clone(),
                    })
                }
                None => debug!(
                    "Attribute type {} keeps unresolved matching rule '{}'",
                    oid, reference
                ),
            }
        }

        attribute
    }

    fn canonical_class(&mut self, mut class: ObjectClass) -> ObjectClass {
        let mut superiors = Vec::with_capacity(class.superiors.len());
        for superior in &class.superiors {
            match self.resolve(SchemaObjectKind::ObjectClass, superior) {
                Some(oid) if !superiors.contains(&oid) => superiors.push(oid),
                Some(_) => {}
                None => self.errors.push(SchemaError::UnresolvedSuperior {
                    object_class: class.oid.clone(),
                    superior: superior.clone(),
                }),
            }
        }
        class.superiors = superiors;

        let must = std::mem::take(&mut class.must);
        class.must = self.canonical_attribute_list(&class.oid, must);
        let may = std::mem::take(&mut class.may);
        class.may = self.canonical_attribute_list(&class.oid, may);
        class
    }

    fn canonical_attribute_list(
        &mut self,
        class_oid: &str,
        references: Vec<String>,
    ) -> Vec<String> {
        let mut canonical: Vec<String> = Vec::with_capacity(references.len());
        for reference in references {
            let resolved = match self.resolve(SchemaObjectKind::AttributeType, &reference) {
                Some(oid) => oid,
                None if self.config.require_attribute_references => {
                    self.errors.push(SchemaError::UnresolvedAttribute {
                        object_class: class_oid.to_string(),
                        attribute: reference,
                    });
                    continue;
                }
                None => {
                    debug!(
                        "Object class {} keeps unresolved attribute '{}'",
                        class_oid, reference
                    );
                    reference
                }
            };
            if !canonical.contains(&resolved) {
                canonical.push(resolved);
            }
        }
        canonical
    }

    fn check_inheritance_cycles(&mut self, definitions: &[SchemaObject]) {
        let graph: BTreeMap<&str, Vec<&str>> = definitions
            .iter()
            .filter_map(|definition| match definition {
                SchemaObject::ObjectClass(class) => Some(class),
                _ => None,
            })
            .map(|class| {
                (
                    class.oid.as_str(),
                    class.superiors.iter().map(String::as_str).collect(),
                )
            })
            .collect();

        for cycle in find_cycles(&graph) {
            self.errors.push(SchemaError::CyclicInheritance { cycle });
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search for cycles in a superior graph.
///
/// Edges to nodes outside the graph are ignored: classes already in the store
/// cannot point back into a schema that is still being staged. The walk keeps
/// its path on the heap, so chain depth is bounded by memory only.
fn find_cycles(graph: &BTreeMap<&str, Vec<&str>>) -> Vec<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut cycles = Vec::new();

    for root in graph.keys() {
        if marks.contains_key(root) {
            continue;
        }
        marks.insert(*root, Mark::Visiting);
        // Current path, each node with the index of its next superior to visit
        let mut path: Vec<(&str, usize)> = vec![(*root, 0)];

        while let Some(&(node, next)) = path.last() {
            let Some(&superior) = graph.get(node).and_then(|superiors| superiors.get(next)) else {
                marks.insert(node, Mark::Done);
                path.pop();
                continue;
            };
            if let Some(top) = path.last_mut() {
                top.1 += 1;
            }

            match marks.get(superior) {
                Some(Mark::Done) => {}
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|(n, _)| *n == superior).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(superior.to_string());
                    cycles.push(cycle);
                }
                None if graph.contains_key(superior) => {
                    marks.insert(superior, Mark::Visiting);
                    path.push((superior, 0));
                }
                None => {}
            }
        }
    }
    cycles
}
