//! Declarative schema bundles and schema descriptors.
//!
//! A bundle is the data form of one schema: its descriptor plus every definition
//! it contributes. Bundles are read from JSON, either embedded in the library or
//! loaded from files, and act as producers for the registry.

use super::types::{AttributeType, MatchingRule, ObjectClass, SchemaObject, Syntax};
use crate::error::{BundleError, BundleResult};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Administrative identity that owns the bundled schemas.
pub const DEFAULT_OWNER: &str = "uid=admin,ou=system";

/// Identifies a schema, its owner and the schemas it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub name: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl SchemaDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: DEFAULT_OWNER.to_string(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// One schema in declarative form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaBundle {
    #[serde(flatten)]
    pub descriptor: SchemaDescriptor,
    #[serde(default)]
    pub syntaxes: Vec<Syntax>,
    #[serde(default)]
    pub matching_rules: Vec<MatchingRule>,
    #[serde(default)]
    pub attribute_types: Vec<AttributeType>,
    #[serde(default)]
    pub object_classes: Vec<ObjectClass>,
}

impl SchemaBundle {
    /// Create an empty bundle for `descriptor`.
    pub fn new(descriptor: SchemaDescriptor) -> Self {
        Self {
            descriptor,
            syntaxes: Vec::new(),
            matching_rules: Vec::new(),
            attribute_types: Vec::new(),
            object_classes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Parse a bundle from its JSON form.
    pub fn from_json(content: &str) -> BundleResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a bundle from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        let content = fs::read_to_string(&path).map_err(|source| BundleError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Read every `*.json` bundle in a directory, in file-name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> BundleResult<Vec<Self>> {
        let io_error = |source| BundleError::Io {
            path: dir.as_ref().display().to_string(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir.as_ref()).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(Self::from_file).collect()
    }

    /// Every definition in emission order: syntaxes, matching rules, attribute
    /// types, object classes.
    pub fn definitions(&self) -> impl Iterator<Item = SchemaObject> + '_ {
        let syntaxes = self.syntaxes.iter().cloned().map(SchemaObject::from);
        let rules = self.matching_rules.iter().cloned().map(SchemaObject::from);
        let attributes = self.attribute_types.iter().cloned().map(SchemaObject::from);
        let classes = self.object_classes.iter().cloned().map(SchemaObject::from);
        syntaxes.chain(rules).chain(attributes).chain(classes)
    }

    pub fn definition_count(&self) -> usize {
        self.syntaxes.len()
            + self.matching_rules.len()
            + self.attribute_types.len()
            + self.object_classes.len()
    }
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}
