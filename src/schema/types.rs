//! Core schema type definitions for directory schemas.
//!
//! This module contains the data structures that describe directory schema
//! objects: syntaxes, matching rules, attribute types and object classes, as
//! defined by RFC 4512. All of them are plain declarative records so that schema
//! content can be loaded from data rather than compiled in as code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a schema object.
///
/// OIDs are unique across every kind, names are unique within a kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SchemaObjectKind {
    Syntax,
    MatchingRule,
    AttributeType,
    ObjectClass,
}

impl fmt::Display for SchemaObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Syntax => "syntax",
            Self::MatchingRule => "matching rule",
            Self::AttributeType => "attribute type",
            Self::ObjectClass => "object class",
        };
        f.write_str(label)
    }
}

/// A value-encoding rule referenced by attribute types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syntax {
    /// Dotted-numeric identifier
    pub oid: String,
    #[serde(default)]
    pub description: String,
    /// Whether values of this syntax are human readable
    #[serde(default = "default_true")]
    pub human_readable: bool,
}

/// A rule for comparing attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingRule {
    pub oid: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Syntax of the assertion value, by OID
    pub syntax: String,
    #[serde(default)]
    pub obsolete: bool,
}

/// How an attribute type is used by the directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageKind {
    #[default]
    #[serde(rename = "userApplications")]
    UserApplications,
    #[serde(rename = "directoryOperation")]
    DirectoryOperation,
    #[serde(rename = "distributedOperation")]
    DistributedOperation,
    #[serde(rename = "dSAOperation")]
    DsaOperation,
}

impl UsageKind {
    /// Whether attributes of this usage are operational rather than user data.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::UserApplications)
    }
}

/// Definition of a named, typed field usable on directory entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeType {
    pub oid: String,
    /// Case-insensitive names, the first one is canonical
    pub names: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub user_modifiable: bool,
    #[serde(default)]
    pub single_valued: bool,
    #[serde(default)]
    pub collective: bool,
    #[serde(default)]
    pub obsolete: bool,
    #[serde(default)]
    pub usage: UsageKind,
    /// Syntax identifier (OID)
    pub syntax: String,
    /// Upper bound on value length, unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
}

impl Default for AttributeType {
    fn default() -> Self {
        Self {
            oid: String::new(),
            names: Vec::new(),
            description: String::new(),
            user_modifiable: true,
            single_valued: false,
            collective: false,
            obsolete: false,
            usage: UsageKind::UserApplications,
            syntax: String::new(),
            length: None,
            equality: None,
            ordering: None,
            substring: None,
        }
    }
}

impl AttributeType {
    /// The canonical (first) name.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.oid)
    }

    /// Case-insensitive name match.
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Matching-rule references in equality, ordering, substring order.
    pub fn matching_rules(&self) -> impl Iterator<Item = &String> {
        [&self.equality, &self.ordering, &self.substring]
            .into_iter()
            .flatten()
    }
}

/// Kind of an object class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectClassKind {
    #[default]
    Structural,
    Abstract,
    Auxiliary,
}

/// Definition of an entry kind.
///
/// Superiors form a DAG: a class may have any number of superiors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectClass {
    pub oid: String,
    pub names: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: ObjectClassKind,
    #[serde(default)]
    pub obsolete: bool,
    /// Superior object classes, by OID or name
    #[serde(default)]
    pub superiors: Vec<String>,
    /// Mandatory attribute types, by OID or name
    #[serde(default)]
    pub must: Vec<String>,
    /// Optional attribute types, by OID or name
    #[serde(default)]
    pub may: Vec<String>,
}

impl ObjectClass {
    /// The canonical (first) name.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.oid)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Any definition a producer can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "objectType", rename_all = "camelCase")]
pub enum SchemaObject {
    Syntax(Syntax),
    MatchingRule(MatchingRule),
    AttributeType(AttributeType),
    ObjectClass(ObjectClass),
}

impl SchemaObject {
    pub fn oid(&self) -> &str {
        match self {
            Self::Syntax(s) => &s.oid,
            Self::MatchingRule(m) => &m.oid,
            Self::AttributeType(a) => &a.oid,
            Self::ObjectClass(o) => &o.oid,
        }
    }

    pub fn kind(&self) -> SchemaObjectKind {
        match self {
            Self::Syntax(_) => SchemaObjectKind::Syntax,
            Self::MatchingRule(_) => SchemaObjectKind::MatchingRule,
            Self::AttributeType(_) => SchemaObjectKind::AttributeType,
            Self::ObjectClass(_) => SchemaObjectKind::ObjectClass,
        }
    }

    /// Names of the object. Syntaxes have none.
    pub fn names(&self) -> &[String] {
        match self {
            Self::Syntax(_) => &[],
            Self::MatchingRule(m) => &m.names,
            Self::AttributeType(a) => &a.names,
            Self::ObjectClass(o) => &o.names,
        }
    }
}

impl From<Syntax> for SchemaObject {
    fn from(value: Syntax) -> Self {
        Self::Syntax(value)
    }
}

impl From<MatchingRule> for SchemaObject {
    fn from(value: MatchingRule) -> Self {
        Self::MatchingRule(value)
    }
}

impl From<AttributeType> for SchemaObject {
    fn from(value: AttributeType) -> Self {
        Self::AttributeType(value)
    }
}

impl From<ObjectClass> for SchemaObject {
    fn from(value: ObjectClass) -> Self {
        Self::ObjectClass(value)
    }
}

/// Check that `oid` is a dotted-numeric object identifier.
///
/// Requires at least two arcs, each a run of ASCII digits without a leading zero
/// (a lone `0` is allowed).
pub fn is_valid_oid(oid: &str) -> bool {
    let mut arcs = 0;
    for arc in oid.split('.') {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if arc.len() > 1 && arc.starts_with('0') {
            return false;
        }
        arcs += 1;
    }
    arcs >= 2
}

/// Whether an identifier looks like an OID rather than a name.
pub fn looks_like_oid(id: &str) -> bool {
    id.starts_with(|c: char| c.is_ascii_digit())
}

/// Check a schema object name (RFC 4512 `descr`, with `;` tolerated for options).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ';')
}

/// Case-fold a name for index lookups.
pub fn fold_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn default_true() -> bool {
    true
}
