//! Error types for schema registry operations.
//!
//! Every invariant the registry enforces has its own variant so that operators
//! receive a precise diagnostic. Violations that occur while a schema is merged
//! are collected into [`Violation`] records tagged with the schema name.

use crate::schema::SchemaObjectKind;
use serde::Serialize;
use std::fmt;

/// Main error type for schema registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two schema objects claim the same OID
    #[error("Duplicate OID {oid}: {kind} already registered by schema '{existing_schema}'")]
    DuplicateOid {
        oid: String,
        kind: SchemaObjectKind,
        existing_schema: String,
    },

    /// Two schema objects of the same kind share a case-folded name
    #[error("Duplicate {kind} name '{name}' (already used by {existing_oid})")]
    DuplicateName {
        name: String,
        kind: SchemaObjectKind,
        existing_oid: String,
    },

    /// Object class names a superior that is not a known object class
    #[error("Object class {object_class} references unknown superior '{superior}'")]
    UnresolvedSuperior {
        object_class: String,
        superior: String,
    },

    /// Superior references form a cycle
    #[error("Cyclic object class inheritance: {}", .cycle.join(" -> "))]
    CyclicInheritance { cycle: Vec<String> },

    /// Attribute type or matching rule names an unknown syntax
    #[error("{owner} references unknown syntax '{syntax}'")]
    UnresolvedSyntax { owner: String, syntax: String },

    /// Attribute type names an unknown matching rule
    #[error("Attribute type {attribute_type} references unknown matching rule '{matching_rule}'")]
    UnresolvedMatchingRule {
        attribute_type: String,
        matching_rule: String,
    },

    /// Object class must/may list names an unknown attribute type
    #[error("Object class {object_class} references unknown attribute type '{attribute}'")]
    UnresolvedAttribute {
        object_class: String,
        attribute: String,
    },

    /// A schema depends on a schema that is unknown or not yet loaded
    #[error("Schema '{schema}' depends on '{dependency}' which is not available")]
    MissingDependency { schema: String, dependency: String },

    /// Schema dependencies form a cycle
    #[error("Schema dependency cycle among: {}", .schemas.join(", "))]
    DependencyCycle { schemas: Vec<String> },

    /// A schema was skipped because one of its dependencies failed to load
    #[error("Schema '{schema}' skipped: dependency '{dependency}' failed to load")]
    DependencyFailed { schema: String, dependency: String },

    /// The same schema name was supplied or loaded twice
    #[error("Schema '{schema}' is already registered")]
    DuplicateSchema { schema: String },

    /// OID is not a dotted-numeric identifier
    #[error("Invalid OID '{oid}'")]
    InvalidOid { oid: String },

    /// Definition is structurally malformed
    #[error("Invalid definition {oid}: {message}")]
    InvalidDefinition { oid: String, message: String },

    /// Producer failed while emitting definitions
    #[error("Producer '{producer}' failed: {source}")]
    Producer {
        producer: String,
        #[source]
        source: ProducerError,
    },

    /// Lookup miss on a frozen registry
    #[error("{kind} not found: {id}")]
    NotFound { kind: SchemaObjectKind, id: String },
}

/// Error raised by a producer while emitting definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProducerError {
    /// Source data for the producer could not be read or parsed
    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// Producer gave up part way through emission
    #[error("Emission aborted: {message}")]
    Aborted { message: String },
}

/// Errors raised while reading declarative schema bundles.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// Bundle file could not be read
    #[error("Failed to read bundle {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bundle content is not valid JSON for the bundle format
    #[error("Failed to parse bundle: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by an administrative reload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReloadError {
    /// Candidate registry failed validation; the active registry is unchanged
    #[error("Reload rejected with {} violation(s)", .violations.len())]
    Rejected { violations: Vec<Violation> },

    /// Candidate build did not complete
    #[error("Reload task failed: {message}")]
    TaskFailed { message: String },
}

impl ReloadError {
    /// Violations that caused the rejection, empty for task failures.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Rejected { violations } => violations,
            Self::TaskFailed { .. } => &[],
        }
    }
}

// Convenience methods for creating common errors
impl SchemaError {
    /// Create a not found error
    pub fn not_found(kind: SchemaObjectKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an invalid definition error
    pub fn invalid_definition(oid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            oid: oid.into(),
            message: message.into(),
        }
    }

    /// Create a missing dependency error
    pub fn missing_dependency(schema: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            schema: schema.into(),
            dependency: dependency.into(),
        }
    }

    /// Whether this error is an ordinary lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ProducerError {
    /// Create an aborted emission error
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted {
            message: message.into(),
        }
    }
}

/// A single invariant violation attributed to the schema that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Schema whose load produced the violation
    pub schema: String,
    /// What went wrong
    #[serde(serialize_with = "serialize_display")]
    pub error: SchemaError,
}

impl Violation {
    pub fn new(schema: impl Into<String>, error: SchemaError) -> Self {
        Self {
            schema: schema.into(),
            error,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.schema, self.error)
    }
}

fn serialize_display<S: serde::Serializer>(
    error: &SchemaError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

// Result type aliases for convenience
pub type SchemaResult<T> = Result<T, SchemaError>;
pub type BundleResult<T> = Result<T, BundleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_creation() {
        let error = SchemaError::not_found(SchemaObjectKind::ObjectClass, "ggseperson");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("ggseperson"));
        assert!(error.to_string().contains("object class"));
    }

    #[test]
    fn test_cycle_message_lists_path() {
        let error = SchemaError::CyclicInheritance {
            cycle: vec!["1.2.3".into(), "1.2.4".into(), "1.2.3".into()],
        };
        assert_eq!(
            error.to_string(),
            "Cyclic object class inheritance: 1.2.3 -> 1.2.4 -> 1.2.3"
        );
    }

    #[test]
    fn test_producer_error_chain() {
        let error = SchemaError::Producer {
            producer: "gevirtz".into(),
            source: ProducerError::aborted("disk gone"),
        };
        let source = std::error::Error::source(&error).expect("source");
        assert!(source.to_string().contains("disk gone"));
    }

    #[test]
    fn test_violation_serializes_message() {
        let violation =
            Violation::new("core", SchemaError::missing_dependency("core", "system"));
        let json = serde_json::to_value(&violation).expect("serialize");
        assert_eq!(json["schema"], "core");
        assert!(json["error"].as_str().unwrap().contains("system"));
    }

    #[test]
    fn test_reload_error_counts_violations() {
        let error = ReloadError::Rejected {
            violations: vec![
                Violation::new("a", SchemaError::missing_dependency("a", "x")),
                Violation::new("b", SchemaError::missing_dependency("b", "x")),
            ],
        };
        assert_eq!(error.to_string(), "Reload rejected with 2 violation(s)");
        assert_eq!(error.violations().len(), 2);
    }
}
