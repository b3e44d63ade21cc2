//! Schema object definitions and declarative schema bundles.
//!
//! This module provides the data model the registry stores: attribute types,
//! object classes, syntaxes and matching rules, together with the bundle format
//! that carries one schema's definitions and the schemas embedded in the library.
//!
//! # Key Types
//!
//! - [`AttributeType`] - A named, typed field usable on directory entries
//! - [`ObjectClass`] - An entry kind with mandatory and optional attributes
//! - [`SchemaBundle`] - One schema in declarative form
//! - [`SchemaDescriptor`] - Schema name, owner and dependencies
//!
//! # Examples
//!
//! ```rust
//! use ldap_schema_registry::schema::embedded;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundles = embedded::bundles()?;
//! assert_eq!(bundles[0].name(), "system");
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod embedded;
pub mod types;


// Re-export the main types for convenience
pub use bundle::{SchemaBundle, SchemaDescriptor};
pub use types::{
    AttributeType, MatchingRule, ObjectClass, ObjectClassKind, SchemaObject, SchemaObjectKind,
    Syntax, UsageKind,
};
