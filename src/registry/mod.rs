//! Schema registry with type-state loading and query phases.
//!
//! A registry starts in the [`Loading`] state, where schemas are merged one at a
//! time through the validator. [`SchemaRegistry::freeze`] consumes it and yields
//! a [`Frozen`] registry, which is immutable and serves lookups and inheritance
//! resolution to any number of concurrent readers.
//!
//! # Key Types
//!
//! - [`SchemaRegistry`] - The registry, parameterised by its state
//! - [`EffectiveAttributes`] - Result of resolving a set of object classes
//! - [`LoadedSchema`] - Record of one merged schema
//!
//! # Examples
//!
//! ```rust
//! use ldap_schema_registry::config::RegistryConfig;
//! use ldap_schema_registry::producer::SchemaSource;
//! use ldap_schema_registry::registry::SchemaRegistry;
//! use ldap_schema_registry::schema::embedded;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = SchemaRegistry::new(RegistryConfig::default());
//! for bundle in embedded::bundles()? {
//!     registry
//!         .load(&SchemaSource::from(bundle))
//!         .map_err(|errors| format!("{:?}", errors))?;
//! }
//! let registry = registry.freeze();
//!
//! let effective = registry.resolve_effective_attributes(["ggseperson"])?;
//! let accept_date = registry.lookup_attribute_type("ituseagreementacceptdate")?;
//! assert!(effective.may.contains(&accept_date.oid));
//! # Ok(())
//! # }
//! ```

mod core;
mod inheritance;
mod loading;


pub use self::core::{Frozen, LoadedSchema, Loading, RegistryState, SchemaRegistry};
pub use inheritance::EffectiveAttributes;
