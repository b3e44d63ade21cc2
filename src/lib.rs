//! Directory schema bootstrap registry for Rust.
//!
//! Accumulates attribute-type and object-class definitions contributed by
//! independently loaded schemas, orders schemas by their dependencies, enforces
//! global consistency as each one is merged, and serves the lookups and
//! inheritance resolution that entry validation needs.
//!
//! # Core Components
//!
//! - [`SchemaRegistry`] - Type-state registry, loading then frozen
//! - [`SchemaBootstrap`] - Builds a frozen registry from schema sources
//! - [`SchemaService`] - Holds the active registry and performs reloads
//! - [`SchemaProducer`] - Trait for supplying one schema's definitions
//!
//! # Quick Start
//!
//! ```rust
//! use ldap_schema_registry::{RegistryConfig, SchemaBootstrap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = SchemaBootstrap::embedded(RegistryConfig::default())?.run();
//! assert!(outcome.report.is_clean());
//!
//! let registry = outcome.registry;
//! let effective = registry.resolve_effective_attributes(["ggseperson", "inetOrgPerson"])?;
//! let mail = registry.lookup_attribute_type("mail")?;
//! assert!(effective.permits(&mail.oid));
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod dependency;
pub mod error;
pub mod producer;
pub mod registry;
pub mod schema;
pub mod service;

// Re-export commonly used types for convenience
pub use bootstrap::{BootstrapOutcome, LoadReport, SchemaBootstrap};
pub use config::RegistryConfig;
pub use dependency::{LoadPlan, plan_load_order, resolve_load_order};
pub use error::{ProducerError, ReloadError, SchemaError, SchemaResult, Violation};
pub use producer::{FnProducer, ProducerCallback, SchemaProducer, SchemaSource};
pub use registry::{EffectiveAttributes, Frozen, Loading, SchemaRegistry};
pub use schema::{AttributeType, ObjectClass, SchemaBundle, SchemaDescriptor, SchemaObject};
pub use service::{ReloadOutcome, SchemaService};
