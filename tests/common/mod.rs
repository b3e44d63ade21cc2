//! Common test utilities for schema registry integration tests.
//!
//! This module provides logging setup, embedded-schema helpers and the fluent
//! bundle builders shared by the integration test files.

#![allow(dead_code)]

pub mod builders;
pub mod fixtures;

use ldap_schema_registry::schema::{SchemaBundle, embedded};
use ldap_schema_registry::{RegistryConfig, SchemaBootstrap, SchemaRegistry, SchemaSource};

/// Install a test logger once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn embedded_bundle(name: &str) -> SchemaBundle {
    embedded::bundle(name)
        .expect("embedded bundle parses")
        .unwrap_or_else(|| panic!("no embedded bundle named {}", name))
}

/// Sources for the embedded `system`, `core` and `gevirtz` schemas.
pub fn embedded_sources() -> Vec<SchemaSource> {
    embedded::bundles()
        .expect("embedded bundles parse")
        .into_iter()
        .map(SchemaSource::from)
        .collect()
}

/// Frozen registry holding the embedded schemas.
pub fn embedded_registry() -> SchemaRegistry {
    SchemaBootstrap::embedded(RegistryConfig::default())
        .expect("embedded bundles parse")
        .run()
        .into_result()
        .expect("embedded schemas load cleanly")
}

/// OID of an attribute type, looked up by name.
pub fn attribute_oid(registry: &SchemaRegistry, name: &str) -> String {
    registry
        .lookup_attribute_type(name)
        .unwrap_or_else(|e| panic!("attribute {}: {}", name, e))
        .oid
        .clone()
}

/// Assert that a result is a violation matching the pattern.
#[allow(unused_macros)]
macro_rules! assert_violation {
    ($violations:expr, $schema:expr, $pattern:pat) => {
        assert!(
            $violations
                .iter()
                .any(|v| v.schema == $schema && matches!(v.error, $pattern)),
            "expected {} violation for schema '{}', got {:?}",
            stringify!($pattern),
            $schema,
            $violations
        );
    };
}
