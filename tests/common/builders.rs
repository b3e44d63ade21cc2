//! Fluent builders for schema bundles used in tests.

use ldap_schema_registry::schema::{
    AttributeType, ObjectClass, ObjectClassKind, SchemaBundle, SchemaDescriptor,
};

/// Directory String syntax, registered by the `system` schema
pub const DIRECTORY_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.15";

/// Builder for a schema bundle with a fluent API
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    bundle: SchemaBundle,
}

impl BundleBuilder {
    /// Start a bundle that depends on `system`
    pub fn new(name: &str) -> Self {
        Self {
            bundle: SchemaBundle::new(SchemaDescriptor::new(name).with_dependencies(["system"])),
        }
    }

    pub fn depends_on(mut self, dependencies: &[&str]) -> Self {
        self.bundle.descriptor.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Add a Directory String attribute type
    pub fn attribute(mut self, oid: &str, name: &str) -> Self {
        self.bundle.attribute_types.push(AttributeType {
            oid: oid.to_string(),
            names: vec![name.to_string()],
            syntax: DIRECTORY_STRING.to_string(),
            ..Default::default()
        });
        self
    }

    /// Add a structural object class
    pub fn class(self, oid: &str, name: &str, superiors: &[&str]) -> Self {
        self.class_with(oid, name, superiors, &[], &[])
    }

    pub fn class_with(
        mut self,
        oid: &str,
        name: &str,
        superiors: &[&str],
        must: &[&str],
        may: &[&str],
    ) -> Self {
        self.bundle.object_classes.push(ObjectClass {
            oid: oid.to_string(),
            names: vec![name.to_string()],
            kind: ObjectClassKind::Structural,
            superiors: strings(superiors),
            must: strings(must),
            may: strings(may),
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> SchemaBundle {
        self.bundle
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
