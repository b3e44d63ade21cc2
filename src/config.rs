//! Registry configuration.
//!
//! Controls how strictly cross references are checked while schemas are merged
//! and whether inheritance resolutions are memoized on the frozen registry.

use serde::{Deserialize, Serialize};

/// Configuration for building and querying a schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// Require every must/may entry to name a known attribute type.
    pub require_attribute_references: bool,

    /// Require equality/ordering/substring references to name a known matching rule.
    pub require_matching_rules: bool,

    /// Memoize effective attribute resolutions per object-class combination.
    pub cache_resolutions: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            require_attribute_references: true,
            require_matching_rules: true,
            cache_resolutions: true,
        }
    }
}

impl RegistryConfig {
    /// Configuration that only enforces the structural invariants: unique OIDs
    /// and names, resolvable superiors and syntaxes, acyclic inheritance.
    pub fn lenient() -> Self {
        Self {
            require_attribute_references: false,
            require_matching_rules: false,
            cache_resolutions: true,
        }
    }

    pub fn with_attribute_references(mut self, required: bool) -> Self {
        self.require_attribute_references = required;
        self
    }

    pub fn with_matching_rules(mut self, required: bool) -> Self {
        self.require_matching_rules = required;
        self
    }

    pub fn with_resolution_cache(mut self, enabled: bool) -> Self {
        self.cache_resolutions = enabled;
        self
    }
}
