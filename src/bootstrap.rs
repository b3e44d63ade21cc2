//! Registry bootstrap.
//!
//! [`SchemaBootstrap`] collects schema sources, orders them with the dependency
//! resolver and loads each one into a fresh registry. Failures are fail-closed:
//! a schema that does not validate is left out, every schema depending on it is
//! skipped with `DependencyFailed`, and independent schemas are still loaded.
//! All violations end up in the [`LoadReport`].

use crate::config::RegistryConfig;
use crate::dependency::plan_load_order;
use crate::error::{BundleResult, SchemaError, Violation};
use crate::producer::SchemaSource;
use crate::registry::SchemaRegistry;
use crate::schema::{SchemaBundle, embedded};

use log::{info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Builder for a frozen registry.
#[derive(Debug, Clone)]
pub struct SchemaBootstrap {
    config: RegistryConfig,
    sources: Vec<SchemaSource>,
    generation: u64,
}

/// Which schemas loaded, and why the others did not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Planned load order
    pub order: Vec<String>,
    /// Schemas merged into the registry, in load order
    pub loaded: Vec<String>,
    pub violations: Vec<Violation>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Names of schemas with at least one violation.
    pub fn failed_schemas(&self) -> Vec<&str> {
        let mut failed: Vec<&str> = Vec::new();
        for violation in &self.violations {
            if !failed.contains(&violation.schema.as_str()) {
                failed.push(&violation.schema);
            }
        }
        failed
    }
}

/// A frozen registry together with the report of how it was built.
#[derive(Debug)]
pub struct BootstrapOutcome {
    pub registry: SchemaRegistry,
    pub report: LoadReport,
}

impl BootstrapOutcome {
    /// The registry if every schema loaded, otherwise every violation.
    pub fn into_result(self) -> Result<SchemaRegistry, Vec<Violation>> {
        if self.report.is_clean() {
            Ok(self.registry)
        } else {
            Err(self.report.violations)
        }
    }
}

impl SchemaBootstrap {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            generation: 1,
        }
    }

    /// Bootstrap preloaded with the embedded `system`, `core` and `gevirtz` schemas.
    pub fn embedded(config: RegistryConfig) -> BundleResult<Self> {
        Ok(Self::new(config).with_bundles(embedded::bundles()?))
    }

    pub fn with_source(mut self, source: SchemaSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_bundle(self, bundle: SchemaBundle) -> Self {
        self.with_source(SchemaSource::from(bundle))
    }

    pub fn with_bundles<I>(self, bundles: I) -> Self
    where
        I: IntoIterator<Item = SchemaBundle>,
    {
        bundles.into_iter().fold(self, Self::with_bundle)
    }

    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = SchemaSource>,
    {
        self.sources.extend(sources);
        self
    }

    /// Generation number stamped on the resulting registry.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn sources(&self) -> &[SchemaSource] {
        &self.sources
    }

    /// Order, load and freeze every source.
    pub fn run(&self) -> BootstrapOutcome {
        let mut report = LoadReport::default();

        // Step 1: First source wins for a repeated schema name
        let mut by_name: HashMap<&str, &SchemaSource> = HashMap::new();
        let mut unique = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            if by_name.contains_key(source.name()) {
                report.violations.push(Violation::new(
                    source.name(),
                    SchemaError::DuplicateSchema {
                        schema: source.name().to_string(),
                    },
                ));
            } else {
                by_name.insert(source.name(), source);
                unique.push(&source.descriptor);
            }
        }

        // Step 2: Plan the load order, setting aside unloadable schemas
        let plan = match plan_load_order(unique) {
            Ok(plan) => plan,
            Err(error) => {
                report.violations.push(Violation::new("", error));
                Default::default()
            }
        };
        let mut failed: HashSet<String> = HashSet::new();
        for error in plan.blocked {
            for schema in blocked_schema_names(&error) {
                warn!("Schema '{}' cannot be loaded: {}", schema, error);
                failed.insert(schema.clone());
                report.violations.push(Violation::new(schema, error.clone()));
            }
        }

        // Step 3: Load in order, skipping dependents of failed schemas
        let mut registry =
            SchemaRegistry::new(self.config.clone()).with_generation(self.generation);
        for name in &plan.order {
            let Some(source) = by_name.get(name.as_str()) else {
                continue;
            };

            let failed_dependency = source
                .descriptor
                .dependencies
                .iter()
                .find(|dep| failed.contains(dep.as_str()));
            if let Some(dependency) = failed_dependency {
                warn!(
                    "Skipping schema '{}': dependency '{}' failed to load",
                    name, dependency
                );
                report.violations.push(Violation::new(
                    name,
                    SchemaError::DependencyFailed {
                        schema: name.clone(),
                        dependency: dependency.clone(),
                    },
                ));
                failed.insert(name.clone());
                continue;
            }

            match registry.load(source) {
                Ok(_) => report.loaded.push(name.clone()),
                Err(errors) => {
                    failed.insert(name.clone());
                    report
                        .violations
                        .extend(errors.into_iter().map(|error| Violation::new(name, error)));
                }
            }
        }
        report.order = plan.order;

        info!(
            "Bootstrap complete: {} of {} schemas loaded, {} violations",
            report.loaded.len(),
            self.sources.len(),
            report.violations.len()
        );
        BootstrapOutcome {
            registry: registry.freeze(),
            report,
        }
    }
}

fn blocked_schema_names(error: &SchemaError) -> Vec<String> {
    match error {
        SchemaError::MissingDependency { schema, .. }
        | SchemaError::DependencyFailed { schema, .. }
        | SchemaError::DuplicateSchema { schema } => vec![schema.clone()],
        SchemaError::DependencyCycle { schemas } => schemas.clone(),
        _ => Vec::new(),
    }
}
