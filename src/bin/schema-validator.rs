//! # Schema Bundle Validator
//!
//! A command-line utility for checking schema bundle files before they are
//! deployed, by loading them into a registry exactly as the directory service
//! would at bootstrap.
//!
//! ## Overview
//!
//! The validator:
//! - Parses every bundle (a single `.json` file or every `.json` file in a directory)
//! - Adds the embedded `system`, `core` and `gevirtz` schemas unless a bundle of
//!   the same name is supplied
//! - Orders all schemas by their dependencies
//! - Loads each one, collecting every violation
//! - Prints a summary of the resulting registry
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-validator schemas/gevirtz.json
//! cargo run --bin schema-validator ./schemas/
//! ```
//!
//! ## Output Examples
//!
//! ```text
//! Validating schema bundles in: ./schemas/
//!
//! Load order: system, core, gevirtz, nis
//!   ✓ system (71 definitions)
//!   ✓ core (18 definitions)
//!   ✓ gevirtz (6 definitions)
//!   ❌ nis
//!
//! Violations:
//!   [nis] Object class 1.3.6.1.1.1.2.0 references unknown superior 'posixAcount'
//!
//! Validation Summary:
//!   Loaded schemas: 3
//!   Failed schemas: 1
//!   Violations: 1
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: Every schema loaded cleanly
//! - `1`: Any violation, or the bundles could not be read

use ldap_schema_registry::schema::{SchemaBundle, embedded};
use ldap_schema_registry::{LoadReport, RegistryConfig, SchemaBootstrap, SchemaRegistry};
use std::env;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <bundle-file-or-directory>", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} schemas/gevirtz.json", args[0]);
        eprintln!("  {} ./schemas/", args[0]);
        process::exit(1);
    }

    let path = Path::new(&args[1]);
    let bundles = if path.is_file() {
        println!("Validating schema bundle: {}", path.display());
        SchemaBundle::from_file(path).map(|bundle| vec![bundle])
    } else if path.is_dir() {
        println!("Validating schema bundles in: {}", path.display());
        SchemaBundle::from_dir(path)
    } else {
        eprintln!(
            "Error: '{}' is not a valid file or directory",
            path.display()
        );
        process::exit(1);
    };

    let bundles = match bundles.and_then(with_embedded_dependencies) {
        Ok(bundles) => bundles,
        Err(e) => {
            eprintln!("❌ Failed to read schema bundles: {}", e);
            process::exit(1);
        }
    };

    let outcome = SchemaBootstrap::new(RegistryConfig::default())
        .with_bundles(bundles)
        .run();

    print_load_results(&outcome.report, &outcome.registry);
    print_summary(&outcome.report, &outcome.registry);

    if !outcome.report.is_clean() {
        process::exit(1);
    }
}

/// Append the embedded schemas the supplied bundles do not override.
fn with_embedded_dependencies(
    mut bundles: Vec<SchemaBundle>,
) -> ldap_schema_registry::error::BundleResult<Vec<SchemaBundle>> {
    for bundle in embedded::bundles()? {
        if !bundles.iter().any(|b| b.name() == bundle.name()) {
            bundles.push(bundle);
        }
    }
    Ok(bundles)
}

fn print_load_results(report: &LoadReport, registry: &SchemaRegistry) {
    println!();
    println!("Load order: {}", report.order.join(", "));

    for name in &report.order {
        match registry.schema(name) {
            Some(schema) => println!("  ✓ {} ({} definitions)", name, schema.oids.len()),
            None => println!("  ❌ {}", name),
        }
    }

    if !report.violations.is_empty() {
        println!();
        println!("Violations:");
        for violation in &report.violations {
            println!("  {}", violation);
        }
    }
}

fn print_summary(report: &LoadReport, registry: &SchemaRegistry) {
    println!();
    println!("Validation Summary:");
    println!("  Loaded schemas: {}", report.loaded.len());
    println!("  Failed schemas: {}", report.failed_schemas().len());
    println!("  Violations: {}", report.violations.len());

    if report.is_clean() {
        let attribute_types = registry.attribute_types().count();
        let object_classes = registry.object_classes().count();
        println!();
        println!("✓ Schema registry loaded successfully");
        println!("  Attribute types: {}", attribute_types);
        println!("  Object classes: {}", object_classes);
        println!("  Total objects: {}", registry.object_count());
        println!("  Fingerprint: {}", registry.fingerprint());
    }
}
