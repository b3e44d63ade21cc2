//! Reload Integration Tests
//!
//! Validates that the administrative reload builds candidates aside, rejects
//! broken candidates as a unit, and never disturbs readers holding snapshots.

#[macro_use]
mod common;

use common::fixtures::{
    ACCEPT_DATE_OID, clashing_schema, cyclic_schema, renaming_schema, staff_schema,
};
use common::{embedded_sources, init_logging};
use futures::future::join_all;
use ldap_schema_registry::{
    RegistryConfig, ReloadError, SchemaError, SchemaService, SchemaSource,
};
use std::sync::Arc;

fn service() -> SchemaService {
    SchemaService::bootstrap(RegistryConfig::default(), embedded_sources()).expect("bootstrap")
}

fn with_extra(extra: ldap_schema_registry::SchemaBundle) -> Vec<SchemaSource> {
    let mut sources = embedded_sources();
    sources.push(SchemaSource::from(extra));
    sources
}

#[tokio::test]
async fn test_broken_reload_leaves_queries_unchanged() {
    init_logging();
    let service = service();

    let before = service.current().await;
    let resolved_before = before
        .resolve_effective_attributes(["ggseperson"])
        .expect("resolution");

    let error = service
        .reload(with_extra(cyclic_schema()))
        .await
        .unwrap_err();
    assert!(matches!(error, ReloadError::Rejected { .. }));
    assert_violation!(
        error.violations(),
        "cyclic",
        SchemaError::CyclicInheritance { .. }
    );

    let after = service.current().await;
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.generation(), 1);
    let resolved_after = after
        .resolve_effective_attributes(["ggseperson"])
        .expect("resolution");
    assert_eq!(resolved_before, resolved_after);
    assert!(after.lookup_object_class("ping").is_err());
}

#[tokio::test]
async fn test_duplicate_name_reload_keeps_active_registry() {
    init_logging();
    let service = service();
    let before = service.current().await;
    let role_oid = before
        .lookup_attribute_type("nsroledn")
        .expect("gevirtz attribute")
        .oid
        .clone();

    let error = service
        .reload(with_extra(renaming_schema()))
        .await
        .unwrap_err();
    assert_violation!(
        error.violations(),
        "renaming",
        SchemaError::DuplicateName { .. }
    );

    let after = service.current().await;
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(
        after.lookup_attribute_type("nsRoleDN").expect("still served").oid,
        role_oid
    );
    assert!(!after.contains_oid("1.9.9.1"));
    assert!(after.lookup_attribute_type("roleScope").is_err());
}

#[tokio::test]
async fn test_rejection_collects_violations_across_schemas() {
    init_logging();
    let service = service();

    let mut sources = with_extra(cyclic_schema());
    sources.push(SchemaSource::from(clashing_schema()));
    let error = service.reload(sources).await.unwrap_err();

    assert_violation!(
        error.violations(),
        "cyclic",
        SchemaError::CyclicInheritance { .. }
    );
    assert_violation!(
        error.violations(),
        "clashing",
        SchemaError::DuplicateOid { .. }
    );
    assert_eq!(service.generation().await, 1);
}

#[tokio::test]
async fn test_accepted_reload_swaps_registry() {
    init_logging();
    let service = service();
    let old = service.current().await;

    let outcome = service
        .reload(with_extra(staff_schema()))
        .await
        .expect("reload accepted");
    assert_eq!(outcome.generation, 2);
    assert!(outcome.changed);
    assert_ne!(outcome.fingerprint, outcome.previous_fingerprint);
    assert_eq!(outcome.schemas, vec!["system", "core", "gevirtz", "staff"]);

    let new = service.current().await;
    assert_eq!(new.fingerprint(), outcome.fingerprint);
    assert!(new.lookup_object_class("staffMember").is_ok());

    // The old snapshot stays valid for readers that still hold it
    assert!(old.lookup_object_class("staffMember").is_err());
    assert!(old.lookup_attribute_type(ACCEPT_DATE_OID).is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_during_reload() {
    init_logging();
    let service = service();

    let readers = (0..16).map(|i| {
        let service = service.clone();
        tokio::spawn(async move {
            let registry = service.current().await;
            let classes: &[&str] = if i % 2 == 0 {
                &["ggseperson", "inetOrgPerson"]
            } else {
                &["inetOrgPerson", "ggseperson"]
            };
            let effective = registry
                .resolve_effective_attributes(classes)
                .expect("resolution");
            (registry.generation(), effective.may.len())
        })
    });
    let reload = {
        let service = service.clone();
        tokio::spawn(async move { service.reload(with_extra(staff_schema())).await })
    };

    let results = join_all(readers).await;
    let outcome = reload.await.expect("reload task").expect("reload accepted");
    assert_eq!(outcome.generation, 2);

    for result in results {
        let (generation, may) = result.expect("reader task");
        assert!(generation == 1 || generation == 2);
        // staff does not change these classes
        assert!(may > 0);
    }
    assert_eq!(service.generation().await, 2);
}

#[tokio::test]
async fn test_sequential_reloads_bump_generation() {
    init_logging();
    let service = service();

    for expected in 2..=4 {
        let outcome = service.reload(embedded_sources()).await.expect("reload");
        assert_eq!(outcome.generation, expected);
        assert!(!outcome.changed);
    }
    assert_eq!(service.generation().await, 4);
}
