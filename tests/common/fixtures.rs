//! Schema fixtures for valid and broken reload candidates.

use super::builders::BundleBuilder;
use ldap_schema_registry::schema::SchemaBundle;

/// The gevirtz OIDs, as listed in the account-management schema
pub const ACCEPT_DATE_OID: &str = "1.3.6.1.4.1.18060.0.4.1.2.1001";
pub const GGSEPERSON_OID: &str = "1.3.6.1.4.1.18060.0.4.1.3.1001";

/// A valid extension schema adding a class below `inetOrgPerson`.
pub fn staff_schema() -> SchemaBundle {
    BundleBuilder::new("staff")
        .depends_on(&["system", "core"])
        .attribute("1.9.1.1", "employeeBadge")
        .attribute("1.9.1.2", "deskLocation")
        .class_with(
            "1.9.2.1",
            "staffMember",
            &["inetOrgPerson"],
            &["employeeBadge"],
            &["deskLocation"],
        )
        .build()
}

/// A schema that reuses the OID of `ituseagreementacceptdate`.
pub fn clashing_schema() -> SchemaBundle {
    BundleBuilder::new("clashing")
        .depends_on(&["system", "core", "gevirtz"])
        .attribute(ACCEPT_DATE_OID, "acceptanceStamp")
        .build()
}

/// A schema whose classes inherit from each other.
pub fn cyclic_schema() -> SchemaBundle {
    BundleBuilder::new("cyclic")
        .class("1.9.3.1", "ping", &["pong"])
        .class("1.9.3.2", "pong", &["ping"])
        .build()
}

/// A schema that reuses the name `nsroledn` under a fresh OID.
pub fn renaming_schema() -> SchemaBundle {
    BundleBuilder::new("renaming")
        .depends_on(&["system", "core", "gevirtz"])
        .attribute("1.9.9.1", "nsRoleDN")
        .attribute("1.9.9.2", "roleScope")
        .build()
}
