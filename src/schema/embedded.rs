//! Embedded schema bundles.
//!
//! This module provides the `system`, `core` and `gevirtz` schemas embedded as
//! static JSON strings so that a registry can be bootstrapped without any
//! external schema files.

use super::bundle::SchemaBundle;
use crate::error::BundleResult;

/// Returns the `system` schema as a JSON string.
///
/// Standard LDAP syntaxes and matching rules (RFC 4517), the operational
/// attributes every entry carries, and the `top` class hierarchy root.
pub fn system_schema() -> &'static str {
    r#"{
  "name": "system",
  "owner": "uid=admin,ou=system",
  "dependencies": [],
  "syntaxes": [
    { "oid": "1.3.6.1.4.1.1466.115.121.1.7", "description": "Boolean" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.12", "description": "DN" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.15", "description": "Directory String" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.24", "description": "Generalized Time" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.26", "description": "IA5 String" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.27", "description": "INTEGER" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.38", "description": "OID" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.40", "description": "Octet String", "humanReadable": false },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.50", "description": "Telephone Number" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.58", "description": "Substring Assertion" }
  ],
  "matchingRules": [
    { "oid": "2.5.13.0", "names": ["objectIdentifierMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.38" },
    { "oid": "2.5.13.1", "names": ["distinguishedNameMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.12" },
    { "oid": "2.5.13.2", "names": ["caseIgnoreMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15" },
    { "oid": "2.5.13.3", "names": ["caseIgnoreOrderingMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15" },
    { "oid": "2.5.13.4", "names": ["caseIgnoreSubstringsMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.58" },
    { "oid": "2.5.13.13", "names": ["booleanMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.7" },
    { "oid": "2.5.13.14", "names": ["integerMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.27" },
    { "oid": "2.5.13.17", "names": ["octetStringMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.40" },
    { "oid": "2.5.13.20", "names": ["telephoneNumberMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.50" },
    { "oid": "2.5.13.21", "names": ["telephoneNumberSubstringsMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.58" },
    { "oid": "2.5.13.27", "names": ["generalizedTimeMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.24" },
    { "oid": "2.5.13.28", "names": ["generalizedTimeOrderingMatch"], "syntax": "1.3.6.1.4.1.1466.115.121.1.24" },
    { "oid": "1.3.6.1.4.1.1466.109.114.1", "names": ["caseExactIA5Match"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26" },
    { "oid": "1.3.6.1.4.1.1466.109.114.2", "names": ["caseIgnoreIA5Match"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26" }
  ],
  "attributeTypes": [
    {
      "oid": "2.5.4.0",
      "names": ["objectClass"],
      "description": "RFC 4512: object classes of the entity",
      "equality": "objectIdentifierMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.38"
    },
    {
      "oid": "2.5.4.1",
      "names": ["aliasedObjectName", "aliasedEntryName"],
      "description": "RFC 4512: name of aliased object",
      "singleValued": true,
      "equality": "distinguishedNameMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12"
    },
    {
      "oid": "2.5.18.1",
      "names": ["createTimestamp"],
      "description": "RFC 4512: time which object was created",
      "userModifiable": false,
      "singleValued": true,
      "usage": "directoryOperation",
      "equality": "generalizedTimeMatch",
      "ordering": "generalizedTimeOrderingMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.24"
    },
    {
      "oid": "2.5.18.2",
      "names": ["modifyTimestamp"],
      "description": "RFC 4512: time which object was last modified",
      "userModifiable": false,
      "singleValued": true,
      "usage": "directoryOperation",
      "equality": "generalizedTimeMatch",
      "ordering": "generalizedTimeOrderingMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.24"
    },
    {
      "oid": "2.5.18.3",
      "names": ["creatorsName"],
      "description": "RFC 4512: name of creator",
      "userModifiable": false,
      "singleValued": true,
      "usage": "directoryOperation",
      "equality": "distinguishedNameMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12"
    },
    {
      "oid": "2.5.18.4",
      "names": ["modifiersName"],
      "description": "RFC 4512: name of last modifier",
      "userModifiable": false,
      "singleValued": true,
      "usage": "directoryOperation",
      "equality": "distinguishedNameMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12"
    }
  ],
  "objectClasses": [
    {
      "oid": "2.5.6.0",
      "names": ["top"],
      "description": "top of the superclass chain",
      "kind": "ABSTRACT",
      "must": ["objectClass"]
    },
    {
      "oid": "2.5.6.1",
      "names": ["alias"],
      "description": "an alias",
      "superiors": ["top"],
      "must": ["aliasedObjectName"]
    },
    {
      "oid": "1.3.6.1.4.1.1466.101.120.111",
      "names": ["extensibleObject"],
      "description": "RFC 4512: extensible object",
      "kind": "AUXILIARY",
      "superiors": ["top"]
    }
  ]
}"#
}

/// Returns the `core` schema as a JSON string.
///
/// The X.520 naming attributes and the person/organization class families.
pub fn core_schema() -> &'static str {
    r#"{
  "name": "core",
  "owner": "uid=admin,ou=system",
  "dependencies": ["system"],
  "attributeTypes": [
    {
      "oid": "2.5.4.41",
      "names": ["name"],
      "description": "RFC 4519: common supertype of name attributes",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.3",
      "names": ["cn", "commonName"],
      "description": "RFC 4519: common name(s) for which the entity is known by",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.4",
      "names": ["sn", "surname"],
      "description": "RFC 4519: last (family) name(s) for which the entity is known by",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.7",
      "names": ["l", "localityName"],
      "description": "RFC 4519: locality which this object resides in",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.10",
      "names": ["o", "organizationName"],
      "description": "RFC 4519: organization this object belongs to",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.11",
      "names": ["ou", "organizationalUnitName"],
      "description": "RFC 4519: organizational unit this object belongs to",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.12",
      "names": ["title"],
      "description": "RFC 4519: title associated with the entity",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.13",
      "names": ["description"],
      "description": "RFC 4519: descriptive information",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "2.5.4.20",
      "names": ["telephoneNumber"],
      "description": "RFC 4519: Telephone Number",
      "equality": "telephoneNumberMatch",
      "substring": "telephoneNumberSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.50"
    },
    {
      "oid": "2.5.4.34",
      "names": ["seeAlso"],
      "description": "RFC 4519: DN of related object",
      "equality": "distinguishedNameMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12"
    },
    {
      "oid": "2.5.4.35",
      "names": ["userPassword"],
      "description": "RFC 4519/2307: password of user",
      "equality": "octetStringMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.40"
    },
    {
      "oid": "0.9.2342.19200300.100.1.1",
      "names": ["uid", "userid"],
      "description": "RFC 4519: user identifier",
      "equality": "caseIgnoreMatch",
      "substring": "caseIgnoreSubstringsMatch",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "0.9.2342.19200300.100.1.3",
      "names": ["mail", "rfc822Mailbox"],
      "description": "RFC 1274: RFC822 Mailbox",
      "equality": "caseIgnoreIA5Match",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.26"
    }
  ],
  "objectClasses": [
    {
      "oid": "2.5.6.6",
      "names": ["person"],
      "description": "RFC 4519: a person",
      "superiors": ["top"],
      "must": ["sn", "cn"],
      "may": ["userPassword", "telephoneNumber", "seeAlso", "description"]
    },
    {
      "oid": "2.5.6.7",
      "names": ["organizationalPerson"],
      "description": "RFC 4519: an organizational person",
      "superiors": ["person"],
      "may": ["title", "ou", "l", "telephoneNumber"]
    },
    {
      "oid": "2.5.6.4",
      "names": ["organization"],
      "description": "RFC 4519: an organization",
      "superiors": ["top"],
      "must": ["o"],
      "may": ["userPassword", "seeAlso", "telephoneNumber", "l", "description"]
    },
    {
      "oid": "2.5.6.5",
      "names": ["organizationalUnit"],
      "description": "RFC 4519: an organizational unit",
      "superiors": ["top"],
      "must": ["ou"],
      "may": ["userPassword", "seeAlso", "telephoneNumber", "l", "description"]
    },
    {
      "oid": "2.16.840.1.113730.3.2.2",
      "names": ["inetOrgPerson"],
      "description": "RFC 2798: Internet Organizational Person",
      "superiors": ["organizationalPerson"],
      "may": ["uid", "mail"]
    }
  ]
}"#
}

/// Returns the `gevirtz` account-management schema as a JSON string.
///
/// Attributes for acceptable-use tracking, password-change auditing and account
/// inactivation, plus the `ggseperson` class that carries them.
pub fn gevirtz_schema() -> &'static str {
    r#"{
  "name": "gevirtz",
  "owner": "uid=admin,ou=system",
  "dependencies": ["system", "core"],
  "attributeTypes": [
    {
      "oid": "1.3.6.1.4.1.18060.0.4.1.2.1001",
      "names": ["ituseagreementacceptdate"],
      "description": "ituseagreementacceptdate",
      "userModifiable": true,
      "singleValued": true,
      "usage": "userApplications",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.24"
    },
    {
      "oid": "1.3.6.1.4.1.18060.0.4.1.2.1002",
      "names": ["passwordchangedate"],
      "description": "Password reset TimeStamp",
      "userModifiable": true,
      "usage": "userApplications",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "1.3.6.1.4.1.18060.0.4.1.2.1003",
      "names": ["nsroledn"],
      "description": "Sun ONE defined attribute type",
      "userModifiable": true,
      "usage": "userApplications",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12"
    },
    {
      "oid": "1.3.6.1.4.1.18060.0.4.1.2.1004",
      "names": ["nsaccountlock"],
      "description": "Operational attribute for Account Inactivation",
      "userModifiable": true,
      "usage": "userApplications",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    },
    {
      "oid": "1.3.6.1.4.1.18060.0.4.1.2.1005",
      "names": ["mailforwardingaddress"],
      "description": "Mail forwarding address",
      "userModifiable": true,
      "usage": "userApplications",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.15"
    }
  ],
  "objectClasses": [
    {
      "oid": "1.3.6.1.4.1.18060.0.4.1.3.1001",
      "names": ["ggseperson"],
      "description": "ggseperson",
      "kind": "STRUCTURAL",
      "superiors": ["person"],
      "must": [],
      "may": [
        "ituseagreementacceptdate",
        "passwordchangedate",
        "nsroledn",
        "nsaccountlock",
        "mailforwardingaddress"
      ]
    }
  ]
}"#
}

/// Parse every embedded bundle, dependencies first.
pub fn bundles() -> BundleResult<Vec<SchemaBundle>> {
    [system_schema(), core_schema(), gevirtz_schema()]
        .into_iter()
        .map(SchemaBundle::from_json)
        .collect()
}

/// Look up an embedded bundle by schema name.
pub fn bundle(name: &str) -> BundleResult<Option<SchemaBundle>> {
    let content = match name {
        "system" => system_schema(),
        "core" => core_schema(),
        "gevirtz" => gevirtz_schema(),
        _ => return Ok(None),
    };
    SchemaBundle::from_json(content).map(Some)
}
