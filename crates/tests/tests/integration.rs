//! End-to-end tests over the reactor: raw statement trees in, effective
//! model or structured diagnostics out.

use yangc_model::{BuiltinType, ModuleIdentifier, Revision};
use yangc_reactor::{
    EffectiveDetail, ErrorKind, RawStatement, ReactorError, TypeDefinition,
};
use yangc_tests::{at, build, leaf, module, stmt, typedef};

/// A single self-contained module freezes into a model entry with its
/// resolved identity and typed leaves.
#[test]
fn test_single_module_builds() {
    let source = module("acme", "urn:example:acme").with_child(leaf("acme", 4, "host", "string"));

    let model = build([source]).unwrap();
    assert_eq!(model.modules.len(), 1);

    let acme = model.module("acme").unwrap();
    let detail = acme.as_module().unwrap();
    assert_eq!(detail.name, "acme");
    assert_eq!(detail.prefix, "acme");
    assert_eq!(detail.qname_module.namespace().as_str(), "urn:example:acme");
    assert_eq!(detail.qname_module.revision(), Revision::Undated);

    let host = acme.substatement("leaf").unwrap().as_leaf().unwrap();
    assert_eq!(host.qname.local_name(), "host");
    assert_eq!(host.type_def, TypeDefinition::String);
}

/// Source declaration order never changes the outcome, only the number
/// of retry rounds.
#[test]
fn test_declaration_order_is_irrelevant() {
    let importer = || {
        module("a", "urn:example:a")
            .with_child(
                stmt("a", 4, "import", Some("b"))
                    .with_child(stmt("a", 5, "prefix", Some("b"))),
            )
            .with_child(leaf("a", 6, "port", "b:port-number"))
    };
    let imported = || {
        module("b", "urn:example:b").with_child(
            typedef("b", 4, "port-number", "uint16"),
        )
    };

    let forward = build([imported(), importer()]).unwrap();
    let backward = build([importer(), imported()]).unwrap();
    assert_eq!(forward, backward);

    let port = forward
        .module("a")
        .unwrap()
        .substatement("leaf")
        .unwrap()
        .as_leaf()
        .unwrap();
    match &port.type_def {
        TypeDefinition::Numeric(n) => {
            assert_eq!(n.base, BuiltinType::Uint16);
            assert_eq!((n.range.min(), n.range.max()), (0, 65535));
        }
        other => panic!("expected numeric type, got {:?}", other),
    }
}

/// An import nothing in the build satisfies is a terminal resolution
/// failure with a structured resolved/unsatisfied breakdown.
#[test]
fn test_unsatisfied_import_reports_breakdown() {
    let blocked = module("a", "urn:example:a").with_child(
        stmt("a", 4, "import", Some("missing"))
            .with_child(stmt("a", 5, "prefix", Some("m"))),
    );
    let fine = module("b", "urn:example:b");

    let err = build([blocked, fine]).unwrap_err();
    let ReactorError::Resolution(err) = err else {
        panic!("expected resolution failure, got {:?}", err);
    };

    assert_eq!(err.resolved.len(), 1);
    assert_eq!(err.resolved[0].name, "b");

    assert_eq!(err.unsatisfied.len(), 1);
    let (source, imports) = err.unsatisfied.first().unwrap();
    assert_eq!(source.name, "a");
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].module_name, "missing");
    assert_eq!(imports[0].revision, None);
}

/// Typedef chains resolve link by link across retry rounds, so a use
/// site may precede every definition it depends on.
#[test]
fn test_typedef_chain_resolves_forward_references() {
    let source = module("acme", "urn:example:acme")
        .with_child(leaf("acme", 4, "port", "acme-port"))
        .with_child(typedef("acme", 6, "acme-port", "restricted"))
        .with_child(
            stmt("acme", 8, "typedef", Some("restricted")).with_child(
                stmt("acme", 9, "type", Some("uint16"))
                    .with_child(stmt("acme", 10, "range", Some("10..20"))),
            ),
        );

    let model = build([source]).unwrap();
    let port = model
        .module("acme")
        .unwrap()
        .substatement("leaf")
        .unwrap()
        .as_leaf()
        .unwrap();
    match &port.type_def {
        TypeDefinition::Numeric(n) => {
            assert_eq!(n.base, BuiltinType::Uint16);
            assert_eq!((n.range.min(), n.range.max()), (10, 20));
        }
        other => panic!("expected numeric type, got {:?}", other),
    }
}

/// A range restriction outside the base type's bounds is rejected, never
/// clamped.
#[test]
fn test_range_outside_base_is_rejected() {
    let source = module("acme", "urn:example:acme").with_child(
        stmt("acme", 4, "leaf", Some("port")).with_child(
            stmt("acme", 5, "type", Some("uint16"))
                .with_child(stmt("acme", 6, "range", Some("10..70000"))),
        ),
    );

    let err = build([source]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::RangeViolation);
    assert!(errors[0].message.contains("70000"));
}

/// The full uint64 range is representable and carries the canonical
/// description.
#[test]
fn test_uint64_full_range() {
    let source =
        module("acme", "urn:example:acme").with_child(leaf("acme", 4, "counter", "uint64"));

    let model = build([source]).unwrap();
    let counter = model
        .module("acme")
        .unwrap()
        .substatement("leaf")
        .unwrap()
        .as_leaf()
        .unwrap();
    match &counter.type_def {
        TypeDefinition::Numeric(n) => {
            assert_eq!(n.range.max(), 18446744073709551615);
            assert_eq!(
                n.description,
                "uint64 represents integer values between 0 and 18446744073709551615, \
                 inclusively."
            );
        }
        other => panic!("expected numeric type, got {:?}", other),
    }
}

/// Two modules publishing the same name with different namespaces is a
/// conflict, not a silent overwrite.
#[test]
fn test_duplicate_module_name_conflicts() {
    let first = module("acme", "urn:example:one");
    let second = module("acme", "urn:example:two");

    let err = build([first, second]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors[0].kind, ErrorKind::NamespaceConflict);
}

/// Unknown keywords are collected across the whole source set before the
/// build aborts.
#[test]
fn test_unknown_keywords_are_collected() {
    let source = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "frobnicate", Some("x")))
        .with_child(stmt("acme", 5, "gizmo", None));

    let err = build([source]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| e.kind == ErrorKind::UnknownStatement));
}

/// Substatement counts outside the declared occurrence range are
/// reported with keyword, range and observed count.
#[test]
fn test_cardinality_violations() {
    let two_prefixes = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "prefix", Some("again")));
    let err = build([two_prefixes]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors[0].kind, ErrorKind::Cardinality);
    assert!(errors[0].message.contains("'prefix'"));
    assert!(errors[0].message.contains("observed 2"));

    let untyped_leaf = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "leaf", Some("host")));
    let err = build([untyped_leaf]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors[0].kind, ErrorKind::Cardinality);
    assert!(errors[0].message.contains("'type'"));
}

/// A module without its mandatory namespace fails in pre-linkage with a
/// missing-statement diagnostic.
#[test]
fn test_missing_namespace_fails() {
    let source = stmt("acme", 1, "module", Some("acme"))
        .with_child(stmt("acme", 2, "prefix", Some("acme")));

    let err = build([source]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors[0].kind, ErrorKind::MissingStatement);
    assert!(errors[0].message.contains("namespace of module 'acme'"));
}

/// A `uses` statement resolves a grouping declared after it.
#[test]
fn test_grouping_forward_reference() {
    let source = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "uses", Some("endpoint")))
        .with_child(
            stmt("acme", 5, "grouping", Some("endpoint"))
                .with_child(leaf("acme", 6, "host", "string")),
        );

    let model = build([source]).unwrap();
    assert!(model.module("acme").unwrap().substatement("uses").is_some());
}

/// A `uses` naming a grouping that never appears is a terminal
/// resolution failure.
#[test]
fn test_unresolvable_grouping_fails() {
    let source = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "uses", Some("phantom")));

    let err = build([source]).unwrap_err();
    assert!(matches!(err, ReactorError::Resolution(_)));
}

/// The module's effective revision is the latest declared one, and it
/// keys the model entry.
#[test]
fn test_latest_revision_keys_the_model() {
    let source = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "revision", Some("2023-05-01")))
        .with_child(stmt("acme", 5, "revision", Some("2024-01-15")));

    let model = build([source]).unwrap();
    let latest = Revision::parse("2024-01-15").unwrap();
    let entry = model
        .get(&ModuleIdentifier::new("acme", latest))
        .expect("model keyed by latest revision");
    assert_eq!(entry.as_module().unwrap().qname_module.revision(), latest);
}

/// An import pinned to a revision resolves only against that exact
/// revision.
#[test]
fn test_revision_pinned_import() {
    let imported = || {
        module("b", "urn:example:b")
            .with_child(stmt("b", 4, "revision", Some("2024-01-15")))
    };
    let importer = |pinned: &str| {
        module("a", "urn:example:a").with_child(
            stmt("a", 4, "import", Some("b"))
                .with_child(stmt("a", 5, "prefix", Some("b")))
                .with_child(stmt("a", 6, "revision-date", Some(pinned))),
        )
    };

    assert!(build([imported(), importer("2024-01-15")]).is_ok());

    let err = build([imported(), importer("2023-01-01")]).unwrap_err();
    let ReactorError::Resolution(err) = err else {
        panic!("expected resolution failure, got {:?}", err);
    };
    let imports = &err.unsatisfied[0];
    assert_eq!(imports[0].module_name, "b");
    assert_eq!(imports[0].revision, Some(Revision::parse("2023-01-01").unwrap()));
}

/// One revision of module `b`, defining `port-number` with the given
/// range so tests can tell the revisions apart.
fn b_revision(revision: &str, range: &str) -> RawStatement {
    module("b", "urn:example:b")
        .with_child(stmt("b", 4, "revision", Some(revision)))
        .with_child(
            stmt("b", 5, "typedef", Some("port-number")).with_child(
                stmt("b", 6, "type", Some("uint16"))
                    .with_child(stmt("b", 7, "range", Some(range))),
            ),
        )
}

/// Two revisions of one module name coexist in a build, each keyed by
/// its own identifier, and a pinned import selects its exact revision.
#[test]
fn test_two_revisions_of_one_module_coexist() {
    let importer = module("a", "urn:example:a")
        .with_child(
            stmt("a", 4, "import", Some("b"))
                .with_child(stmt("a", 5, "prefix", Some("b")))
                .with_child(stmt("a", 6, "revision-date", Some("2023-01-01"))),
        )
        .with_child(leaf("a", 7, "port", "b:port-number"));

    let model = build([
        b_revision("2023-01-01", "1..100"),
        b_revision("2024-01-15", "1..200"),
        importer,
    ])
    .unwrap();

    assert_eq!(model.modules.len(), 3);
    for revision in ["2023-01-01", "2024-01-15"] {
        let id = ModuleIdentifier::new("b", Revision::parse(revision).unwrap());
        assert!(model.get(&id).is_some(), "missing b@{}", revision);
    }

    let port = model
        .module("a")
        .unwrap()
        .substatement("leaf")
        .unwrap()
        .as_leaf()
        .unwrap();
    match &port.type_def {
        TypeDefinition::Numeric(n) => {
            assert_eq!((n.range.min(), n.range.max()), (1, 100));
        }
        other => panic!("expected numeric type, got {:?}", other),
    }
}

/// An import without a `revision-date` binds to the latest revision of
/// the named module.
#[test]
fn test_unpinned_import_binds_latest_revision() {
    let importer = module("a", "urn:example:a")
        .with_child(
            stmt("a", 4, "import", Some("b"))
                .with_child(stmt("a", 5, "prefix", Some("b"))),
        )
        .with_child(leaf("a", 6, "port", "b:port-number"));

    let model = build([
        b_revision("2024-01-15", "1..200"),
        b_revision("2023-01-01", "1..100"),
        importer,
    ])
    .unwrap();

    let port = model
        .module("a")
        .unwrap()
        .substatement("leaf")
        .unwrap()
        .as_leaf()
        .unwrap();
    match &port.type_def {
        TypeDefinition::Numeric(n) => {
            assert_eq!((n.range.min(), n.range.max()), (1, 200));
        }
        other => panic!("expected numeric type, got {:?}", other),
    }
}

/// A namespace conflict names both writers: the error points at the
/// rejected statement and a label points at the first publisher.
#[test]
fn test_namespace_conflict_labels_first_publisher() {
    let first = module("acme", "urn:example:one");
    let second = stmt("dup", 1, "module", Some("acme"))
        .with_child(stmt("dup", 2, "namespace", Some("urn:example:two")))
        .with_child(stmt("dup", 3, "prefix", Some("acme")));

    let err = build([first, second]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors[0].kind, ErrorKind::NamespaceConflict);
    assert_eq!(errors[0].at, at("dup", 1));
    assert_eq!(errors[0].labels.len(), 1);
    assert_eq!(errors[0].labels[0].message, "first published here");
    assert_eq!(errors[0].labels[0].at, at("acme", 1));
}

/// Submodules link against their parent module and never appear as
/// model entries themselves.
#[test]
fn test_submodule_links_but_stays_out_of_the_model() {
    let parent = module("m", "urn:example:m")
        .with_child(stmt("m", 4, "include", Some("s")));
    let sub = stmt("s", 1, "submodule", Some("s")).with_child(
        stmt("s", 2, "belongs-to", Some("m"))
            .with_child(stmt("s", 3, "prefix", Some("m"))),
    );

    let model = build([sub, parent]).unwrap();
    assert_eq!(model.modules.len(), 1);
    assert!(model.module("m").is_some());
}

/// Malformed arguments are rejected at context creation.
#[test]
fn test_argument_syntax_errors() {
    let bad_version = module("acme", "urn:example:acme")
        .with_child(stmt("acme", 4, "yang-version", Some("2")));
    let err = build([bad_version]).unwrap_err();
    let ReactorError::Invalid(errors) = err else {
        panic!("expected invalid source, got {:?}", err);
    };
    assert_eq!(errors[0].kind, ErrorKind::Syntax);

    let bad_uri = stmt("acme", 1, "module", Some("acme"))
        .with_child(stmt("acme", 2, "namespace", Some("not a uri")))
        .with_child(stmt("acme", 3, "prefix", Some("acme")));
    let err = build([bad_uri]).unwrap_err();
    assert!(matches!(err, ReactorError::Invalid(_)));
}

/// Container and list nodes freeze with their qualified names.
#[test]
fn test_interior_nodes_carry_qnames() {
    let source = module("acme", "urn:example:acme").with_child(
        stmt("acme", 4, "container", Some("system")).with_child(
            stmt("acme", 5, "list", Some("interface"))
                .with_child(stmt("acme", 6, "key", Some("name")))
                .with_child(leaf("acme", 7, "name", "string")),
        ),
    );

    let model = build([source]).unwrap();
    let container = model
        .module("acme")
        .unwrap()
        .substatement("container")
        .unwrap();
    let EffectiveDetail::Node { qname } = &container.detail else {
        panic!("expected node detail, got {:?}", container.detail);
    };
    assert_eq!(qname.local_name(), "system");
    assert_eq!(qname.module().namespace().as_str(), "urn:example:acme");

    let list = container.substatement("list").unwrap();
    assert!(matches!(list.detail, EffectiveDetail::Node { .. }));
}
