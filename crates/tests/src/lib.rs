//! Integration test harness for the yangc reactor.
//!
//! Raw statement trees are tedious to build by hand, so this crate
//! provides small constructors for the shapes the tests need: positioned
//! statements, minimal well-formed modules, and a one-call build over a
//! source set.

use yangc_model::{Revision, SourceIdentifier, SourceRef};
use yangc_reactor::{EffectiveModel, RawStatement, ReactorError, SchemaReactor};

/// Position `line:1` within the named source.
pub fn at(source: &str, line: u32) -> SourceRef {
    SourceRef::new(SourceIdentifier::new(source, Revision::Undated), line, 1)
}

/// A raw statement positioned within the named source.
pub fn stmt(source: &str, line: u32, keyword: &str, argument: Option<&str>) -> RawStatement {
    RawStatement::new(keyword, argument, at(source, line))
}

/// A minimal well-formed module: `module <name> { namespace <ns>;
/// prefix <name>; }`. Callers attach further substatements.
pub fn module(name: &str, namespace: &str) -> RawStatement {
    stmt(name, 1, "module", Some(name))
        .with_child(stmt(name, 2, "namespace", Some(namespace)))
        .with_child(stmt(name, 3, "prefix", Some(name)))
}

/// A leaf with a single `type` substatement.
pub fn leaf(source: &str, line: u32, name: &str, type_name: &str) -> RawStatement {
    stmt(source, line, "leaf", Some(name))
        .with_child(stmt(source, line + 1, "type", Some(type_name)))
}

/// A typedef with a single `type` substatement.
pub fn typedef(source: &str, line: u32, name: &str, type_name: &str) -> RawStatement {
    stmt(source, line, "typedef", Some(name))
        .with_child(stmt(source, line + 1, "type", Some(type_name)))
}

/// Build an effective model from the given sources with the built-in
/// statement supports.
pub fn build(
    sources: impl IntoIterator<Item = RawStatement>,
) -> Result<EffectiveModel, ReactorError> {
    let mut reactor = SchemaReactor::new();
    for source in sources {
        reactor.add_source(source);
    }
    reactor.build()
}
