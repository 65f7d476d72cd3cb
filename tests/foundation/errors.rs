//! Integration tests for error diagnostics
//!
//! Context-segment chaining and the kinds loaders match against.

use driftwood_foundation::{Error, ErrorKind, SymbolClass};

#[test]
fn segments_prepend_outermost_last() {
    let err = Error::missing_field("description")
        .in_segment("exits[2]")
        .in_segment("room \"HALL\"");
    assert_eq!(
        err.to_string(),
        "room \"HALL\": exits[2]: must have non-blank \"description\" field"
    );
}

#[test]
fn bare_errors_print_their_kind_alone() {
    let err = Error::unknown_reference(SymbolClass::Room, "ATTIC");
    assert_eq!(err.to_string(), "no room with label \"ATTIC\" exists");
}

#[test]
fn duplicate_symbol_names_the_prior_owner() {
    let err = Error::duplicate_symbol(SymbolClass::Item, "LAMP", "item \"LAMP\"");
    assert!(err.to_string().contains("already been used"));
    assert!(matches!(err.kind, ErrorKind::DuplicateSymbol { .. }));
}

#[test]
fn circular_include_marker_is_queryable() {
    let err = Error::new(ErrorKind::CircularInclude {
        path: "worlds/root.tqm".into(),
    });
    assert!(err.is_circular_include());
    assert!(!Error::missing_field("start").is_circular_include());
}

#[test]
fn io_errors_chain_their_source() {
    let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = Error::io("missing.tqd", inner);
    assert!(std::error::Error::source(&err).is_some());
}
