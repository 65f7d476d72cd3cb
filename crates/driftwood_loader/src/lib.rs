//! World definition loading for Driftwood.
//!
//! The loader turns a tree of TOML resource files into a validated
//! [`World`](driftwood_world::World), in three phases:
//!
//! 1. **Resolution** ([`resolve`]) reads the entry file, follows manifest
//!    includes recursively, and merges every data file into one raw
//!    definition.
//! 2. **Symbol scan** ([`symbols`]) collects every declared label and
//!    alias, enforcing the uniqueness and grammar rules for each scope.
//! 3. **Validation** ([`validate`]) cross-checks every reference, compiles
//!    guards and effects through the caller's
//!    [`ScriptHost`](driftwood_foundation::ScriptHost), verifies NPC route
//!    reachability, and assembles the final world.
//!
//! Any failure in any phase aborts the whole load with a diagnostic that
//! names the offending file, table, and field.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod raw;
pub mod resolve;
pub mod symbols;
pub mod validate;

pub use resolve::{MAX_INCLUDE_DEPTH, load_raw};
pub use symbols::SymbolTable;
pub use validate::build_world;

use driftwood_foundation::{Result, ScriptHost};
use driftwood_world::World;
use std::path::Path;

/// Loads, validates, and builds a world from the resource file at `path`,
/// which may be a data file or a manifest.
pub fn load_world(path: impl AsRef<Path>, host: &mut dyn ScriptHost) -> Result<World> {
    let raw = resolve::load_raw(path.as_ref())?;
    validate::build_world(raw, host)
}
