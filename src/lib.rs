//! Driftwood - Text-adventure world engine
//!
//! This crate re-exports all layers of the Driftwood system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: driftwood_runtime    — Play sessions, player verbs, turn loop
//! Layer 2: driftwood_loader     — Resource resolution, symbol scan, validation
//!          driftwood_engine     — Pathfinding, NPC movement, use-actions
//! Layer 1: driftwood_world      — Rooms, items, NPCs, dialog, pronouns
//! Layer 0: driftwood_foundation — Core types (Label, Error, script seams)
//! ```

pub use driftwood_engine as engine;
pub use driftwood_foundation as foundation;
pub use driftwood_loader as loader;
pub use driftwood_runtime as runtime;
pub use driftwood_world as world;
