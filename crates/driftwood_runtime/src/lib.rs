//! Turn-based play over a loaded world.
//!
//! [`Session`] owns the world, the caller's script host, and a seeded
//! random source, and exposes the player-level verbs: moving, taking and
//! dropping items, using things on each other, talking, and advancing
//! NPC turns. Everything below it is deterministic given the same world
//! file and seed.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod session;

pub use session::{MoveOutcome, Session};

use driftwood_foundation::{Result, ScriptHost};
use driftwood_world::World;
use std::path::Path;

/// Loads a world file through the given host. Shorthand for
/// [`driftwood_loader::load_world`].
pub fn load_world(path: impl AsRef<Path>, host: &mut dyn ScriptHost) -> Result<World> {
    driftwood_loader::load_world(path, host)
}
