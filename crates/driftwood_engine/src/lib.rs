//! Runtime algorithms over a validated world.
//!
//! Three services, each independent of the others: shortest-path and
//! path-adjacency queries over the room graph ([`Pathfinder`]), per-turn
//! NPC movement ([`advance_npcs`]), and use-action resolution
//! ([`resolve_use`]). All three are synchronous and single-threaded;
//! mutation goes through [`driftwood_world::World`] methods only.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod movement;
pub mod pathfinding;

pub use action::{UseMatch, UseOutcome, UseTarget, resolve_use, select_action};
pub use movement::{TurnReport, advance_npcs};
pub use pathfinding::Pathfinder;
