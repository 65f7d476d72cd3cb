//! Validated world data model for Driftwood.
//!
//! Everything in this crate is produced by the loader's validator and is
//! immutable afterwards except for entity membership: items move between
//! one room's floor and the player inventory, NPCs move between rooms.
//! All such mutation goes through [`World`] methods so the dual-room move
//! invariant and the derived location indexes stay consistent.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dialog;
pub mod item;
pub mod npc;
pub mod pronouns;
pub mod room;
pub mod world;

pub use dialog::{Conversation, DialogKind, DialogStep};
pub use item::{Item, ItemLocation, UseAction};
pub use npc::{Npc, Route, RouteCursor};
pub use pronouns::PronounSet;
pub use room::{Detail, Egress, Room};
pub use world::World;
