//! NPC definitions, movement routes, and the patrol cursor.

use crate::dialog::DialogStep;
use crate::pronouns::PronounSet;
use driftwood_foundation::{Alias, Guard, Label, Tag, Text};
use std::fmt;

// ===== Routes =====

/// How an NPC moves between rooms, one step per world turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Never moves.
    Static,
    /// Walks a fixed circuit of rooms in order, looping forever.
    Patrol {
        /// The circuit, at least two rooms. Consecutive entries (and the
        /// last back to the first) must be one exit apart.
        path: Vec<Label>,
    },
    /// Moves one random hop per turn within an allowed set of rooms.
    Wander {
        /// Rooms the NPC may enter. Empty means anywhere.
        allowed: Vec<Label>,
        /// Rooms the NPC may never enter, even when also allowed.
        forbidden: Vec<Label>,
    },
}

impl Route {
    /// Route kind as written in world files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "STATIC",
            Self::Patrol { .. } => "PATROL",
            Self::Wander { .. } => "WANDER",
        }
    }
}

/// Position within a patrol path. A cursor exists only after an explicit
/// reset; an unset cursor means the NPC has not begun its circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteCursor {
    /// Never reset. The NPC stands still until the cursor is reset.
    #[default]
    Unset,
    /// Reset but not yet stepped. The next step targets path index 0.
    Reset,
    /// The NPC's last step targeted this path index.
    At(usize),
}

impl RouteCursor {
    /// The path index the next patrol step should target, or `None` when
    /// the cursor was never reset.
    #[must_use]
    pub fn next_index(self, path_len: usize) -> Option<usize> {
        match self {
            Self::Unset => None,
            Self::Reset => Some(0),
            Self::At(index) => Some((index + 1) % path_len),
        }
    }
}

// ===== NPCs =====

/// A non-player character.
#[derive(Debug, Clone)]
pub struct Npc {
    /// Globally unique symbol.
    pub label: Label,
    /// Short human-readable name.
    pub name: String,
    /// Player-typed nouns referring to this NPC.
    pub aliases: Vec<Alias>,
    /// How generated phrases refer to this NPC.
    pub pronouns: PronounSet,
    /// Shown when the player looks at the NPC.
    pub description: Text,
    /// Room the NPC occupies at world start.
    pub start: Label,
    /// How the NPC moves each turn.
    pub route: Route,
    /// Patrol position. Meaningless for static and wandering NPCs.
    pub cursor: RouteCursor,
    /// Dialog tree, possibly empty.
    pub dialog: Vec<DialogStep>,
    /// Free-form category tags beyond the implicit class tag.
    pub tags: Vec<Tag>,
    /// Gates whether this NPC acts and is visible at all.
    pub guard: Guard,
}

impl Npc {
    /// Whether this NPC carries the given tag. Every NPC implicitly
    /// carries `@NPC`.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        tag.as_str() == "NPC" || self.tags.contains(tag)
    }

    /// Marks the start of the patrol circuit. Until this is called a
    /// patrolling NPC does not move.
    pub fn reset_route(&mut self) {
        if matches!(self.route, Route::Patrol { .. }) {
            self.cursor = RouteCursor::Reset;
        }
    }
}

impl fmt::Display for Npc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Npc<{} {}>", self.label, self.route.name())
    }
}
