//! Rooms and the two kinds of room-local scenery: egresses and details.

use std::collections::BTreeMap;
use std::fmt;

use driftwood_foundation::{Alias, Guard, Label, Tag, Text};

use crate::item::Item;
use crate::npc::Npc;

/// An exit from a room, pointing at another room by label.
#[derive(Debug, Clone)]
pub struct Egress {
    /// World-unique label; auto-assigned by the loader when the file
    /// leaves it blank.
    pub label: Label,
    /// Label of the room this egress leads to. Always resolves in a
    /// validated world.
    pub dest: Label,
    /// Long description shown when the player looks at the egress.
    pub description: Text,
    /// Message shown when the player travels through.
    pub travel_message: Text,
    /// Phrases the player can use to travel via this egress. Room-scoped.
    pub aliases: Vec<Alias>,
    /// Declared tags, not including the implicit `@EXIT`.
    pub tags: Vec<Tag>,
    /// Activation guard; inactive egresses are invisible and untraversable.
    pub guard: Guard,
}

impl Egress {
    /// Returns true if this egress carries `tag`, including the implicit
    /// `@EXIT` class tag.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        tag.as_str() == "EXIT" || self.tags.contains(tag)
    }
}

impl fmt::Display for Egress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Egress({} -> {})", self.label, self.dest)
    }
}

/// A look-only piece of scenery in a room. Details never move and are
/// never consumed.
#[derive(Debug, Clone)]
pub struct Detail {
    /// World-unique label; auto-assigned by the loader when the file
    /// leaves it blank.
    pub label: Label,
    /// Phrases the player can use to target the detail. Room-scoped.
    pub aliases: Vec<Alias>,
    /// Long description shown when the player looks at the detail.
    pub description: Text,
    /// Declared tags, not including the implicit `@DETAIL`.
    pub tags: Vec<Tag>,
    /// Activation guard; inactive details are invisible.
    pub guard: Guard,
}

impl Detail {
    /// Returns true if this detail carries `tag`, including the implicit
    /// `@DETAIL` class tag.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        tag.as_str() == "DETAIL" || self.tags.contains(tag)
    }
}

/// A scene in the game: a description, exits to other rooms, and the
/// items, details, and NPCs currently present.
#[derive(Debug, Clone)]
pub struct Room {
    /// World-unique label.
    pub label: Label,
    /// Short name used before the player looks around.
    pub name: String,
    /// Long description shown on a bare look.
    pub description: Text,
    /// Exits in declaration order.
    pub exits: Vec<Egress>,
    /// Items on the floor; mutates during play via [`crate::World`].
    pub items: Vec<Item>,
    /// Details in declaration order.
    pub details: Vec<Detail>,
    /// NPCs currently present, by label; mutates during play via
    /// [`crate::World`].
    pub npcs: BTreeMap<Label, Npc>,
}

impl Room {
    /// Finds the egress answering to `alias`, if any.
    #[must_use]
    pub fn egress_by_alias(&self, alias: &Alias) -> Option<&Egress> {
        self.exits.iter().find(|eg| eg.aliases.contains(alias))
    }

    /// Finds the detail answering to `alias`, if any.
    #[must_use]
    pub fn detail_by_alias(&self, alias: &Alias) -> Option<&Detail> {
        self.details.iter().find(|det| det.aliases.contains(alias))
    }

    /// Finds the floor item answering to `alias`, if any.
    #[must_use]
    pub fn item_by_alias(&self, alias: &Alias) -> Option<&Item> {
        self.items.iter().find(|it| it.aliases.contains(alias))
    }

    /// Finds the present NPC answering to `alias`, if any.
    #[must_use]
    pub fn npc_by_alias(&self, alias: &Alias) -> Option<&Npc> {
        self.npcs.values().find(|npc| npc.aliases.contains(alias))
    }

    /// Labels of rooms reachable through exactly one egress, deduplicated
    /// and in sorted order. This is the wander candidate base set.
    #[must_use]
    pub fn one_hop_destinations(&self) -> Vec<Label> {
        let mut dests: Vec<Label> = self.exits.iter().map(|eg| eg.dest.clone()).collect();
        dests.sort();
        dests.dedup();
        dests
    }

    /// Removes and returns the item with the given label, if present.
    pub(crate) fn take_item(&mut self, label: &Label) -> Option<Item> {
        let idx = self.items.iter().position(|it| &it.label == label)?;
        Some(self.items.remove(idx))
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exits: Vec<String> = self.exits.iter().map(|eg| eg.dest.to_string()).collect();
        write!(f, "Room<{} {:?} exits: {}>", self.label, self.name, exits.join(", "))
    }
}
