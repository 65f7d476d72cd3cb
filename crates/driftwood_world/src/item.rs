//! Items, their use-actions, and item locations.

use std::fmt;

use driftwood_foundation::{Alias, Guard, Label, Script, Tag, Text, WithTerm};

/// Where an item currently lives. Exactly one location at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLocation {
    /// On the floor of the room with this label.
    Room(Label),
    /// In the player's inventory.
    Inventory,
}

impl ItemLocation {
    /// Parses the on-disk location form: the inventory pseudo-location
    /// `@INVEN`, or a room label.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.trim().eq_ignore_ascii_case("@INVEN") {
            Self::Inventory
        } else {
            Self::Room(Label::new(location))
        }
    }
}

impl fmt::Display for ItemLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room(label) => label.fmt(f),
            Self::Inventory => f.write_str("@INVEN"),
        }
    }
}

/// One way of using an item: the other things it must be used with, a
/// guard, and the effect statements to run on a match.
#[derive(Debug, Clone)]
pub struct UseAction {
    /// Requirement list. Empty means the item is used by itself.
    pub with: Vec<WithTerm>,
    /// Guard evaluated after this action is selected.
    pub guard: Guard,
    /// Effect statements run in order when the guard holds.
    pub effect: Vec<Script>,
}

impl UseAction {
    /// Count of concrete (non-tag) with-terms: the action's maximum
    /// possible specificity score.
    #[must_use]
    pub fn concrete_terms(&self) -> usize {
        self.with.iter().filter(|t| t.is_concrete()).count()
    }
}

/// An object the player can pick up, carry, and use.
#[derive(Debug, Clone)]
pub struct Item {
    /// World-unique label.
    pub label: Label,
    /// Short name.
    pub name: String,
    /// Long description shown when the player looks at the item.
    pub description: Text,
    /// Phrases that refer to the item. Globally scoped together with NPC
    /// aliases.
    pub aliases: Vec<Alias>,
    /// Declared tags, not including the implicit `@ITEM`.
    pub tags: Vec<Tag>,
    /// Activation guard; inactive items are invisible.
    pub guard: Guard,
    /// Use-actions in declaration order. Order is the documented
    /// tie-breaker for equal-specificity matches.
    pub on_use: Vec<UseAction>,
    /// Where the item is placed at world start.
    pub home: ItemLocation,
}

impl Item {
    /// Returns true if this item carries `tag`, including the implicit
    /// `@ITEM` class tag.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        tag.as_str() == "ITEM" || self.tags.contains(tag)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aliases: Vec<&str> = self.aliases.iter().map(Alias::as_str).collect();
        write!(f, "Item({}, ({}))", self.label, aliases.join(", "))
    }
}
