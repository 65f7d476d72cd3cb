//! The resolved world: rooms, the player inventory, flags, and the
//! derived location indexes that keep entity lookup O(log n).

use crate::item::{Item, ItemLocation};
use crate::npc::Npc;
use crate::pronouns::PronounSet;
use crate::room::Room;
use driftwood_foundation::{Error, Label, Result, SymbolClass};
use std::collections::BTreeMap;

/// A fully resolved, validated world. Construction goes through the
/// loader; once built, every cross-reference in here is known-good.
///
/// The location indexes are derived state. Every mutation that moves an
/// entity goes through a single method on this type so the index and the
/// room contents never disagree.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// All rooms, keyed by label.
    pub rooms: BTreeMap<Label, Room>,
    /// The room the player starts in.
    pub start: Label,
    /// Flag defaults, label to initial value. Live flag values belong to
    /// whatever script host drives the world, not to this structure.
    pub flags: BTreeMap<Label, String>,
    /// Items the player carries, keyed by label.
    pub inventory: BTreeMap<Label, Item>,
    /// Pronoun sets by registry key. Keys are not labels (built-in keys
    /// such as "SHE/HER" contain a slash), so this map is string-keyed.
    pub pronouns: BTreeMap<String, PronounSet>,
    item_locations: BTreeMap<Label, ItemLocation>,
    npc_locations: BTreeMap<Label, Label>,
}

impl World {
    /// Creates an empty world starting in the given room. The loader
    /// inserts that room before handing the world out.
    #[must_use]
    pub fn new(start: Label) -> Self {
        Self {
            start,
            pronouns: PronounSet::built_ins(),
            ..Self::default()
        }
    }

    // ===== Lookup =====

    /// The room with the given label.
    #[must_use]
    pub fn room(&self, label: &Label) -> Option<&Room> {
        self.rooms.get(label)
    }

    /// Where an item currently is, by label. Covers room floors and the
    /// player inventory alike.
    #[must_use]
    pub fn item_location(&self, label: &Label) -> Option<&ItemLocation> {
        self.item_locations.get(label)
    }

    /// The room an NPC currently occupies, by label.
    #[must_use]
    pub fn npc_location(&self, label: &Label) -> Option<&Label> {
        self.npc_locations.get(label)
    }

    /// The NPC with the given label, wherever it is.
    #[must_use]
    pub fn npc(&self, label: &Label) -> Option<&Npc> {
        let room = self.npc_locations.get(label)?;
        self.rooms.get(room)?.npcs.get(label)
    }

    /// Mutable access to an NPC, wherever it is.
    pub fn npc_mut(&mut self, label: &Label) -> Option<&mut Npc> {
        let room = self.npc_locations.get(label)?.clone();
        self.rooms.get_mut(&room)?.npcs.get_mut(label)
    }

    /// Labels of all NPCs in the world, in sorted order.
    #[must_use]
    pub fn npc_labels(&self) -> Vec<Label> {
        self.npc_locations.keys().cloned().collect()
    }

    // ===== Placement (loader-facing) =====

    /// Adds a room. Later placements may reference it.
    pub fn insert_room(&mut self, room: Room) {
        self.rooms.insert(room.label.clone(), room);
    }

    /// Puts an item at its home location and records it in the index.
    pub fn place_item(&mut self, item: Item) -> Result<()> {
        let home = item.home.clone();
        let label = item.label.clone();
        match &home {
            ItemLocation::Inventory => {
                self.inventory.insert(label.clone(), item);
            }
            ItemLocation::Room(room_label) => {
                let room = self.rooms.get_mut(room_label).ok_or_else(|| {
                    Error::unknown_reference(SymbolClass::Room, room_label.as_str())
                })?;
                room.items.push(item);
            }
        }
        self.item_locations.insert(label, home);
        Ok(())
    }

    /// Puts an NPC in its start room and records it in the index.
    pub fn place_npc(&mut self, npc: Npc) -> Result<()> {
        let room_label = npc.start.clone();
        let label = npc.label.clone();
        let room = self
            .rooms
            .get_mut(&room_label)
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Room, room_label.as_str()))?;
        room.npcs.insert(label.clone(), npc);
        self.npc_locations.insert(label, room_label);
        Ok(())
    }

    // ===== Movement =====

    /// Moves an NPC to another room, updating the index in the same
    /// operation.
    pub fn move_npc(&mut self, npc_label: &Label, dest: &Label) -> Result<()> {
        if !self.rooms.contains_key(dest) {
            return Err(Error::unknown_reference(SymbolClass::Room, dest.as_str()));
        }
        let from = self
            .npc_locations
            .get(npc_label)
            .cloned()
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Npc, npc_label.as_str()))?;
        if from == *dest {
            return Ok(());
        }
        let npc = self
            .rooms
            .get_mut(&from)
            .and_then(|room| room.npcs.remove(npc_label))
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Npc, npc_label.as_str()))?;
        self.rooms
            .get_mut(dest)
            .map(|room| room.npcs.insert(npc_label.clone(), npc));
        self.npc_locations.insert(npc_label.clone(), dest.clone());
        Ok(())
    }

    /// Moves an item from wherever it is to another room's floor.
    pub fn move_item(&mut self, item_label: &Label, dest: &Label) -> Result<()> {
        if !self.rooms.contains_key(dest) {
            return Err(Error::unknown_reference(SymbolClass::Room, dest.as_str()));
        }
        let item = self.remove_item(item_label)?;
        if let Some(room) = self.rooms.get_mut(dest) {
            room.items.push(item);
        }
        self.item_locations
            .insert(item_label.clone(), ItemLocation::Room(dest.clone()));
        Ok(())
    }

    /// Moves an item from a room floor into the player inventory.
    pub fn take_item(&mut self, item_label: &Label) -> Result<()> {
        let item = self.remove_item(item_label)?;
        self.inventory.insert(item_label.clone(), item);
        self.item_locations
            .insert(item_label.clone(), ItemLocation::Inventory);
        Ok(())
    }

    /// Moves an item from the player inventory onto a room's floor.
    pub fn drop_item(&mut self, item_label: &Label, dest: &Label) -> Result<()> {
        self.move_item(item_label, dest)
    }

    fn remove_item(&mut self, item_label: &Label) -> Result<Item> {
        let location = self
            .item_locations
            .get(item_label)
            .cloned()
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Item, item_label.as_str()))?;
        let item = match &location {
            ItemLocation::Inventory => self.inventory.remove(item_label),
            ItemLocation::Room(room_label) => self
                .rooms
                .get_mut(room_label)
                .and_then(|room| room.take_item(item_label)),
        };
        item.ok_or_else(|| Error::unknown_reference(SymbolClass::Item, item_label.as_str()))
    }
}
