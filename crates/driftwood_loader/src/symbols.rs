//! Symbol scanning: every label and alias in a merged definition is
//! registered here, with grammar, reserved-word, and collision checks,
//! before any cross-reference validation runs.
//!
//! Scope rules: rooms, items, NPCs, flags, egresses, and details each
//! have one world-wide label namespace per class. Item and NPC aliases
//! share a single global conflict scope. Egress and detail aliases are
//! room-local, conflict with each other symmetrically within the room,
//! and must also avoid every global item/NPC alias. Dialog step labels
//! are scoped to one NPC's tree.

use crate::raw::{RawWorldData, RawDialogStep};
use driftwood_foundation::{Alias, Error, Label, Result, SymbolClass};
use std::collections::{BTreeMap, BTreeSet};

/// Assigns generated labels to egresses and details that declared none.
/// Must run before [`SymbolTable::scan`] so the generated labels take
/// part in duplicate detection like declared ones.
pub fn assign_auto_labels(raw: &mut RawWorldData) {
    let mut next_egress = 0usize;
    let mut next_detail = 0usize;
    for room in &mut raw.rooms {
        for egress in &mut room.exits {
            if egress.label.trim().is_empty() {
                egress.label = format!("__AUTO_EGRESS_{next_egress}__");
                next_egress += 1;
            }
        }
        for detail in &mut room.details {
            if detail.label.trim().is_empty() {
                detail.label = format!("__AUTO_DETAIL_{next_detail}__");
                next_detail += 1;
            }
        }
    }
}

/// The effective label of a dialog step: the declared one, or its
/// 0-based position when none was declared.
#[must_use]
pub fn dialog_step_label(step: &RawDialogStep, index: usize) -> Label {
    if step.label.trim().is_empty() {
        Label::new(index.to_string())
    } else {
        Label::new(&step.label)
    }
}

/// Read-only registries of every declared symbol, one per class.
#[derive(Debug, Default)]
pub struct SymbolTable {
    rooms: BTreeSet<Label>,
    egresses: BTreeSet<Label>,
    details: BTreeSet<Label>,
    items: BTreeSet<Label>,
    npcs: BTreeSet<Label>,
    pronouns: BTreeSet<String>,
    flags: BTreeSet<Label>,
    entity_aliases: BTreeMap<Alias, String>,
}

impl SymbolTable {
    /// Scans a merged definition, registering every symbol and failing on
    /// the first grammar violation or collision.
    pub fn scan(raw: &RawWorldData) -> Result<Self> {
        let mut table = Self {
            pronouns: driftwood_world::PronounSet::built_ins()
                .into_keys()
                .collect(),
            ..Self::default()
        };
        table.scan_rooms(raw)?;
        table.scan_items(raw)?;
        table.scan_pronouns(raw)?;
        table.scan_npcs(raw)?;
        table.scan_flags(raw)?;
        table.scan_room_alias_scopes(raw)?;
        table.scan_dialog_labels(raw)?;
        Ok(table)
    }

    // ===== Queries =====

    /// Whether a room with this label was declared.
    #[must_use]
    pub fn has_room(&self, label: &Label) -> bool {
        self.rooms.contains(label)
    }

    /// Whether an item with this label was declared.
    #[must_use]
    pub fn has_item(&self, label: &Label) -> bool {
        self.items.contains(label)
    }

    /// Whether an NPC with this label was declared.
    #[must_use]
    pub fn has_npc(&self, label: &Label) -> bool {
        self.npcs.contains(label)
    }

    /// Whether a pronoun set with this key exists, built-ins included.
    #[must_use]
    pub fn has_pronouns(&self, key: &str) -> bool {
        self.pronouns.contains(&key.to_uppercase())
    }

    /// Whether a flag with this label was declared.
    #[must_use]
    pub fn has_flag(&self, label: &Label) -> bool {
        self.flags.contains(label)
    }

    /// Whether any entity (room, egress, detail, item, or NPC) carries
    /// this label. Used to resolve concrete use-action with-terms.
    #[must_use]
    pub fn has_entity(&self, label: &Label) -> bool {
        self.items.contains(label)
            || self.npcs.contains(label)
            || self.rooms.contains(label)
            || self.egresses.contains(label)
            || self.details.contains(label)
    }

    // ===== Scan passes =====

    fn declare(set: &mut BTreeSet<Label>, class: SymbolClass, label: &Label, prior: &str) -> Result<()> {
        label.check()?;
        if !set.insert(label.clone()) {
            return Err(Error::duplicate_symbol(class, label.as_str(), prior));
        }
        Ok(())
    }

    fn scan_rooms(&mut self, raw: &RawWorldData) -> Result<()> {
        for room in &raw.rooms {
            let room_label = Label::new(&room.label);
            Self::declare(&mut self.rooms, SymbolClass::Room, &room_label, "a room")
                .map_err(|e| e.in_segment(format!("room {:?}", room.label)))?;
            for (i, egress) in room.exits.iter().enumerate() {
                Self::declare(
                    &mut self.egresses,
                    SymbolClass::Egress,
                    &Label::new(&egress.label),
                    "an exit",
                )
                .map_err(|e| {
                    e.in_segment(format!("exits[{i}]"))
                        .in_segment(format!("room {:?}", room.label))
                })?;
            }
            for (i, detail) in room.details.iter().enumerate() {
                Self::declare(
                    &mut self.details,
                    SymbolClass::Detail,
                    &Label::new(&detail.label),
                    "a detail",
                )
                .map_err(|e| {
                    e.in_segment(format!("details[{i}]"))
                        .in_segment(format!("room {:?}", room.label))
                })?;
            }
        }
        Ok(())
    }

    fn declare_entity_alias(&mut self, alias: &Alias, owner: String) -> Result<()> {
        alias.check()?;
        if let Some(prior) = self.entity_aliases.get(alias) {
            return Err(Error::alias_conflict(alias.as_str(), prior.clone()));
        }
        self.entity_aliases.insert(alias.clone(), owner);
        Ok(())
    }

    fn scan_items(&mut self, raw: &RawWorldData) -> Result<()> {
        for item in &raw.items {
            let label = Label::new(&item.label);
            Self::declare(&mut self.items, SymbolClass::Item, &label, "an item")
                .map_err(|e| e.in_segment(format!("item {:?}", item.label)))?;
            for alias in &item.aliases {
                self.declare_entity_alias(
                    &Alias::new(alias),
                    format!("item {}", label),
                )
                .map_err(|e| {
                    e.in_segment(format!("alias {alias:?}"))
                        .in_segment(format!("item {:?}", item.label))
                })?;
            }
        }
        Ok(())
    }

    fn scan_pronouns(&mut self, raw: &RawWorldData) -> Result<()> {
        for set in &raw.pronouns {
            let label = Label::new(&set.label);
            label
                .check()
                .map_err(|e| e.in_segment(format!("pronouns {:?}", set.label)))?;
            if !self.pronouns.insert(label.as_str().to_string()) {
                return Err(Error::duplicate_symbol(
                    SymbolClass::Pronoun,
                    label.as_str(),
                    "pronouns",
                )
                .in_segment(format!("pronouns {:?}", set.label)));
            }
        }
        Ok(())
    }

    fn scan_npcs(&mut self, raw: &RawWorldData) -> Result<()> {
        for npc in &raw.npcs {
            let label = Label::new(&npc.label);
            Self::declare(&mut self.npcs, SymbolClass::Npc, &label, "an NPC")
                .map_err(|e| e.in_segment(format!("npc {:?}", npc.label)))?;
            for alias in &npc.aliases {
                self.declare_entity_alias(
                    &Alias::new(alias),
                    format!("npc {}", label),
                )
                .map_err(|e| {
                    e.in_segment(format!("alias {alias:?}"))
                        .in_segment(format!("npc {:?}", npc.label))
                })?;
            }
        }
        Ok(())
    }

    fn scan_flags(&mut self, raw: &RawWorldData) -> Result<()> {
        for flag in &raw.flags {
            Self::declare(
                &mut self.flags,
                SymbolClass::Flag,
                &Label::new(&flag.label),
                "a flag",
            )
            .map_err(|e| e.in_segment(format!("flag {:?}", flag.label)))?;
        }
        Ok(())
    }

    // One combined per-room scope holds both egress and detail aliases,
    // so the collision check is symmetric between the two classes.
    fn scan_room_alias_scopes(&self, raw: &RawWorldData) -> Result<()> {
        for room in &raw.rooms {
            let mut room_scope: BTreeMap<Alias, String> = BTreeMap::new();
            let egress_aliases = room
                .exits
                .iter()
                .enumerate()
                .flat_map(|(i, eg)| eg.aliases.iter().map(move |a| (i, "exits", a)));
            let detail_aliases = room
                .details
                .iter()
                .enumerate()
                .flat_map(|(i, det)| det.aliases.iter().map(move |a| (i, "details", a)));
            for (i, kind, alias_text) in egress_aliases.chain(detail_aliases) {
                let alias = Alias::new(alias_text);
                let checked = alias
                    .check()
                    .and_then(|()| {
                        if let Some(prior) = self.entity_aliases.get(&alias) {
                            return Err(Error::alias_conflict(alias.as_str(), prior.clone()));
                        }
                        if let Some(prior) = room_scope.get(&alias) {
                            return Err(Error::alias_conflict(alias.as_str(), prior.clone()));
                        }
                        Ok(())
                    });
                checked.map_err(|e| {
                    e.in_segment(format!("alias {alias_text:?}"))
                        .in_segment(format!("{kind}[{i}]"))
                        .in_segment(format!("room {:?}", room.label))
                })?;
                room_scope.insert(alias, format!("another {kind} alias in this room"));
            }
        }
        Ok(())
    }

    fn scan_dialog_labels(&self, raw: &RawWorldData) -> Result<()> {
        for npc in &raw.npcs {
            let mut tree: BTreeSet<Label> = BTreeSet::new();
            for (i, step) in npc.dialogs.iter().enumerate() {
                let label = dialog_step_label(step, i);
                let declared = label
                    .check()
                    .and_then(|()| {
                        if !tree.insert(label.clone()) {
                            return Err(Error::duplicate_symbol(
                                SymbolClass::DialogStep,
                                label.as_str(),
                                "a step in this NPC's dialog tree",
                            ));
                        }
                        Ok(())
                    });
                declared.map_err(|e| {
                    e.in_segment(format!("dialogs[{i}]"))
                        .in_segment(format!("npc {:?}", npc.label))
                })?;
            }
        }
        Ok(())
    }
}
