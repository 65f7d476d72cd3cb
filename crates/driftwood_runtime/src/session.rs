//! A single play session: the player's position, NPC turn-taking, and
//! per-NPC conversation state over one loaded world.

use driftwood_engine::{Pathfinder, TurnReport, UseOutcome, UseTarget, advance_npcs, resolve_use};
use driftwood_foundation::{
    Alias, Error, Label, Result, ScriptContext, ScriptHost, SymbolClass,
};
use driftwood_world::{Conversation, DialogKind, DialogStep, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::path::Path;

/// What happened when the player tried to leave through an exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player moved; the travel message has been expanded.
    Moved {
        /// The room the player now stands in.
        dest: Label,
        /// The exit's travel message, templates expanded.
        message: String,
    },
    /// The exit's guard is currently inactive. Recoverable; the player
    /// stays put.
    Blocked,
}

/// One play-through of a world.
///
/// Randomness is seeded once at construction so that a given world and
/// seed replay identically.
pub struct Session<H> {
    world: World,
    host: H,
    rng: ChaCha8Rng,
    player_room: Label,
    conversations: BTreeMap<Label, Conversation>,
}

impl<H: ScriptHost> Session<H> {
    /// Starts a session over an already-built world. Patrol cursors are
    /// reset so every patrolling NPC starts its route from the top.
    pub fn new(world: World, host: H, seed: u64) -> Self {
        let mut world = world;
        for label in world.npc_labels() {
            if let Some(npc) = world.npc_mut(&label) {
                npc.reset_route();
            }
        }
        let player_room = world.start.clone();
        Self {
            world,
            host,
            rng: ChaCha8Rng::seed_from_u64(seed),
            player_room,
            conversations: BTreeMap::new(),
        }
    }

    /// Loads the world at `path` and starts a session over it.
    pub fn load(path: impl AsRef<Path>, mut host: H, seed: u64) -> Result<Self> {
        let world = driftwood_loader::load_world(path, &mut host)?;
        Ok(Self::new(world, host, seed))
    }

    /// The loaded world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The script host, for inspection or state injection.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The room the player currently stands in.
    #[must_use]
    pub fn player_room(&self) -> &Label {
        &self.player_room
    }

    /// The player's room description, templates expanded.
    pub fn describe_room(&mut self) -> String {
        let ctx = ScriptContext::anonymous();
        match self.world.room(&self.player_room) {
            Some(room) => room.description.expand(&mut self.host, &ctx),
            None => String::new(),
        }
    }

    // ===== Movement =====

    /// Moves the player through the exit known by `direction` in the
    /// current room. Fails on an unknown exit name; an inactive guard is
    /// not a failure, just a [`MoveOutcome::Blocked`].
    pub fn move_player(&mut self, direction: &str) -> Result<MoveOutcome> {
        let alias = Alias::new(direction);
        let Some(room) = self.world.room(&self.player_room) else {
            return Err(Error::unknown_reference(
                SymbolClass::Room,
                self.player_room.as_str(),
            ));
        };
        let Some(egress) = room.egress_by_alias(&alias) else {
            return Err(Error::unknown_reference(SymbolClass::Egress, alias.as_str()));
        };
        let ctx = ScriptContext::anonymous();
        if !egress.guard.is_active(&mut self.host, &ctx) {
            return Ok(MoveOutcome::Blocked);
        }
        let dest = egress.dest.clone();
        let message = egress.travel_message.expand(&mut self.host, &ctx);
        self.player_room = dest.clone();
        Ok(MoveOutcome::Moved { dest, message })
    }

    /// Advances every NPC one turn, in label order.
    pub fn advance_turn(&mut self) -> Result<TurnReport> {
        advance_npcs(&mut self.world, &mut self.host, &mut self.rng)
    }

    /// Shortest room path from the player to `dest`, if one exists.
    #[must_use]
    pub fn path_to(&self, dest: &Label) -> Option<Vec<Label>> {
        let mut pathfinder = Pathfinder::new(&self.world.rooms);
        pathfinder.shortest_path(&self.player_room, dest)
    }

    // ===== Items =====

    /// Picks up the item known by `name` in the current room.
    pub fn take(&mut self, name: &str) -> Result<()> {
        let alias = Alias::new(name);
        let label = self
            .world
            .room(&self.player_room)
            .and_then(|room| room.item_by_alias(&alias))
            .map(|item| item.label.clone())
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Item, alias.as_str()))?;
        self.world.take_item(&label)
    }

    /// Drops the inventory item known by `name` in the current room.
    pub fn drop_item(&mut self, name: &str) -> Result<()> {
        let alias = Alias::new(name);
        let label = self
            .world
            .inventory
            .values()
            .find(|item| item.aliases.contains(&alias))
            .map(|item| item.label.clone())
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Item, alias.as_str()))?;
        let dest = self.player_room.clone();
        self.world.drop_item(&label, &dest)
    }

    /// Resolves "use A [with B, C]" for player-visible targets. The first
    /// name is the primary target; each name must match an item, NPC,
    /// detail, or exit in the player's room or an inventory item.
    pub fn use_targets(&mut self, names: &[&str]) -> Result<UseOutcome> {
        let mut targets = Vec::with_capacity(names.len());
        for name in names {
            targets.push(find_target(&self.world, &self.player_room, name)?);
        }
        Ok(resolve_use(&targets, &mut self.host))
    }

    // ===== Conversation =====

    /// Speaks to the NPC known by `name` in the current room, returning
    /// the next dialog step or `None` once the conversation has ended.
    /// Conversations persist per NPC, so a paused conversation picks up
    /// where it left off.
    pub fn talk_to(&mut self, name: &str) -> Result<Option<DialogStep>> {
        let alias = Alias::new(name);
        let npc = self
            .world
            .room(&self.player_room)
            .and_then(|room| room.npc_by_alias(&alias))
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Npc, alias.as_str()))?;
        let label = npc.label.clone();
        let conversation = self.conversations.entry(label.clone()).or_default();
        let Some(step) = conversation.next_step(&npc.dialog) else {
            self.conversations.remove(&label);
            return Ok(None);
        };
        let step = step.clone();
        // A pause hands the turn back to the player; the next talk picks
        // up at the pause's resume target.
        if matches!(step.kind, DialogKind::Pause { .. }) {
            conversation.resume(&npc.dialog);
        }
        Ok(Some(step))
    }

    /// Answers the pending choice step of a conversation with `name` by
    /// choice index, then returns the step jumped to.
    pub fn choose(&mut self, name: &str, choice: usize) -> Result<Option<DialogStep>> {
        let alias = Alias::new(name);
        let npc = self
            .world
            .room(&self.player_room)
            .and_then(|room| room.npc_by_alias(&alias))
            .ok_or_else(|| Error::unknown_reference(SymbolClass::Npc, alias.as_str()))?;
        let Some(conversation) = self.conversations.get_mut(&npc.label) else {
            return Ok(None);
        };
        conversation.answer(&npc.dialog, choice);
        let step = conversation.next_step(&npc.dialog).cloned();
        Ok(step)
    }
}

// Alias lookup scope for use-targets: the player's room first, then the
// inventory. The first name a player speaks is a use command's primary
// target, but scope does not depend on position.
fn find_target<'w>(world: &'w World, player_room: &Label, name: &str) -> Result<UseTarget<'w>> {
    let alias = Alias::new(name);
    if let Some(room) = world.room(player_room) {
        if let Some(item) = room.item_by_alias(&alias) {
            return Ok(UseTarget::Item(item));
        }
        if let Some(npc) = room.npc_by_alias(&alias) {
            return Ok(UseTarget::Npc(npc));
        }
        if let Some(detail) = room.detail_by_alias(&alias) {
            return Ok(UseTarget::Detail(detail));
        }
        if let Some(egress) = room.egress_by_alias(&alias) {
            return Ok(UseTarget::Egress(egress));
        }
    }
    if let Some(item) = world
        .inventory
        .values()
        .find(|item| item.aliases.contains(&alias))
    {
        return Ok(UseTarget::Item(item));
    }
    Err(Error::unknown_reference(SymbolClass::Item, alias.as_str()))
}
