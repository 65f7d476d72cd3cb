//! Per-turn NPC movement.
//!
//! Driven once per game turn. Each NPC's guard is evaluated first; a
//! false guard skips the NPC entirely, which for patrollers means the
//! cursor stays frozen. Once an NPC is selected its patrol cursor always
//! advances, even when the proposed room is where it already stands.

use driftwood_foundation::{Label, Result, ScriptContext, ScriptHost};
use driftwood_world::{Route, RouteCursor, World};
use rand::Rng;

/// What one movement turn did, for logs and tests.
#[derive(Debug, Clone, Default)]
pub struct TurnReport {
    /// NPCs that changed room: (npc, from, to).
    pub moved: Vec<(Label, Label, Label)>,
    /// NPCs that stayed put, whatever the reason.
    pub stayed: Vec<Label>,
}

impl TurnReport {
    /// Whether the given NPC moved this turn.
    #[must_use]
    pub fn did_move(&self, npc: &Label) -> bool {
        self.moved.iter().any(|(label, _, _)| label == npc)
    }
}

/// Advances every NPC one turn, in sorted label order so a seeded random
/// source yields reproducible runs.
pub fn advance_npcs<R: Rng>(
    world: &mut World,
    host: &mut dyn ScriptHost,
    rng: &mut R,
) -> Result<TurnReport> {
    let mut report = TurnReport::default();
    for label in world.npc_labels() {
        let Some(npc) = world.npc(&label) else {
            continue;
        };
        let guard = npc.guard.clone();
        let route = npc.route.clone();
        let cursor = npc.cursor;
        let Some(current) = world.npc_location(&label).cloned() else {
            continue;
        };

        let ctx = ScriptContext::acting_as(label.clone());
        if !guard.is_active(host, &ctx) {
            report.stayed.push(label);
            continue;
        }

        let proposed = match &route {
            Route::Static => None,
            Route::Patrol {
                path,
            } => step_patrol(world, &label, path, cursor),
            Route::Wander {
                allowed,
                forbidden,
            } => step_wander(world, &current, allowed, forbidden, rng),
        };

        match proposed {
            Some(dest) if dest != current => {
                world.move_npc(&label, &dest)?;
                report.moved.push((label, current, dest));
            }
            _ => report.stayed.push(label),
        }
    }
    Ok(report)
}

// Advances the cursor and proposes the room at the new position. A cursor
// that was never reset proposes nothing and stays unset.
fn step_patrol(
    world: &mut World,
    label: &Label,
    path: &[Label],
    cursor: RouteCursor,
) -> Option<Label> {
    let index = cursor.next_index(path.len())?;
    if let Some(npc) = world.npc_mut(label) {
        npc.cursor = RouteCursor::At(index);
    }
    path.get(index).cloned()
}

// One-hop neighbors, restricted to the allowed set when one is given,
// with forbidden rooms removed last so forbidden always wins.
fn step_wander<R: Rng>(
    world: &World,
    current: &Label,
    allowed: &[Label],
    forbidden: &[Label],
    rng: &mut R,
) -> Option<Label> {
    let room = world.room(current)?;
    let mut candidates: Vec<Label> = room
        .one_hop_destinations()
        .into_iter()
        .filter(|dest| allowed.is_empty() || allowed.contains(dest))
        .filter(|dest| !forbidden.contains(dest))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let pick = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(pick))
}
