//! Use-action resolution: "use X [with Y, Z]".
//!
//! Every item among the named targets contributes its declared actions as
//! candidates; a candidate matches when the *other* targets satisfy its
//! with-term list exactly, via order-sensitive backtracking. The winning
//! candidate's guard is only evaluated after selection, so an inactive
//! winner means nothing happens rather than a fallback to the runner-up.

use driftwood_foundation::{Label, ScriptContext, ScriptHost, Tag, WithTerm};
use driftwood_world::{Detail, Egress, Item, Npc, UseAction};

/// One player-named target, already resolved to a concrete entity.
#[derive(Debug, Clone, Copy)]
pub enum UseTarget<'w> {
    /// A usable item, wherever it sits.
    Item(&'w Item),
    /// An NPC in the player's presence.
    Npc(&'w Npc),
    /// A room detail.
    Detail(&'w Detail),
    /// A room exit.
    Egress(&'w Egress),
}

impl<'w> UseTarget<'w> {
    /// The target's label.
    #[must_use]
    pub fn label(&self) -> &Label {
        match self {
            Self::Item(item) => &item.label,
            Self::Npc(npc) => &npc.label,
            Self::Detail(detail) => &detail.label,
            Self::Egress(egress) => &egress.label,
        }
    }

    /// Whether the target carries the tag, implicit class tags included.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        match self {
            Self::Item(item) => item.has_tag(tag),
            Self::Npc(npc) => npc.has_tag(tag),
            Self::Detail(detail) => detail.has_tag(tag),
            Self::Egress(egress) => egress.has_tag(tag),
        }
    }

    // Borrows from the world, not from the target value itself, so a
    // match can outlive the slice it was selected from.
    fn as_item(&self) -> Option<&'w Item> {
        match *self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    fn satisfies(&self, term: &WithTerm) -> bool {
        match term {
            WithTerm::Label(label) => self.label() == label,
            WithTerm::Tag(tag) => self.has_tag(tag),
        }
    }
}

/// The selected action, before its guard has been consulted.
#[derive(Debug, Clone, Copy)]
pub struct UseMatch<'w> {
    /// The item owning the action.
    pub item: &'w Item,
    /// Index of the action in the item's declaration order.
    pub action_index: usize,
    /// The action itself.
    pub action: &'w UseAction,
}

/// The outcome of resolving a use command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOutcome {
    /// An action matched, its guard held, and its effects ran.
    Fired {
        /// The item whose action fired.
        item: Label,
        /// Index of the fired action in its item's declaration order.
        action_index: usize,
        /// Text the effects emitted, in execution order.
        emitted: Vec<String>,
    },
    /// Nothing matched, or the winner's guard was false. Recoverable:
    /// the world is unchanged and play continues.
    NothingHappens {
        /// Whether the player named more than one target, for phrasing.
        multi_target: bool,
    },
}

/// Picks the single applicable action for the named targets, or `None`.
///
/// Precedence: a candidate on the primary (first-named) target beats all
/// others; then the highest count of concrete with-terms; then the first
/// candidate in target order and, within one item, declaration order.
#[must_use]
pub fn select_action<'w>(targets: &[UseTarget<'w>]) -> Option<UseMatch<'w>> {
    let mut best: Option<(bool, usize, UseMatch<'w>)> = None;
    for (target_index, target) in targets.iter().enumerate() {
        let Some(item) = target.as_item() else {
            continue;
        };
        let others: Vec<&UseTarget<'w>> = targets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_index)
            .map(|(_, t)| t)
            .collect();
        for (action_index, action) in item.on_use.iter().enumerate() {
            if action.with.len() != others.len() {
                continue;
            }
            let mut claimed = vec![false; others.len()];
            if !match_terms(&action.with, &others, &mut claimed) {
                continue;
            }
            let is_primary = target_index == 0;
            let specificity = action.concrete_terms();
            let better = match &best {
                None => true,
                Some((best_primary, best_spec, _)) => {
                    (is_primary, specificity) > (*best_primary, *best_spec)
                }
            };
            if better {
                best = Some((
                    is_primary,
                    specificity,
                    UseMatch {
                        item,
                        action_index,
                        action,
                    },
                ));
            }
        }
    }
    best.map(|(_, _, found)| found)
}

/// Resolves a use command against the named targets, running the winning
/// action's effects through the host.
pub fn resolve_use(targets: &[UseTarget<'_>], host: &mut dyn ScriptHost) -> UseOutcome {
    let multi_target = targets.len() > 1;
    let Some(found) = select_action(targets) else {
        return UseOutcome::NothingHappens {
            multi_target,
        };
    };
    let ctx = ScriptContext::acting_as(found.item.label.clone());
    if !found.action.guard.is_active(host, &ctx) {
        return UseOutcome::NothingHappens {
            multi_target,
        };
    }
    let mut emitted = Vec::new();
    for effect in &found.action.effect {
        host.run_effect(effect.compiled, &ctx, &mut |line| {
            emitted.push(line.to_string());
        });
    }
    UseOutcome::Fired {
        item: found.item.label.clone(),
        action_index: found.action_index,
        emitted,
    }
}

// Backtracking assignment of terms to distinct targets. Tries the first
// unmatched term against each unclaimed target and recurses on the rest,
// pruning as soon as a term has no candidate left. Lengths are equal by
// the caller's check, so exhausting the terms exhausts the targets.
fn match_terms(terms: &[WithTerm], others: &[&UseTarget<'_>], claimed: &mut [bool]) -> bool {
    let Some((term, rest)) = terms.split_first() else {
        return true;
    };
    for (i, target) in others.iter().enumerate() {
        if claimed[i] || !target.satisfies(term) {
            continue;
        }
        claimed[i] = true;
        if match_terms(rest, others, claimed) {
            return true;
        }
        claimed[i] = false;
    }
    false
}
