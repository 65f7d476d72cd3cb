//! Shortest-path and adjacency queries over the room graph.
//!
//! Every egress is a directed edge of cost 1. The graph is assumed
//! immutable for a [`Pathfinder`]'s entire lifetime; there is no cache
//! invalidation, so construct a fresh instance if the graph changes.

use driftwood_world::Room;
use driftwood_foundation::Label;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// Memoizing path oracle over a borrowed room graph.
#[derive(Debug)]
pub struct Pathfinder<'w> {
    rooms: &'w BTreeMap<Label, Room>,
    memo: BTreeMap<(Label, Label), Option<Vec<Label>>>,
}

impl<'w> Pathfinder<'w> {
    /// Creates a pathfinder over the given room graph.
    #[must_use]
    pub fn new(rooms: &'w BTreeMap<Label, Room>) -> Self {
        Self {
            rooms,
            memo: BTreeMap::new(),
        }
    }

    /// True iff every consecutive pair in `sequence` is joined by a real
    /// egress edge in that direction. With `close_loop`, the edge from the
    /// last element back to the first is required too.
    #[must_use]
    pub fn validate_path(&self, sequence: &[Label], close_loop: bool) -> bool {
        for pair in sequence.windows(2) {
            if !self.has_edge(&pair[0], &pair[1]) {
                return false;
            }
        }
        if close_loop && sequence.len() >= 2 {
            let first = &sequence[0];
            let last = &sequence[sequence.len() - 1];
            if !self.has_edge(last, first) {
                return false;
            }
        }
        true
    }

    /// The rooms `sequence` fails to chain through, as the first bad pair,
    /// or `None` when the sequence validates. Companion to
    /// [`Pathfinder::validate_path`] for diagnostics.
    #[must_use]
    pub fn first_broken_edge(&self, sequence: &[Label], close_loop: bool) -> Option<(Label, Label)> {
        for pair in sequence.windows(2) {
            if !self.has_edge(&pair[0], &pair[1]) {
                return Some((pair[0].clone(), pair[1].clone()));
            }
        }
        if close_loop && sequence.len() >= 2 {
            let first = &sequence[0];
            let last = &sequence[sequence.len() - 1];
            if !self.has_edge(last, first) {
                return Some((last.clone(), first.clone()));
            }
        }
        None
    }

    /// The shortest room sequence from `start` to `end` inclusive, or
    /// `None` when no path exists. `start == end` is deliberately "no
    /// path"; callers only ever need non-trivial reachability.
    ///
    /// Memoized per ordered (start, end) pair for the lifetime of this
    /// instance.
    pub fn shortest_path(&mut self, start: &Label, end: &Label) -> Option<Vec<Label>> {
        let key = (start.clone(), end.clone());
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }
        let found = self.dijkstra(start, end);
        self.memo.insert(key, found.clone());
        found
    }

    /// Whether `end` is reachable from `start` over at least one edge.
    pub fn path_exists(&mut self, start: &Label, end: &Label) -> bool {
        self.shortest_path(start, end).is_some()
    }

    fn has_edge(&self, from: &Label, to: &Label) -> bool {
        self.rooms
            .get(from)
            .is_some_and(|room| room.exits.iter().any(|eg| eg.dest == *to))
    }

    fn dijkstra(&self, start: &Label, end: &Label) -> Option<Vec<Label>> {
        if start == end || !self.rooms.contains_key(start) {
            return None;
        }
        let mut dist: BTreeMap<Label, u32> = BTreeMap::new();
        let mut prev: BTreeMap<Label, Label> = BTreeMap::new();
        let mut heap: BinaryHeap<Reverse<(u32, Label)>> = BinaryHeap::new();
        dist.insert(start.clone(), 0);
        heap.push(Reverse((0, start.clone())));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == *end {
                return Some(Self::reconstruct(&prev, start, end));
            }
            if dist.get(&node).is_some_and(|best| *best < cost) {
                continue;
            }
            let Some(room) = self.rooms.get(&node) else {
                continue;
            };
            for next in room.one_hop_destinations() {
                let next_cost = cost + 1;
                if dist.get(&next).is_none_or(|best| next_cost < *best) {
                    dist.insert(next.clone(), next_cost);
                    prev.insert(next.clone(), node.clone());
                    heap.push(Reverse((next_cost, next)));
                }
            }
        }
        None
    }

    fn reconstruct(prev: &BTreeMap<Label, Label>, start: &Label, end: &Label) -> Vec<Label> {
        let mut path = vec![end.clone()];
        let mut node = end;
        while node != start {
            let Some(back) = prev.get(node) else {
                break;
            };
            path.push(back.clone());
            node = back;
        }
        path.reverse();
        path
    }
}
