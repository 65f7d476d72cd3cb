//! Integration tests for pathfinding
//!
//! Shortest paths over the directed room graph and the edge-adjacency
//! check patrol routes rely on.

use driftwood_engine::Pathfinder;
use driftwood_foundation::{Alias, Guard, Label, NoScript, ScriptHost, Text};
use driftwood_world::{Egress, Room, World};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn text(host: &mut NoScript, s: &str) -> Text {
    Text {
        source: s.to_string(),
        template: host.compile_template(s).unwrap(),
    }
}

fn world_with_edges(room_count: u8, edges: &[(u8, u8)]) -> World {
    let mut host = NoScript::new();
    let mut world = World::new(Label::new("R0"));
    for i in 0..room_count {
        world.insert_room(Room {
            label: Label::new(format!("R{i}")),
            name: format!("room {i}"),
            description: text(&mut host, "a room"),
            exits: Vec::new(),
            items: Vec::new(),
            details: Vec::new(),
            npcs: BTreeMap::new(),
        });
    }
    for (from, to) in edges {
        let egress = Egress {
            label: Label::new(format!("E_{from}_{to}")),
            dest: Label::new(format!("R{to}")),
            description: text(&mut host, "a way"),
            travel_message: text(&mut host, "you go"),
            aliases: vec![Alias::new(format!("WAY{to}"))],
            tags: Vec::new(),
            guard: Guard::always(),
        };
        world
            .rooms
            .get_mut(&Label::new(format!("R{from}")))
            .unwrap()
            .exits
            .push(egress);
    }
    world
}

fn label(i: u8) -> Label {
    Label::new(format!("R{i}"))
}

#[test]
fn a_room_has_no_path_to_itself() {
    let world = world_with_edges(2, &[(0, 1), (1, 0)]);
    let mut pathfinder = Pathfinder::new(&world.rooms);
    assert_eq!(pathfinder.shortest_path(&label(0), &label(0)), None);
}

#[test]
fn shortest_path_prefers_fewer_hops() {
    // 0 -> 3 directly and via 1 -> 2.
    let world = world_with_edges(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
    let mut pathfinder = Pathfinder::new(&world.rooms);
    let path = pathfinder.shortest_path(&label(0), &label(3)).unwrap();
    assert_eq!(path, vec![label(0), label(3)]);
}

#[test]
fn edges_are_directed() {
    let world = world_with_edges(2, &[(0, 1)]);
    let mut pathfinder = Pathfinder::new(&world.rooms);
    assert!(pathfinder.shortest_path(&label(0), &label(1)).is_some());
    assert!(pathfinder.shortest_path(&label(1), &label(0)).is_none());
}

#[test]
fn validate_path_checks_each_consecutive_pair() {
    let world = world_with_edges(3, &[(0, 1), (1, 2)]);
    let pathfinder = Pathfinder::new(&world.rooms);
    assert!(pathfinder.validate_path(&[label(0), label(1), label(2)], false));
    // No 0 -> 2 edge, so skipping a hop is not a valid path.
    assert!(!pathfinder.validate_path(&[label(0), label(2)], false));
}

#[test]
fn closing_the_loop_demands_a_return_edge() {
    let world = world_with_edges(3, &[(0, 1), (1, 2)]);
    let pathfinder = Pathfinder::new(&world.rooms);
    assert!(!pathfinder.validate_path(&[label(0), label(1), label(2)], true));

    let looped = world_with_edges(3, &[(0, 1), (1, 2), (2, 0)]);
    let pathfinder = Pathfinder::new(&looped.rooms);
    assert!(pathfinder.validate_path(&[label(0), label(1), label(2)], true));
}

proptest! {
    // Any path the finder returns must walk real edges from start to end.
    #[test]
    fn found_paths_are_walkable(
        edges in proptest::collection::vec((0u8..6, 0u8..6), 0..24),
        start in 0u8..6,
        end in 0u8..6,
    ) {
        let world = world_with_edges(6, &edges);
        let mut pathfinder = Pathfinder::new(&world.rooms);
        if let Some(path) = pathfinder.shortest_path(&label(start), &label(end)) {
            prop_assert!(path.len() >= 2);
            prop_assert_eq!(path.first(), Some(&label(start)));
            prop_assert_eq!(path.last(), Some(&label(end)));
            prop_assert!(pathfinder.validate_path(&path, false));
        }
    }
}
