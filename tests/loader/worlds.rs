//! Integration tests for full world loading
//!
//! End-to-end: files on disk through resolution, symbol scan, and
//! validation into a built world.

use driftwood_foundation::{ErrorKind, Label, NoScript};
use driftwood_loader::load_world;
use driftwood_world::{ItemLocation, Route};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

fn scratch() -> PathBuf {
    let n = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("driftwood-worlds-{}-{n}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const ROOMS: &str = r#"format = "DRIFTWOOD"
type = "DATA"

[world]
start = "GATE"

[[room]]
label = "GATE"
name = "The Gate"
description = "A weathered gate."

[[room.exit]]
dest = "YARD"
description = "the yard"
message = "You step through."
aliases = ["YARD", "NORTH"]

[[room.detail]]
aliases = ["HINGES"]
description = "Rusted through."

[[room]]
label = "YARD"
name = "The Yard"
description = "Overgrown grass."

[[room.exit]]
dest = "GATE"
description = "the gate"
message = "You walk back."
aliases = ["GATE", "SOUTH"]
"#;

const CAST: &str = r#"format = "DRIFTWOOD"
type = "DATA"

[[item]]
label = "LANTERN"
name = "brass lantern"
description = "Dented but bright."
aliases = ["LANTERN", "LAMP"]
start = "@INVEN"

[[npc]]
label = "GROUNDSKEEPER"
name = "the groundskeeper"
aliases = ["GROUNDSKEEPER", "KEEPER"]
pronouns = "HE/HIM"
description = "Raking leaves."
start = "YARD"

[npc.movement]
action = "PATROL"
path = ["GATE", "YARD"]

[[npc.line]]
action = "LINE"
content = "Mind the hinges."

[[flag]]
label = "GATE_OILED"
default = false
"#;

fn manifest(files: &[&str]) -> String {
    let list: Vec<String> = files.iter().map(|f| format!("{f:?}")).collect();
    format!(
        "format = \"DRIFTWOOD\"\ntype = \"MANIFEST\"\nfiles = [{}]\n",
        list.join(", ")
    )
}

#[test]
fn a_manifest_world_loads_whole() {
    let dir = scratch();
    write(&dir, "rooms.tqd", ROOMS);
    write(&dir, "cast.tqd", CAST);
    let root = write(&dir, "world.tqm", &manifest(&["rooms.tqd", "cast.tqd"]));

    let mut host = NoScript::new();
    let world = load_world(&root, &mut host).unwrap();

    assert_eq!(world.start, Label::new("GATE"));
    assert_eq!(world.rooms.len(), 2);
    assert_eq!(
        world.item_location(&Label::new("LANTERN")),
        Some(&ItemLocation::Inventory)
    );
    assert_eq!(
        world.npc_location(&Label::new("GROUNDSKEEPER")),
        Some(&Label::new("YARD"))
    );
    let keeper = world.npc(&Label::new("GROUNDSKEEPER")).unwrap();
    assert!(matches!(keeper.route, Route::Patrol { .. }));
    assert_eq!(keeper.pronouns.nominative, "HE");
    assert_eq!(world.flags.get(&Label::new("GATE_OILED")).unwrap(), "false");
}

#[test]
fn a_data_file_alone_is_a_valid_entry_point() {
    let dir = scratch();
    let root = write(&dir, "rooms.tqd", ROOMS);
    let mut host = NoScript::new();
    let world = load_world(&root, &mut host).unwrap();
    assert_eq!(world.rooms.len(), 2);
}

#[test]
fn a_dangling_reference_in_any_file_fails_the_whole_load() {
    let dir = scratch();
    write(&dir, "rooms.tqd", ROOMS);
    write(
        &dir,
        "stray.tqd",
        "format = \"DRIFTWOOD\"\ntype = \"DATA\"\n\
         [[item]]\nlabel = \"KEY\"\nname = \"key\"\ndescription = \"small\"\nstart = \"TOWER\"\n",
    );
    let root = write(&dir, "world.tqm", &manifest(&["rooms.tqd", "stray.tqd"]));

    let mut host = NoScript::new();
    let err = load_world(&root, &mut host).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownReference { .. }));
    assert!(err.to_string().contains("TOWER"));
}

#[test]
fn duplicate_labels_across_files_collide() {
    let dir = scratch();
    write(&dir, "rooms.tqd", ROOMS);
    write(
        &dir,
        "again.tqd",
        "format = \"DRIFTWOOD\"\ntype = \"DATA\"\n\
         [[room]]\nlabel = \"GATE\"\nname = \"Another Gate\"\ndescription = \"no\"\n",
    );
    let root = write(&dir, "world.tqm", &manifest(&["rooms.tqd", "again.tqd"]));

    let mut host = NoScript::new();
    let err = load_world(&root, &mut host).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateSymbol { .. }));
}

#[test]
fn shared_aliases_between_items_and_npcs_collide() {
    let dir = scratch();
    write(&dir, "rooms.tqd", ROOMS);
    write(
        &dir,
        "cast.tqd",
        r#"format = "DRIFTWOOD"
type = "DATA"

[[item]]
label = "STATUE"
name = "statue"
description = "stone"
aliases = ["KEEPER"]
start = "GATE"

[[npc]]
label = "GROUNDSKEEPER"
name = "the groundskeeper"
aliases = ["KEEPER"]
pronouns = "HE/HIM"
start = "YARD"

[npc.movement]
action = "STATIC"
"#,
    );
    let root = write(&dir, "world.tqm", &manifest(&["rooms.tqd", "cast.tqd"]));

    let mut host = NoScript::new();
    let err = load_world(&root, &mut host).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AliasConflict { .. }));
}

#[test]
fn patrol_routes_are_checked_against_the_final_graph() {
    let dir = scratch();
    write(&dir, "rooms.tqd", ROOMS);
    write(
        &dir,
        "cast.tqd",
        r#"format = "DRIFTWOOD"
type = "DATA"

[[room]]
label = "ISLAND"
name = "Island"
description = "No way on or off."

[[npc]]
label = "GHOST"
name = "a ghost"
pronouns = "THEY/THEM"
start = "GATE"

[npc.movement]
action = "PATROL"
path = ["ISLAND", "GATE"]
"#,
    );
    let root = write(&dir, "world.tqm", &manifest(&["rooms.tqd", "cast.tqd"]));

    let mut host = NoScript::new();
    let err = load_world(&root, &mut host).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unreachable { .. }));
}
