//! A whole session over a small estate world: loading from a manifest,
//! walking, taking, using, talking, and letting NPCs take their turns.

use driftwood_engine::UseOutcome;
use driftwood_foundation::{Label, NoScript};
use driftwood_runtime::{MoveOutcome, Session};
use driftwood_world::DialogKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

fn scratch() -> PathBuf {
    let n = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("driftwood-play-{}-{n}", std::process::id()));
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
start = "PORCH"

[[room]]
label = "PORCH"
name = "The Porch"
description = "Boards creak underfoot."

[[room.exit]]
dest = "PARLOR"
description = "the front door"
message = "You step inside."
aliases = ["DOOR", "INSIDE"]

[[room]]
label = "PARLOR"
name = "The Parlor"
description = "Dust sheets over old chairs."

[[room.exit]]
dest = "PORCH"
description = "the way out"
message = "You step back out."
aliases = ["OUT"]

[[room.detail]]
aliases = ["SHEETS"]
description = "Mildew and memories."
"#;

const CAST: &str = r#"format = "DRIFTWOOD"
type = "DATA"

[[item]]
label = "MATCHES"
name = "box of matches"
description = "Nearly full."
aliases = ["MATCHES"]
start = "@INVEN"

[[item.use]]
with = ["@FLAMMABLE"]
do = ["light_target()"]

[[item]]
label = "CANDLE"
name = "tallow candle"
description = "Unlit."
aliases = ["CANDLE"]
tags = ["@FLAMMABLE"]
start = "PARLOR"

[[npc]]
label = "AUNT_MAE"
name = "Aunt Mae"
aliases = ["MAE", "AUNT"]
pronouns = "SHE/HER"
description = "Rocking slowly."
start = "PARLOR"

[npc.movement]
action = "PATROL"
path = ["PORCH", "PARLOR"]

[[npc.line]]
action = "LINE"
content = "You came back."

[[npc.line]]
action = "PAUSE"

[[npc.line]]
action = "LINE"
content = "Fetch my candle, would you?"
"#;

fn estate() -> PathBuf {
    let dir = scratch();
    write(&dir, "rooms.tqd", ROOMS);
    write(&dir, "cast.tqd", CAST);
    write(
        &dir,
        "estate.tqm",
        "format = \"DRIFTWOOD\"\ntype = \"MANIFEST\"\nfiles = [\"rooms.tqd\", \"cast.tqd\"]\n",
    )
}

#[test]
fn walking_follows_exit_aliases() {
    let mut session = Session::load(estate(), NoScript::new(), 3).unwrap();
    assert_eq!(session.player_room(), &Label::new("PORCH"));

    let outcome = session.move_player("door").unwrap();
    assert!(matches!(outcome, MoveOutcome::Moved { dest, .. } if dest == Label::new("PARLOR")));
    assert_eq!(session.player_room(), &Label::new("PARLOR"));
    assert!(session.move_player("attic").is_err());
}

#[test]
fn taking_then_using_fires_the_tag_matched_action() {
    let mut session = Session::load(estate(), NoScript::new(), 3).unwrap();
    session.move_player("inside").unwrap();
    session.take("candle").unwrap();
    assert!(session.world().inventory.contains_key("CANDLE"));

    let outcome = session.use_targets(&["matches", "candle"]).unwrap();
    assert!(matches!(
        outcome,
        UseOutcome::Fired { item, action_index: 0, .. } if item == Label::new("MATCHES")
    ));
}

#[test]
fn using_unrelated_things_does_nothing() {
    let mut session = Session::load(estate(), NoScript::new(), 3).unwrap();
    session.move_player("inside").unwrap();
    let outcome = session.use_targets(&["matches", "sheets"]).unwrap();
    assert_eq!(outcome, UseOutcome::NothingHappens { multi_target: true });
}

#[test]
fn conversations_pause_and_pick_back_up() {
    let mut session = Session::load(estate(), NoScript::new(), 3).unwrap();
    session.move_player("inside").unwrap();

    let first = session.talk_to("mae").unwrap().unwrap();
    assert!(matches!(first.kind, DialogKind::Line { .. }));
    let paused = session.talk_to("mae").unwrap().unwrap();
    assert!(matches!(paused.kind, DialogKind::Pause { .. }));
    let resumed = session.talk_to("aunt").unwrap().unwrap();
    assert!(
        matches!(&resumed.kind, DialogKind::Line { content, .. } if content.contains("candle"))
    );
    // Off the end of the tree the conversation is over.
    assert!(session.talk_to("mae").unwrap().is_none());
}

#[test]
fn npcs_patrol_while_the_player_acts() {
    let mut session = Session::load(estate(), NoScript::new(), 3).unwrap();
    // Session construction reset the patrol, so Mae walks on turn one.
    let report = session.advance_turn().unwrap();
    assert!(report.did_move(&Label::new("AUNT_MAE")));
    assert_eq!(
        session.world().npc_location(&Label::new("AUNT_MAE")),
        Some(&Label::new("PORCH"))
    );
    session.advance_turn().unwrap();
    assert_eq!(
        session.world().npc_location(&Label::new("AUNT_MAE")),
        Some(&Label::new("PARLOR"))
    );
}

#[test]
fn the_player_can_ask_for_a_route() {
    let session = Session::load(estate(), NoScript::new(), 3).unwrap();
    let path = session.path_to(&Label::new("PARLOR")).unwrap();
    assert_eq!(path, vec![Label::new("PORCH"), Label::new("PARLOR")]);
    assert_eq!(session.path_to(&Label::new("PORCH")), None);
}
