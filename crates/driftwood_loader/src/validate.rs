//! Cross-reference validation and final world construction.
//!
//! Consumes a merged definition plus the symbol table and the pathfinder
//! and produces the immutable [`World`], or the first diagnostic found.
//! Any failure aborts construction entirely; a partially built world is
//! never exposed.

use crate::raw::{
    RawDetail, RawDialogStep, RawEgress, RawItem, RawNpc, RawPronounSet, RawRoom, RawRoute,
    RawUseAction, RawWorldData,
};
use crate::symbols::{self, SymbolTable, dialog_step_label};
use driftwood_engine::Pathfinder;
use driftwood_foundation::{
    Error, Guard, Label, Result, Script, ScriptHost, SymbolClass, Tag, Text, WithTerm,
};
use driftwood_world::{
    Detail, DialogKind, DialogStep, Egress, Item, ItemLocation, Npc, PronounSet, Room, Route,
    RouteCursor, UseAction, World,
};
use std::collections::BTreeMap;

/// Validates a merged definition and builds the world, compiling every
/// guard, effect, and description template through `host` along the way.
pub fn build_world(mut raw: RawWorldData, host: &mut dyn ScriptHost) -> Result<World> {
    symbols::assign_auto_labels(&mut raw);
    let table = SymbolTable::scan(&raw)?;

    if raw.world.start.trim().is_empty() {
        return Err(Error::missing_field("start").in_segment("world"));
    }
    let start = Label::new(&raw.world.start);
    if !table.has_room(&start) {
        return Err(Error::unknown_reference(SymbolClass::Room, start.as_str())
            .in_segment("start")
            .in_segment("world"));
    }
    let mut world = World::new(start);

    for raw_room in &raw.rooms {
        let room = build_room(raw_room, &table, host)
            .map_err(|e| e.in_segment(format!("room {:?}", raw_room.label)))?;
        world.insert_room(room);
    }

    for raw_item in &raw.items {
        let item = build_item(raw_item, &table, host)
            .map_err(|e| e.in_segment(format!("item {:?}", raw_item.label)))?;
        world.place_item(item)?;
    }

    for raw_set in &raw.pronouns {
        let key = Label::new(&raw_set.label).as_str().to_string();
        world
            .pronouns
            .insert(key, convert_pronouns(raw_set).with_defaults());
    }

    let mut npcs = Vec::with_capacity(raw.npcs.len());
    for raw_npc in &raw.npcs {
        let npc = build_npc(raw_npc, &table, &world.pronouns, host)
            .map_err(|e| e.in_segment(format!("npc {:?}", raw_npc.label)))?;
        npcs.push(npc);
    }
    {
        // The room graph is complete at this point; route reachability is
        // the one check that needs it.
        let mut pathfinder = Pathfinder::new(&world.rooms);
        for npc in &npcs {
            validate_route(npc, &mut pathfinder).map_err(|e| {
                e.in_segment("movement")
                    .in_segment(format!("npc {:?}", npc.label.as_str()))
            })?;
        }
    }
    for npc in npcs {
        world.place_npc(npc)?;
    }

    for raw_flag in &raw.flags {
        let value = flag_default(raw_flag.default.as_ref())
            .map_err(|e| e.in_segment(format!("flag {:?}", raw_flag.label)))?;
        world.flags.insert(Label::new(&raw_flag.label), value);
    }

    Ok(world)
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(value)
}

fn check_tags(tags: &[String], implicit: &Tag) -> Result<Vec<Tag>> {
    let mut out = Vec::with_capacity(tags.len());
    for (i, raw_tag) in tags.iter().enumerate() {
        let tag = Tag::new(raw_tag);
        tag.check(implicit)
            .map_err(|e| e.in_segment(format!("tags[{i}]")))?;
        out.push(tag);
    }
    Ok(out)
}

fn compile_guard(source: &str, host: &mut dyn ScriptHost) -> Result<Guard> {
    Guard::compile(source, host).map_err(|e| e.in_segment("if"))
}

// ===== Rooms =====

fn build_room(raw: &RawRoom, table: &SymbolTable, host: &mut dyn ScriptHost) -> Result<Room> {
    require(&raw.name, "name")?;
    require(&raw.description, "description")?;

    let mut exits = Vec::with_capacity(raw.exits.len());
    for (i, raw_egress) in raw.exits.iter().enumerate() {
        let egress = build_egress(raw_egress, table, host)
            .map_err(|e| e.in_segment(format!("exits[{i}]")))?;
        exits.push(egress);
    }
    let mut details = Vec::with_capacity(raw.details.len());
    for (i, raw_detail) in raw.details.iter().enumerate() {
        let detail = build_detail(raw_detail, host)
            .map_err(|e| e.in_segment(format!("details[{i}]")))?;
        details.push(detail);
    }

    Ok(Room {
        label: Label::new(&raw.label),
        name: raw.name.clone(),
        description: Text::compile(&raw.description, host)?,
        exits,
        items: Vec::new(),
        details,
        npcs: BTreeMap::new(),
    })
}

fn build_egress(raw: &RawEgress, table: &SymbolTable, host: &mut dyn ScriptHost) -> Result<Egress> {
    require(&raw.dest, "dest")?;
    require(&raw.description, "description")?;
    require(&raw.message, "message")?;

    let dest = Label::new(&raw.dest);
    if !table.has_room(&dest) {
        return Err(
            Error::unknown_reference(SymbolClass::Room, dest.as_str()).in_segment("dest"),
        );
    }
    Ok(Egress {
        label: Label::new(&raw.label),
        dest,
        description: Text::compile(&raw.description, host)?,
        travel_message: Text::compile(&raw.message, host)?,
        aliases: raw.aliases.iter().map(Into::into).collect(),
        tags: check_tags(&raw.tags, &Tag::new("@EXIT"))?,
        guard: compile_guard(&raw.guard, host)?,
    })
}

fn build_detail(raw: &RawDetail, host: &mut dyn ScriptHost) -> Result<Detail> {
    require(&raw.description, "description")?;
    if raw.aliases.is_empty() {
        return Err(Error::definition(
            "must have a list of at least one alias in 'aliases' field",
        ));
    }
    Ok(Detail {
        label: Label::new(&raw.label),
        aliases: raw.aliases.iter().map(Into::into).collect(),
        description: Text::compile(&raw.description, host)?,
        tags: check_tags(&raw.tags, &Tag::new("@DETAIL"))?,
        guard: compile_guard(&raw.guard, host)?,
    })
}

// ===== Items =====

fn build_item(raw: &RawItem, table: &SymbolTable, host: &mut dyn ScriptHost) -> Result<Item> {
    require(&raw.name, "name")?;
    require(&raw.description, "description")?;
    require(&raw.start, "start")?;

    let home = ItemLocation::parse(&raw.start);
    if let ItemLocation::Room(room) = &home {
        if !table.has_room(room) {
            return Err(
                Error::unknown_reference(SymbolClass::Room, room.as_str()).in_segment("start"),
            );
        }
    }

    let mut on_use = Vec::with_capacity(raw.on_use.len());
    for (i, raw_action) in raw.on_use.iter().enumerate() {
        let action = build_use_action(raw_action, table, host)
            .map_err(|e| e.in_segment(format!("use[{i}]")))?;
        on_use.push(action);
    }

    Ok(Item {
        label: Label::new(&raw.label),
        name: raw.name.clone(),
        description: Text::compile(&raw.description, host)?,
        aliases: raw.aliases.iter().map(Into::into).collect(),
        tags: check_tags(&raw.tags, &Tag::new("@ITEM"))?,
        guard: compile_guard(&raw.guard, host)?,
        on_use,
        home,
    })
}

fn build_use_action(
    raw: &RawUseAction,
    table: &SymbolTable,
    host: &mut dyn ScriptHost,
) -> Result<UseAction> {
    let mut with = Vec::with_capacity(raw.with.len());
    for (i, term_text) in raw.with.iter().enumerate() {
        if term_text.trim().is_empty() {
            return Err(Error::missing_field("with").in_segment(format!("with[{i}]")));
        }
        let term = WithTerm::parse(term_text);
        // Concrete terms must name something declared somewhere in the
        // world; tag terms are free-form and may reference reserved class
        // tags like @ITEM, so only their character set is checked.
        match &term {
            WithTerm::Label(label) => {
                label
                    .check()
                    .map_err(|e| e.in_segment(format!("with[{i}]")))?;
                if !table.has_entity(label) {
                    return Err(Error::unknown_reference(SymbolClass::Item, label.as_str())
                        .in_segment(format!("with[{i}]")));
                }
            }
            WithTerm::Tag(tag) => {
                if tag.as_str().is_empty()
                    || tag.as_str().contains(|ch: char| {
                        !ch.is_ascii_uppercase() && !ch.is_ascii_digit() && ch != '_'
                    })
                {
                    return Err(Error::bad_name(
                        format!("@{}", tag.as_str()),
                        "tag references may only contain A-Z, 0-9, and \"_\"",
                    )
                    .in_segment(format!("with[{i}]")));
                }
            }
        }
        with.push(term);
    }

    let mut effect = Vec::with_capacity(raw.effect.len());
    for (i, statement) in raw.effect.iter().enumerate() {
        let compiled = Script::compile(statement.as_str(), host)
            .map_err(|e| e.in_segment(format!("do[{i}]")))?;
        effect.push(compiled);
    }

    Ok(UseAction {
        with,
        guard: compile_guard(&raw.guard, host)?,
        effect,
    })
}

// ===== Pronouns =====

fn convert_pronouns(raw: &RawPronounSet) -> PronounSet {
    PronounSet {
        nominative: raw.nominative.to_uppercase(),
        objective: raw.objective.to_uppercase(),
        possessive: raw.possessive.to_uppercase(),
        determiner: raw.determiner.to_uppercase(),
        reflexive: raw.reflexive.to_uppercase(),
        plural: raw.plural,
    }
}

// ===== NPCs =====

fn build_npc(
    raw: &RawNpc,
    table: &SymbolTable,
    pronoun_registry: &BTreeMap<String, PronounSet>,
    host: &mut dyn ScriptHost,
) -> Result<Npc> {
    require(&raw.name, "name")?;

    let start = Label::new(&raw.start);
    if !table.has_room(&start) {
        return Err(
            Error::unknown_reference(SymbolClass::Room, start.as_str()).in_segment("start"),
        );
    }

    let pronouns = resolve_pronouns(raw, pronoun_registry)?;
    let route = build_route(&raw.movement).map_err(|e| e.in_segment("movement"))?;
    if let Route::Wander { forbidden, .. } = &route {
        for (i, room) in forbidden.iter().enumerate() {
            if !table.has_room(room) {
                return Err(Error::unknown_reference(SymbolClass::Room, room.as_str())
                    .in_segment(format!("forbidden[{i}]"))
                    .in_segment("movement"));
            }
        }
    }
    let dialog = build_dialog(&raw.dialogs)?;

    Ok(Npc {
        label: Label::new(&raw.label),
        name: raw.name.clone(),
        aliases: raw.aliases.iter().map(Into::into).collect(),
        pronouns,
        description: Text::compile(&raw.description, host)?,
        start,
        route,
        cursor: RouteCursor::Unset,
        dialog,
        tags: check_tags(&raw.tags, &Tag::new("@NPC"))?,
        guard: compile_guard(&raw.guard, host)?,
    })
}

// A named reference and an inline set are mutually exclusive; one of the
// two is required.
fn resolve_pronouns(
    raw: &RawNpc,
    registry: &BTreeMap<String, PronounSet>,
) -> Result<PronounSet> {
    if !raw.pronouns.is_empty() {
        if raw.custom_pronoun_set.is_some() {
            return Err(Error::definition(
                "cannot have both 'pronouns' key and custom_pronoun_set defined for the npc",
            ));
        }
        let key = raw.pronouns.to_uppercase();
        return registry.get(&key).cloned().ok_or_else(|| {
            Error::unknown_reference(SymbolClass::Pronoun, key).in_segment("pronouns")
        });
    }
    let Some(inline) = &raw.custom_pronoun_set else {
        return Err(Error::definition(
            "must have non-blank 'pronouns' key or define custom_pronoun_set for the npc",
        ));
    };
    if !inline.label.is_empty() {
        return Err(
            Error::definition("custom pronoun set cannot have a 'label' key")
                .in_segment("custom_pronoun_set"),
        );
    }
    Ok(convert_pronouns(inline).with_defaults())
}

fn build_route(raw: &RawRoute) -> Result<Route> {
    let action = raw.action.to_uppercase();
    match action.as_str() {
        "STATIC" => {
            forbid_route_field(&action, "path", raw.path.is_empty())?;
            forbid_route_field(&action, "allowed", raw.allowed.is_empty())?;
            forbid_route_field(&action, "forbidden", raw.forbidden.is_empty())?;
            Ok(Route::Static)
        }
        "PATROL" => {
            if raw.path.len() < 2 {
                return Err(Error::definition(
                    "'PATROL' route type must have a list with at least 2 rooms as value of 'path' property",
                ));
            }
            forbid_route_field(&action, "allowed", raw.allowed.is_empty())?;
            forbid_route_field(&action, "forbidden", raw.forbidden.is_empty())?;
            Ok(Route::Patrol {
                path: raw.path.iter().map(Into::into).collect(),
            })
        }
        "WANDER" => {
            forbid_route_field(&action, "path", raw.path.is_empty())?;
            Ok(Route::Wander {
                allowed: raw.allowed.iter().map(Into::into).collect(),
                forbidden: raw.forbidden.iter().map(Into::into).collect(),
            })
        }
        other => Err(Error::definition(format!(
            "action: must be one of 'STATIC', 'PATROL', or 'WANDER', not {other:?}"
        ))),
    }
}

fn forbid_route_field(action: &str, field: &str, absent: bool) -> Result<()> {
    if absent {
        return Ok(());
    }
    Err(Error::definition(format!(
        "'{action}' route type does not use '{field}' property"
    )))
}

// Reachability checks that need the finished room graph. Patrol paths
// must chain edge by edge, approach from the start room included; wander
// allowed rooms need some path from the start, while forbidden rooms
// only need to exist (checked in build_npc) since an unreachable
// forbidden room already has the intended effect.
fn validate_route(npc: &Npc, pathfinder: &mut Pathfinder<'_>) -> Result<()> {
    match &npc.route {
        Route::Static => Ok(()),
        Route::Patrol { path } => {
            let approach = [npc.start.clone(), path[0].clone()];
            if let Some((_, to)) = pathfinder.first_broken_edge(&approach, false) {
                return Err(Error::unreachable(npc.label.as_str(), to.as_str()));
            }
            if let Some((_, to)) = pathfinder.first_broken_edge(path, true) {
                return Err(Error::unreachable(npc.label.as_str(), to.as_str()));
            }
            Ok(())
        }
        Route::Wander { allowed, forbidden: _ } => {
            for (i, room) in allowed.iter().enumerate() {
                if pathfinder.shortest_path(&npc.start, room).is_none() {
                    return Err(Error::unreachable(npc.label.as_str(), room.as_str())
                        .in_segment(format!("allowed[{i}]")));
                }
            }
            Ok(())
        }
    }
}

// ===== Dialog =====

fn build_dialog(steps: &[RawDialogStep]) -> Result<Vec<DialogStep>> {
    // Labels first so forward jumps resolve.
    let labels: Vec<Label> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| dialog_step_label(step, i))
        .collect();

    let mut out = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let built = build_dialog_step(step, &labels)
            .map_err(|e| e.in_segment(format!("dialogs[{i}]")))?;
        out.push(DialogStep {
            label: labels[i].clone(),
            kind: built,
        });
    }
    Ok(out)
}

fn build_dialog_step(step: &RawDialogStep, tree: &[Label]) -> Result<DialogKind> {
    let action = step.action.to_uppercase();
    match action.as_str() {
        "LINE" => {
            forbid_step_field(&action, "choices", step.choices.is_empty())?;
            forbid_step_field(&action, "continue", step.resume.is_empty())?;
            require(&step.content, "content")?;
            // Responses are resolved at conversation time; an unknown
            // label simply ends the conversation there.
            let response = (!step.response.is_empty()).then(|| Label::new(&step.response));
            Ok(DialogKind::Line {
                content: step.content.clone(),
                response,
            })
        }
        "CHOICE" => {
            forbid_step_field(&action, "response", step.response.is_empty())?;
            forbid_step_field(&action, "continue", step.resume.is_empty())?;
            require(&step.content, "content")?;
            if step.choices.len() < 2 {
                return Err(Error::definition(
                    "'CHOICE' dialog step type must have a list with at least 2 choices as value of 'choices' property",
                ));
            }
            let mut choices = Vec::with_capacity(step.choices.len());
            for (i, pair) in step.choices.iter().enumerate() {
                let [prompt, target] = pair.as_slice() else {
                    return Err(Error::definition(
                        "must be a list containing what to say and label of step to jump to",
                    )
                    .in_segment(format!("choices[{i}]")));
                };
                if prompt.is_empty() {
                    return Err(Error::definition("first item (what to say) cannot be blank")
                        .in_segment(format!("choices[{i}]")));
                }
                let target = Label::new(target);
                if !tree.contains(&target) {
                    return Err(Error::unknown_reference(
                        SymbolClass::DialogStep,
                        target.as_str(),
                    )
                    .in_segment(format!("choices[{i}]")));
                }
                choices.push((prompt.clone(), target));
            }
            Ok(DialogKind::Choice {
                content: step.content.clone(),
                choices,
            })
        }
        "END" => {
            forbid_step_field(&action, "content", step.content.is_empty())?;
            forbid_step_field(&action, "response", step.response.is_empty())?;
            forbid_step_field(&action, "choices", step.choices.is_empty())?;
            forbid_step_field(&action, "continue", step.resume.is_empty())?;
            Ok(DialogKind::End)
        }
        "PAUSE" => {
            forbid_step_field(&action, "content", step.content.is_empty())?;
            forbid_step_field(&action, "response", step.response.is_empty())?;
            forbid_step_field(&action, "choices", step.choices.is_empty())?;
            let resume = if step.resume.is_empty() {
                None
            } else {
                let target = Label::new(&step.resume);
                if !tree.contains(&target) {
                    return Err(Error::unknown_reference(
                        SymbolClass::DialogStep,
                        target.as_str(),
                    )
                    .in_segment("continue"));
                }
                Some(target)
            };
            Ok(DialogKind::Pause {
                resume,
            })
        }
        other => Err(Error::definition(format!(
            "action: must be one of 'LINE', 'CHOICE', 'END', or 'PAUSE', not {other:?}"
        ))),
    }
}

fn forbid_step_field(action: &str, field: &str, absent: bool) -> Result<()> {
    if absent {
        return Ok(());
    }
    Err(Error::definition(format!(
        "'{action}' dialog step type does not use '{field}' key"
    )))
}

// ===== Flags =====

// Flag defaults may be any TOML scalar; they are carried as strings
// since the engine treats flag values as opaque.
fn flag_default(value: Option<&toml::Value>) -> Result<String> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(n) => Ok(n.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(dt) => Ok(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(Error::definition(
            "'default' must be a scalar value",
        )
        .in_segment("default")),
    }
}
