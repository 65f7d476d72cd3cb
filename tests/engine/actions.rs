//! Integration tests for use-action resolution
//!
//! Candidate matching, specificity precedence, and the post-selection
//! guard check.

use driftwood_engine::{UseOutcome, UseTarget, resolve_use, select_action};
use driftwood_foundation::{
    Guard, Label, NoScript, Result, ScriptContext, ScriptHost, ScriptRef, Tag, TemplateRef, Text,
    WithTerm,
};
use driftwood_world::{Item, ItemLocation, UseAction};

fn text(host: &mut dyn ScriptHost, s: &str) -> Text {
    Text {
        source: s.to_string(),
        template: host.compile_template(s).unwrap(),
    }
}

fn item(host: &mut dyn ScriptHost, label: &str, tags: &[&str], on_use: Vec<UseAction>) -> Item {
    Item {
        label: Label::new(label),
        name: label.to_lowercase(),
        description: text(host, "a thing"),
        aliases: Vec::new(),
        tags: tags.iter().map(|t| Tag::new(*t)).collect(),
        guard: Guard::always(),
        on_use,
        home: ItemLocation::Inventory,
    }
}

fn action(with: &[&str]) -> UseAction {
    UseAction {
        with: with.iter().map(|t| WithTerm::parse(t)).collect(),
        guard: Guard::always(),
        effect: Vec::new(),
    }
}

#[test]
fn tag_terms_match_any_carrier() {
    let mut host = NoScript::new();
    let torch = item(&mut host, "TORCH", &[], vec![action(&["@FLAMMABLE"])]);
    let rag = item(&mut host, "RAG", &["@FLAMMABLE"], Vec::new());
    let stone = item(&mut host, "STONE", &[], Vec::new());

    let lit = select_action(&[UseTarget::Item(&torch), UseTarget::Item(&rag)]);
    assert!(lit.is_some());
    let dud = select_action(&[UseTarget::Item(&torch), UseTarget::Item(&stone)]);
    assert!(dud.is_none());
}

#[test]
fn class_tags_are_implicit() {
    let mut host = NoScript::new();
    let wand = item(&mut host, "WAND", &[], vec![action(&["@ITEM"])]);
    let rock = item(&mut host, "ROCK", &[], Vec::new());
    let found = select_action(&[UseTarget::Item(&wand), UseTarget::Item(&rock)]).unwrap();
    assert_eq!(found.item.label, Label::new("WAND"));
}

#[test]
fn an_empty_with_list_only_fires_alone() {
    let mut host = NoScript::new();
    let bell = item(&mut host, "BELL", &[], vec![action(&[])]);
    let rock = item(&mut host, "ROCK", &[], Vec::new());

    assert!(select_action(&[UseTarget::Item(&bell)]).is_some());
    assert!(select_action(&[UseTarget::Item(&bell), UseTarget::Item(&rock)]).is_none());
}

#[test]
fn concrete_terms_beat_tag_terms() {
    let mut host = NoScript::new();
    // Declared tag-first so precedence, not declaration order, must pick.
    let torch = item(
        &mut host,
        "TORCH",
        &[],
        vec![action(&["@FLAMMABLE"]), action(&["OILY_RAG"])],
    );
    let rag = item(&mut host, "OILY_RAG", &["@FLAMMABLE"], Vec::new());

    let found = select_action(&[UseTarget::Item(&torch), UseTarget::Item(&rag)]).unwrap();
    assert_eq!(found.action_index, 1);
}

#[test]
fn ties_keep_the_first_declared_candidate() {
    let mut host = NoScript::new();
    let torch = item(
        &mut host,
        "TORCH",
        &[],
        vec![action(&["@FLAMMABLE"]), action(&["@BURNABLE"])],
    );
    let rag = item(&mut host, "RAG", &["@FLAMMABLE", "@BURNABLE"], Vec::new());

    let found = select_action(&[UseTarget::Item(&torch), UseTarget::Item(&rag)]).unwrap();
    assert_eq!(found.action_index, 0);
}

#[test]
fn the_primary_target_outranks_more_specific_others() {
    let mut host = NoScript::new();
    let torch = item(&mut host, "TORCH", &[], vec![action(&["@FLAMMABLE"])]);
    let rag = item(
        &mut host,
        "RAG",
        &["@FLAMMABLE"],
        vec![action(&["TORCH"])],
    );

    // TORCH named first: its tag-term action wins despite RAG's concrete
    // term, because primary placement is ranked above specificity.
    let found = select_action(&[UseTarget::Item(&torch), UseTarget::Item(&rag)]).unwrap();
    assert_eq!(found.item.label, Label::new("TORCH"));
}

/// Host that compiles guards normally but evaluates them all false.
struct ClosedHost {
    next: u32,
}

impl ScriptHost for ClosedHost {
    fn compile_guard(&mut self, _source: &str) -> Result<ScriptRef> {
        self.next += 1;
        Ok(ScriptRef(self.next))
    }

    fn compile_effect(&mut self, _source: &str) -> Result<ScriptRef> {
        self.next += 1;
        Ok(ScriptRef(self.next))
    }

    fn compile_template(&mut self, _source: &str) -> Result<TemplateRef> {
        Ok(TemplateRef(0))
    }

    fn eval_guard(&mut self, _guard: ScriptRef, _ctx: &ScriptContext) -> bool {
        false
    }

    fn run_effect(&mut self, _effect: ScriptRef, _ctx: &ScriptContext, _emit: &mut dyn FnMut(&str)) {}

    fn expand(&mut self, _template: TemplateRef, _ctx: &ScriptContext) -> String {
        String::new()
    }
}

#[test]
fn an_inactive_winner_means_nothing_happens() {
    let mut host = ClosedHost { next: 0 };
    // The guarded action is more specific and wins selection; the
    // unguarded runner-up must NOT fire in its stead.
    let guarded = UseAction {
        with: vec![WithTerm::parse("RAG")],
        guard: Guard::compile("door_is_open()", &mut host).unwrap(),
        effect: Vec::new(),
    };
    let fallback = action(&["@FLAMMABLE"]);
    let torch = item(&mut host, "TORCH", &[], vec![guarded, fallback]);
    let rag = item(&mut host, "RAG", &["@FLAMMABLE"], Vec::new());

    let targets = [UseTarget::Item(&torch), UseTarget::Item(&rag)];
    let outcome = resolve_use(&targets, &mut host);
    assert_eq!(outcome, UseOutcome::NothingHappens { multi_target: true });
}

#[test]
fn a_fired_action_reports_item_and_index() {
    let mut host = NoScript::new();
    let bell = item(&mut host, "BELL", &[], vec![action(&[])]);
    let targets = [UseTarget::Item(&bell)];
    let outcome = resolve_use(&targets, &mut host);
    assert_eq!(
        outcome,
        UseOutcome::Fired {
            item: Label::new("BELL"),
            action_index: 0,
            emitted: Vec::new(),
        }
    );
}
