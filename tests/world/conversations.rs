//! Integration tests for dialog trees and pronoun sets

use driftwood_foundation::Label;
use driftwood_world::{Conversation, DialogKind, DialogStep, PronounSet};

fn line(label: &str, content: &str, response: Option<&str>) -> DialogStep {
    DialogStep {
        label: Label::new(label),
        kind: DialogKind::Line {
            content: content.to_string(),
            response: response.map(Label::new),
        },
    }
}

#[test]
fn a_full_conversation_walks_lines_choices_and_pauses() {
    let steps = vec![
        line("HELLO", "Well met.", None),
        DialogStep {
            label: Label::new("ASK"),
            kind: DialogKind::Choice {
                content: "Need anything?".to_string(),
                choices: vec![
                    ("a key".to_string(), Label::new("KEY")),
                    ("nothing".to_string(), Label::new("FAREWELL")),
                ],
            },
        },
        line("KEY", "Take this.", Some("FAREWELL")),
        line("UNUSED", "never shown", None),
        DialogStep {
            label: Label::new("FAREWELL"),
            kind: DialogKind::End,
        },
    ];

    let mut conversation = Conversation::new();
    assert_eq!(
        conversation.next_step(&steps).unwrap().label,
        Label::new("HELLO")
    );
    assert_eq!(
        conversation.next_step(&steps).unwrap().label,
        Label::new("ASK")
    );
    conversation.answer(&steps, 0);
    // The answered line's response jumps straight to the farewell.
    assert_eq!(
        conversation.next_step(&steps).unwrap().label,
        Label::new("KEY")
    );
    assert_eq!(
        conversation.next_step(&steps).unwrap().label,
        Label::new("FAREWELL")
    );
    assert!(conversation.is_ended());
}

#[test]
fn jump_to_an_unknown_label_ends_the_conversation() {
    let steps = vec![line("ONLY", "hi", Some("NOWHERE"))];
    let mut conversation = Conversation::new();
    conversation.next_step(&steps);
    assert!(conversation.is_ended());
    assert!(conversation.next_step(&steps).is_none());
}

#[test]
fn pause_without_target_resumes_at_the_next_step() {
    let steps = vec![
        DialogStep {
            label: Label::new("0"),
            kind: DialogKind::Pause { resume: None },
        },
        line("1", "back again", None),
    ];
    let mut conversation = Conversation::new();
    conversation.next_step(&steps);
    conversation.resume(&steps);
    assert_eq!(conversation.next_step(&steps).unwrap().label, Label::new("1"));
}

#[test]
fn blank_pronoun_fields_fill_from_the_neutral_set() {
    let custom = PronounSet {
        nominative: "XE".to_string(),
        ..PronounSet::default()
    }
    .with_defaults();
    assert_eq!(custom.nominative, "XE");
    assert_eq!(custom.objective, "THEM");
    assert_eq!(custom.reflexive, "THEMSELF");
}

#[test]
fn built_in_sets_cover_the_four_registry_keys() {
    let builtins = PronounSet::built_ins();
    for key in ["SHE/HER", "HE/HIM", "THEY/THEM", "IT/ITS"] {
        assert!(builtins.contains_key(key), "missing {key}");
    }
}
