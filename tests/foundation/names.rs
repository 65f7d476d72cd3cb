//! Integration tests for the naming grammars
//!
//! Labels, aliases, tags, and with-terms, including the reserved-word
//! and reserved-tag rules shared by every entity class.

use driftwood_foundation::{Alias, Label, Tag, WithTerm, find_reserved_word};

// ===== Labels =====

#[test]
fn labels_normalize_to_upper_case() {
    let label = Label::new("  cellar_door ");
    assert_eq!(label.as_str(), "CELLAR_DOOR");
    assert!(label.check().is_ok());
}

#[test]
fn labels_reject_spaces_and_punctuation() {
    assert!(Label::new("TWO WORDS").check().is_err());
    assert!(Label::new("BAD-DASH").check().is_err());
    assert!(Label::new("").check().is_err());
}

#[test]
fn labels_reject_reserved_command_words() {
    // Reserved words are whole-word matches, so they only bite in names
    // that also contain spaces; the word alone is the minimal case.
    assert!(Label::new("WITH").check().is_err());
    assert!(Label::new("WITHERED").check().is_ok());
}

// ===== Aliases =====

#[test]
fn aliases_allow_interior_spaces_only() {
    assert!(Alias::new("RUSTY LANTERN").check().is_ok());
    assert!(Alias::new(" RUSTY").check().is_err());
    assert!(Alias::new("RUSTY ").check().is_err());
}

#[test]
fn aliases_reject_reserved_words_anywhere() {
    assert!(Alias::new("GO THROUGH DOOR").check().is_err());
    assert!(Alias::new("throughway").check().is_ok());
}

#[test]
fn aliases_cannot_shadow_reserved_tags() {
    assert!(Alias::new("@INVEN").check().is_err());
}

#[test]
fn reserved_word_scan_is_case_insensitive() {
    assert_eq!(find_reserved_word("walk to town"), Some("TO"));
    assert_eq!(find_reserved_word("tower"), None);
}

// ===== Tags =====

#[test]
fn tags_store_without_the_sigil() {
    let tag = Tag::new("@Flammable");
    assert_eq!(tag.as_str(), "FLAMMABLE");
    assert_eq!(tag.to_string(), "@FLAMMABLE");
}

#[test]
fn declared_tags_cannot_be_reserved() {
    let implicit = Tag::new("@ITEM");
    assert!(Tag::new("@FLAMMABLE").check(&implicit).is_ok());
    assert!(Tag::new("@ITEM").check(&implicit).is_err());
    assert!(Tag::new("@SELF").check(&implicit).is_err());
    assert!(Tag::new("@").check(&implicit).is_err());
}

// ===== With-Terms =====

#[test]
fn with_terms_split_on_the_sigil() {
    assert_eq!(
        WithTerm::parse("torch"),
        WithTerm::Label(Label::new("TORCH"))
    );
    assert_eq!(
        WithTerm::parse("@flammable"),
        WithTerm::Tag(Tag::new("FLAMMABLE"))
    );
    assert!(WithTerm::parse("TORCH").is_concrete());
    assert!(!WithTerm::parse("@WOOD").is_concrete());
}
