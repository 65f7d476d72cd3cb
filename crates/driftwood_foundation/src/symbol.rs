//! Typed identifiers and their naming grammars.
//!
//! A [`Label`] is a machine identifier (`[A-Z0-9_]+`, upper-cased). An
//! [`Alias`] is a player-facing phrase (labels plus interior spaces). A
//! [`Tag`] is a non-unique grouping marker written with a leading `@` on
//! disk. A [`WithTerm`] is one entry of a use-action requirement list and
//! is either a concrete label or a tag reference.
//!
//! All constructors normalize to upper case; grammar checks are separate
//! so the loader can report precise violations.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{Error, Result};

/// Command words that no label or alias may contain as a whole word, since
/// the command tokenizer claims them.
pub const RESERVED_WORDS: &[&str] = &[
    "TO", "THROUGH", "INTO", "FROM", "ON", "IN", "WITH", "AT",
];

/// Tags that the engine assigns meaning to; world definitions may not
/// declare them. Entity classes carry their class tag implicitly.
pub const RESERVED_TAGS: &[&str] = &[
    "@STEP", "@INVEN", "@PLAYER", "@NPC", "@DETAIL", "@ITEM", "@EXIT", "@SELF",
];

fn is_label_char(ch: char) -> bool {
    ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_'
}

/// Returns the first reserved command word appearing as a whole word in
/// `name`, if any. The check is case-insensitive.
#[must_use]
pub fn find_reserved_word(name: &str) -> Option<&'static str> {
    let upper = name.to_uppercase();
    upper
        .split_whitespace()
        .find_map(|word| RESERVED_WORDS.iter().find(|rw| **rw == word).copied())
}

/// A unique, upper-case-normalized machine identifier for a world entity.
/// The default is the empty label, standing in for "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(String);

impl Label {
    /// Creates a label, normalizing to upper case. The grammar is not
    /// checked here; use [`Label::check`] where violations must surface.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the label is empty (an absent optional label).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the label grammar and reserved-word rules, returning a
    /// naming-rule error on violation.
    pub fn check(&self) -> Result<()> {
        if let Some(word) = find_reserved_word(&self.0) {
            return Err(Error::bad_name(
                &self.0,
                format!("labels cannot contain reserved word {word:?}"),
            ));
        }
        if self.0.is_empty() {
            return Err(Error::bad_name(&self.0, "labels cannot be blank"));
        }
        if let Some(bad) = self.0.chars().find(|ch| !is_label_char(*ch)) {
            if bad == ' ' {
                return Err(Error::bad_name(&self.0, "labels cannot contain spaces"));
            }
            return Err(Error::bad_name(
                &self.0,
                format!("labels cannot contain the character {bad:?}"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Label {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

/// A player-facing phrase used to refer to an entity in commands.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias(String);

impl Alias {
    /// Creates an alias, normalizing to upper case. The grammar is not
    /// checked here; use [`Alias::check`] where violations must surface.
    #[must_use]
    pub fn new(phrase: impl AsRef<str>) -> Self {
        Self(phrase.as_ref().to_uppercase())
    }

    /// Returns the alias text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the alias grammar and reserved-word rules: label characters
    /// with interior spaces allowed, no leading or trailing space, no
    /// reserved command word, and not a reserved tag name.
    pub fn check(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::bad_name(&self.0, "aliases cannot be blank"));
        }
        if let Some(word) = find_reserved_word(&self.0) {
            return Err(Error::bad_name(
                &self.0,
                format!("aliases cannot contain reserved word {word:?}"),
            ));
        }
        if RESERVED_TAGS.contains(&self.0.as_str()) {
            return Err(Error::bad_name(
                &self.0,
                "aliases cannot equal a reserved tag",
            ));
        }
        if self.0.starts_with(' ') {
            return Err(Error::bad_name(&self.0, "aliases cannot start with a space"));
        }
        if self.0.ends_with(' ') {
            return Err(Error::bad_name(&self.0, "aliases cannot end with a space"));
        }
        if let Some(bad) = self.0.chars().find(|ch| !is_label_char(*ch) && *ch != ' ') {
            return Err(Error::bad_name(
                &self.0,
                format!("aliases cannot contain the character {bad:?}"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Alias {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Alias {
    fn from(phrase: &str) -> Self {
        Self::new(phrase)
    }
}

impl From<&String> for Alias {
    fn from(phrase: &String) -> Self {
        Self::new(phrase)
    }
}

/// A non-unique marker grouping entities, stored without its `@` sigil.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag from a name with or without the leading `@`,
    /// normalizing to upper case.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        let name = name.strip_prefix('@').unwrap_or(name);
        Self(name.to_uppercase())
    }

    /// Returns the tag name without the sigil.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the tag grammar: label characters only, non-blank, and not a
    /// reserved tag. `implicit` names the class tag the owning entity
    /// already carries, for a friendlier message when it is re-declared.
    pub fn check(&self, implicit: &Tag) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::bad_name(
                "@",
                "tags cannot be blank (or only the tag sign)",
            ));
        }
        if let Some(bad) = self.0.chars().find(|ch| !is_label_char(*ch)) {
            return Err(Error::bad_name(
                format!("@{}", self.0),
                format!("tags cannot contain the character {bad:?}"),
            ));
        }
        let sigiled = format!("@{}", self.0);
        if RESERVED_TAGS.contains(&sigiled.as_str()) {
            let detail = if self == implicit {
                format!("{sigiled} is pre-defined and applies automatically; do not list it")
            } else {
                format!("{sigiled} is pre-defined; use a different tag")
            };
            return Err(Error::bad_name(sigiled, detail));
        }
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Tag {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

/// One entry of a use-action requirement list: either a concrete entity
/// label or a `@`-prefixed tag reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithTerm {
    /// Matches only the entity with exactly this label.
    Label(Label),
    /// Matches any entity carrying this tag.
    Tag(Tag),
}

impl WithTerm {
    /// Parses a with-term from its on-disk form, distinguishing tags by
    /// their leading sigil.
    #[must_use]
    pub fn parse(term: &str) -> Self {
        let term = term.trim();
        if term.starts_with('@') {
            Self::Tag(Tag::new(term))
        } else {
            Self::Label(Label::new(term))
        }
    }

    /// Returns true for the concrete-label form, which counts toward a
    /// match's specificity score.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Label(_))
    }
}

impl fmt::Display for WithTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => label.fmt(f),
            Self::Tag(tag) => tag.fmt(f),
        }
    }
}
