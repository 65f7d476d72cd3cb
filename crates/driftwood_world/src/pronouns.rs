//! Pronoun sets for referring to NPCs in generated phrases.

use std::collections::BTreeMap;
use std::fmt;

/// Five grammatical-case strings plus a plural-conjugation flag. All
/// upper-case by convention, like the rest of the world's text symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PronounSet {
    /// "SHE WENT TO THE STORE."
    pub nominative: String,
    /// "YOU TALK TO HER."
    pub objective: String,
    /// "THAT ITEM IS HERS."
    pub possessive: String,
    /// "THAT IS HER ITEM."
    pub determiner: String,
    /// "SHE THINKS ABOUT HERSELF."
    pub reflexive: String,
    /// Whether verbs conjugate plural ("THEY ARE" vs "SHE IS").
    pub plural: bool,
}

impl PronounSet {
    fn built_in(
        nominative: &str,
        objective: &str,
        possessive: &str,
        determiner: &str,
        reflexive: &str,
        plural: bool,
    ) -> Self {
        Self {
            nominative: nominative.to_string(),
            objective: objective.to_string(),
            possessive: possessive.to_string(),
            determiner: determiner.to_string(),
            reflexive: reflexive.to_string(),
            plural,
        }
    }

    /// The built-in "she/her" set.
    #[must_use]
    pub fn feminine() -> Self {
        Self::built_in("SHE", "HER", "HERS", "HER", "HERSELF", false)
    }

    /// The built-in "he/him" set.
    #[must_use]
    pub fn masculine() -> Self {
        Self::built_in("HE", "HIM", "HIS", "HIS", "HIMSELF", false)
    }

    /// The built-in "they/them" set.
    #[must_use]
    pub fn nonbinary() -> Self {
        Self::built_in("THEY", "THEM", "THEIRS", "THEIR", "THEMSELF", true)
    }

    /// The built-in "it/its" set.
    #[must_use]
    pub fn it_its() -> Self {
        Self::built_in("IT", "IT", "ITS", "ITS", "ITSELF", false)
    }

    /// The four sets every world starts with, keyed the way world files
    /// reference them. The keys are not labels (they contain `/`), which
    /// is why the pronoun registry is keyed by plain strings.
    #[must_use]
    pub fn built_ins() -> BTreeMap<String, Self> {
        BTreeMap::from([
            ("SHE/HER".to_string(), Self::feminine()),
            ("HE/HIM".to_string(), Self::masculine()),
            ("THEY/THEM".to_string(), Self::nonbinary()),
            ("IT/ITS".to_string(), Self::it_its()),
        ])
    }

    /// Fills any blank case of this set from the they/them defaults, the
    /// file-format convention for sparse custom sets.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        let the_default = Self::nonbinary();
        if self.nominative.is_empty() {
            self.nominative = the_default.nominative;
        }
        if self.objective.is_empty() {
            self.objective = the_default.objective;
        }
        if self.possessive.is_empty() {
            self.possessive = the_default.possessive;
        }
        if self.determiner.is_empty() {
            self.determiner = the_default.determiner;
        }
        if self.reflexive.is_empty() {
            self.reflexive = the_default.reflexive;
        }
        self
    }

    /// Short display form, nominative/objective, used in info listings.
    #[must_use]
    pub fn short(&self) -> String {
        let nominative = if self.nominative.is_empty() {
            "<?>"
        } else {
            &self.nominative
        };
        let objective = if self.objective.is_empty() {
            nominative
        } else {
            &self.objective
        };
        format!("{nominative}/{objective}")
    }
}

impl fmt::Display for PronounSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conjugation = if self.plural { "PLURAL" } else { "SINGULAR" };
        write!(
            f,
            "PronounSet<{}/{}/{}/{}/{}/{conjugation}>",
            self.nominative, self.objective, self.possessive, self.determiner, self.reflexive
        )
    }
}
