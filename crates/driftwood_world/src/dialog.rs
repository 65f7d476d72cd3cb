//! Dialog trees attached to NPCs and the runtime cursor that walks them.

use driftwood_foundation::Label;
use std::fmt;

// ===== Dialog Steps =====

/// One node of an NPC's dialog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogStep {
    /// Jump target for this step. Auto-assigned from the step's index
    /// when the world file leaves it blank.
    pub label: Label,
    /// What kind of step this is and its variant-specific content.
    pub kind: DialogKind,
}

/// The four step variants. Field rules differ per variant and are
/// enforced at world load, so runtime code can rely on them here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// The NPC speaks one line, then the conversation advances.
    Line {
        /// What the NPC says.
        content: String,
        /// Optional follow-on jump. `None` means fall through to the
        /// next step in declaration order.
        response: Option<Label>,
    },
    /// The player picks from two or more options, each with its own jump.
    Choice {
        /// Prompt shown before the options.
        content: String,
        /// Option text paired with its jump target. At least two.
        choices: Vec<(String, Label)>,
    },
    /// The conversation ends here.
    End,
    /// The conversation suspends, to be resumed later.
    Pause {
        /// Where to resume. `None` resumes at the step after the pause.
        resume: Option<Label>,
    },
}

impl DialogKind {
    /// Variant name as written in world files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "LINE",
            Self::Choice { .. } => "CHOICE",
            Self::End => "END",
            Self::Pause { .. } => "PAUSE",
        }
    }
}

impl fmt::Display for DialogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DialogStep<{} {}>", self.label, self.kind.name())
    }
}

// ===== Conversation Cursor =====

/// A live walk over one NPC's dialog. Holds a position, not the steps;
/// the tree itself stays on the NPC.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversation {
    position: usize,
    ended: bool,
}

impl Conversation {
    /// Starts a conversation at the first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the conversation has run off the end or hit an END step.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns the current step and advances. Walking past the last
    /// declared step behaves as an implicit END.
    pub fn next_step<'a>(&mut self, steps: &'a [DialogStep]) -> Option<&'a DialogStep> {
        if self.ended {
            return None;
        }
        let Some(step) = steps.get(self.position) else {
            self.ended = true;
            return None;
        };
        match &step.kind {
            DialogKind::End => {
                self.ended = true;
            }
            DialogKind::Line {
                response: Some(target),
                ..
            } => {
                self.jump_to(steps, target);
            }
            // The cursor stays on a pause so that resume() can read its
            // resume target, and on a choice until answer() is called.
            DialogKind::Pause { .. } | DialogKind::Choice { .. } => {}
            _ => {
                self.position += 1;
            }
        }
        Some(step)
    }

    /// Moves the cursor to the step with the given label. Unknown labels
    /// end the conversation, matching the walk-off-the-end behavior.
    pub fn jump_to(&mut self, steps: &[DialogStep], target: &Label) {
        match steps.iter().position(|step| step.label == *target) {
            Some(index) => {
                self.position = index;
                self.ended = false;
            }
            None => {
                self.ended = true;
            }
        }
    }

    /// Answers the choice step the cursor is waiting on, jumping to the
    /// picked option's target. Does nothing if the cursor is not on a
    /// choice step or the index is out of range.
    pub fn answer(&mut self, steps: &[DialogStep], choice: usize) {
        if let Some(DialogStep {
            kind: DialogKind::Choice { choices, .. },
            ..
        }) = steps.get(self.position)
        {
            if let Some((_, target)) = choices.get(choice) {
                let target = target.clone();
                self.jump_to(steps, &target);
            }
        }
    }

    /// Resumes after a pause step, honoring its resume label if any.
    pub fn resume(&mut self, steps: &[DialogStep]) {
        if let Some(DialogStep {
            kind: DialogKind::Pause {
                resume: Some(target),
            },
            ..
        }) = steps.get(self.position)
        {
            let target = target.clone();
            self.jump_to(steps, &target);
        } else {
            self.position += 1;
        }
    }
}
