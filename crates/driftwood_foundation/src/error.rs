//! Error types for the Driftwood system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Load-time errors (I/O, format, symbol, reference, reachability,
//! inclusion) are fatal and abort world construction atomically. Runtime
//! resolution failures are represented as ordinary values elsewhere, never
//! as this type.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Driftwood operations.
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where in the world definition the error
    /// occurred.
    pub context: Option<ErrorContext>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{ctx}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error, replacing any prior context.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Prepends a field-path segment to this error's context, creating the
    /// context if none exists yet.
    #[must_use]
    pub fn in_segment(mut self, segment: impl Into<String>) -> Self {
        let ctx = self.context.take().unwrap_or_default();
        self.context = Some(ctx.prepend(segment));
        self
    }

    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.into(),
            source,
        })
    }

    /// Creates a file-format error (bad or missing header tags).
    #[must_use]
    pub fn format(path: impl Into<PathBuf>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates a decode error for a file whose body could not be parsed.
    #[must_use]
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Creates a duplicate-symbol error.
    #[must_use]
    pub fn duplicate_symbol(class: SymbolClass, name: impl Into<String>, prior: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateSymbol {
            class,
            name: name.into(),
            prior: prior.into(),
        })
    }

    /// Creates a naming-rule violation error.
    #[must_use]
    pub fn bad_name(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadName {
            name: name.into(),
            detail: detail.into(),
        })
    }

    /// Creates an alias-conflict error.
    #[must_use]
    pub fn alias_conflict(alias: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::new(ErrorKind::AliasConflict {
            alias: alias.into(),
            scope: scope.into(),
        })
    }

    /// Creates an unknown-reference error.
    #[must_use]
    pub fn unknown_reference(class: SymbolClass, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownReference {
            class,
            name: name.into(),
        })
    }

    /// Creates a missing-field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::new(ErrorKind::MissingField { field })
    }

    /// Creates a definition-shape error (a field present that the
    /// definition kind does not use, a list too short, and so on).
    #[must_use]
    pub fn definition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Definition(message.into()))
    }

    /// Creates a reachability error for an NPC route.
    #[must_use]
    pub fn unreachable(npc: impl Into<String>, room: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unreachable {
            npc: npc.into(),
            room: room.into(),
        })
    }

    /// Creates a script compile error surfaced from the script host.
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Script(message.into()))
    }

    /// Returns true if this error is the resolver-internal circular-include
    /// marker, which callers skip rather than propagate.
    #[must_use]
    pub fn is_circular_include(&self) -> bool {
        matches!(self.kind, ErrorKind::CircularInclude { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A world file could not be read.
    #[error("{path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A file's header tags were missing or wrong.
    #[error("{path}: expected {expected}, found {found}")]
    Format {
        /// The offending path.
        path: PathBuf,
        /// What the header should have declared.
        expected: String,
        /// What the header actually declared.
        found: String,
    },

    /// A file's body could not be decoded.
    #[error("{path}: {message}")]
    Decode {
        /// The offending path.
        path: PathBuf,
        /// Decoder diagnostic.
        message: String,
    },

    /// A label was already used by another member of the same symbol class.
    #[error("{class} label {name:?} has already been used for {prior}")]
    DuplicateSymbol {
        /// The symbol class the collision happened in.
        class: SymbolClass,
        /// The colliding label.
        name: String,
        /// Description of the prior definition.
        prior: String,
    },

    /// A label or alias violates its naming grammar or reserved-word rules.
    #[error("{name:?}: {detail}")]
    BadName {
        /// The offending name.
        name: String,
        /// What rule it broke.
        detail: String,
    },

    /// An alias collides with another alias in its conflict scope.
    #[error("alias {alias:?} conflicts with {scope}")]
    AliasConflict {
        /// The offending alias.
        alias: String,
        /// Description of what it collided with.
        scope: String,
    },

    /// A reference names a symbol that does not exist in the expected class.
    #[error("no {class} with label {name:?} exists")]
    UnknownReference {
        /// The class the reference should have resolved in.
        class: SymbolClass,
        /// The dangling name.
        name: String,
    },

    /// A required field was blank or absent.
    #[error("must have non-blank {field:?} field")]
    MissingField {
        /// The field name as it appears on disk.
        field: &'static str,
    },

    /// A definition is shaped wrong for its declared kind.
    #[error("{0}")]
    Definition(String),

    /// A patrol/wander room is not reachable from the NPC's start.
    #[error("npc {npc:?}: room {room:?} is not reachable from start")]
    Unreachable {
        /// The NPC whose route failed validation.
        npc: String,
        /// The room the route cannot reach.
        room: String,
    },

    /// Manifest inclusion nested deeper than the fixed bound.
    #[error("{path}: too many manifests deep")]
    IncludeOverflow {
        /// The manifest that exceeded the bound.
        path: PathBuf,
    },

    /// The root manifest produced no usable definitions.
    #[error("{path}: does not list any valid files to include")]
    EmptyManifest {
        /// The root manifest path.
        path: PathBuf,
    },

    /// Two files in one inclusion tree both set the start room.
    #[error("{path}: duplicate start; start has already been defined as {existing:?}")]
    DuplicateStart {
        /// The file carrying the second start.
        path: PathBuf,
        /// The start room that was already set.
        existing: String,
    },

    /// Internal resolver marker for an include already on the in-progress
    /// stack. Never escapes the resolver; the including manifest skips the
    /// entry instead.
    #[error("{path}: manifest inclusion chain refers back to itself")]
    CircularInclude {
        /// The path that closed the cycle.
        path: PathBuf,
    },

    /// A guard, effect, or template failed to compile in the script host.
    #[error("script: {0}")]
    Script(String),
}

/// The symbol classes of a world definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Rooms, globally scoped.
    Room,
    /// Room exits; labels are world-scoped, aliases room-scoped.
    Egress,
    /// Room details; labels are world-scoped, aliases room-scoped.
    Detail,
    /// Items, globally scoped.
    Item,
    /// Non-player characters, globally scoped.
    Npc,
    /// Pronoun sets, globally scoped.
    Pronoun,
    /// Global flags.
    Flag,
    /// Dialog steps, scoped to one NPC's tree.
    DialogStep,
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Room => "room",
            Self::Egress => "exit",
            Self::Detail => "detail",
            Self::Item => "item",
            Self::Npc => "npc",
            Self::Pronoun => "pronoun set",
            Self::Flag => "flag",
            Self::DialogStep => "dialog step",
        };
        f.write_str(name)
    }
}

/// Context naming the world-definition location an error refers to, as a
/// sequence of field-path segments like `rooms[CAVE]` then `exits[2]`.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Field-path segments, outermost first.
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a context from a single segment.
    #[must_use]
    pub fn segment(segment: impl Into<String>) -> Self {
        Self {
            path: vec![segment.into()],
        }
    }

    /// Returns this context with a new outermost segment.
    #[must_use]
    pub fn prepend(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join(": "))
    }
}
