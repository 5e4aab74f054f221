//! Load errors and warnings.
//!
//! A load distinguishes two failure classes:
//! - [`LoadError`]: the table can no longer be trusted, so the batch is
//!   abandoned and [`Engine::load`](crate::Engine::load) returns `Err`
//! - [`LoadWarning`]: a single reference could not be resolved; a sentinel
//!   value is substituted and loading continues
//!
//! Warnings are collected in a [`LoadLog`] and also emitted through
//! `tracing` as they happen.

use std::fmt;

use framedef_index::{AllocError, IndexError, TableError};
use thiserror::Error;

/// Fatal load errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// An entity table could not grow.
    #[error("table allocation failed: {0}")]
    Table(#[from] TableError),

    /// A hash index was asked to link a slot twice.
    #[error("index corrupted: {0}")]
    Index(#[from] IndexError),

    /// Legacy id allocation failed where an id is mandatory.
    #[error("legacy id allocation failed: {0}")]
    Alloc(#[from] AllocError),

    /// The first load defined no frames.
    #[error("no frames defined")]
    NoFrames,

    /// The first load did not define `S_NULL`.
    #[error("'S_NULL' frame must be defined")]
    MissingNullState,

    /// A spriteframe was neither a frame letter nor an integer.
    #[error("frame '{frame}': bad spriteframe '{value}'")]
    BadSpriteFrame {
        /// Frame being processed.
        frame: String,
        /// Offending value.
        value: String,
    },

    /// An action named no known code pointer.
    #[error("frame '{frame}': bad action '{value}'")]
    BadAction {
        /// Frame being processed.
        frame: String,
        /// Offending value.
        value: String,
    },

    /// A nextframe could not be resolved.
    #[error("frame '{frame}': bad nextframe '{value}'")]
    BadNextFrame {
        /// Frame being processed.
        frame: String,
        /// Offending value.
        value: String,
    },

    /// A particle event name was not recognised.
    #[error("frame '{frame}': bad particle event '{value}'")]
    BadParticleEvent {
        /// Frame being processed.
        frame: String,
        /// Offending value.
        value: String,
    },

    /// A framedelta section carried no `name` field.
    #[error("framedelta section #{position} has no 'name' field")]
    DeltaWithoutName {
        /// Position of the section within its batch.
        position: usize,
    },

    /// A framedelta named a frame that does not exist.
    #[error("framedelta: frame '{0}' does not exist")]
    UnknownDeltaTarget(String),
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Namespaces a reference can be resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Frames.
    State,
    /// Thing types.
    Thing,
    /// Sounds.
    Sound,
    /// EDF strings.
    String,
    /// Code pointers.
    BexPtr,
    /// Sprites.
    Sprite,
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::State => "frame",
            Self::Thing => "thing",
            Self::Sound => "sound",
            Self::String => "string",
            Self::BexPtr => "bexptr",
            Self::Sprite => "sprite",
        })
    }
}

/// Recoverable load problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A name did not resolve in the namespace it was looked up in.
    UnresolvedReference {
        /// Namespace searched.
        namespace: NamespaceKind,
        /// Name that failed.
        name: String,
    },
    /// A legacy id could not be auto-allocated.
    AllocatorExhausted {
        /// Namespace of the record.
        namespace: NamespaceKind,
        /// Record that stayed unnumbered.
        name: String,
    },
    /// A `prefix:value` misc token used an unknown prefix.
    UnknownMiscPrefix {
        /// The prefix as written.
        prefix: String,
    },
    /// A `prefix:` misc token had nothing after the colon.
    EmptyMiscValue {
        /// The whole token.
        token: String,
    },
    /// A bare misc token matched no namespace.
    UnresolvedMisc {
        /// The token.
        token: String,
    },
    /// A sprite name was neither known nor definable.
    UndefinableSprite {
        /// Frame that referenced it.
        frame: String,
        /// The sprite name.
        sprite: String,
    },
    /// A batch sprite name was not four characters long.
    InvalidSpriteName {
        /// The name as written.
        sprite: String,
    },
    /// A nextframe named an unknown state, which was created empty.
    ImplicitState {
        /// Frame that referenced it.
        frame: String,
        /// The created state.
        target: String,
    },
    /// Arguments beyond the list capacity were discarded.
    DroppedArguments {
        /// Frame being processed.
        frame: String,
        /// Number of discarded arguments.
        count: usize,
    },
    /// A compressed definition had fields past its last slot.
    ExtraCmpFields {
        /// Frame being processed.
        frame: String,
        /// Number of ignored fields.
        count: usize,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnresolvedReference { namespace, name } => {
                write!(f, "invalid {namespace} '{name}'")
            }
            LoadWarning::AllocatorExhausted { namespace, name } => {
                write!(f, "failed to auto-allocate legacy id for {namespace} '{name}'")
            }
            LoadWarning::UnknownMiscPrefix { prefix } => {
                write!(f, "unknown value prefix '{prefix}'")
            }
            LoadWarning::EmptyMiscValue { token } => write!(f, "invalid prefix:value '{token}'"),
            LoadWarning::UnresolvedMisc { token } => {
                write!(f, "misc value '{token}' matches no thing, frame, sound, string or bexptr")
            }
            LoadWarning::UndefinableSprite { frame, sprite } => {
                write!(f, "frame '{frame}': couldn't implicitly define sprite '{sprite}'")
            }
            LoadWarning::InvalidSpriteName { sprite } => {
                write!(f, "invalid sprite name '{sprite}'")
            }
            LoadWarning::ImplicitState { frame, target } => {
                write!(f, "frame '{frame}': nextframe '{target}' implicitly defined")
            }
            LoadWarning::DroppedArguments { frame, count } => {
                write!(f, "frame '{frame}': {count} argument(s) beyond capacity dropped")
            }
            LoadWarning::ExtraCmpFields { frame, count } => {
                write!(f, "frame '{frame}': {count} trailing cmp field(s) ignored")
            }
        }
    }
}

/// Warnings accumulated across loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadLog {
    warnings: Vec<LoadWarning>,
}

impl LoadLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and emits it.
    pub fn warn(&mut self, warning: LoadWarning) {
        tracing::warn!(warning = %warning, "load warning");
        self.warnings.push(warning);
    }

    /// Returns every warning recorded so far, oldest first.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Returns the number of warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Returns true if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Drops all recorded warnings.
    pub fn clear(&mut self) {
        self.warnings.clear();
    }
}
