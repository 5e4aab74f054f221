//! # Framedef Core
//!
//! Data-driven state table with cached, typed argument evaluation.
//!
//! Configuration defines an extensible table of frames ("states"): what to
//! draw, for how long, which action to run, which frame follows, two misc
//! values and a short list of textual arguments. Frames refer to each other
//! and to thing types, sounds, strings and code pointers by name or by
//! legacy numeric id. Action code reads arguments through typed accessors
//! whose results are cached per argument, so a per-tick loop never
//! re-parses text.
//!
//! ## Architecture
//!
//! - **[`section`]**: what a configuration front end hands over
//! - **[`namespace`]**: states, thing types, sounds, strings, sprites and
//!   code pointers, indexed by name and legacy id
//! - **[`cmp`]**: the packed one-line frame syntax
//! - **[`misc`]**: `prefix:value` resolution for misc fields
//! - **[`processor`]**: collection, processing and delta passes
//! - **[`args`]**: argument lists and their evaluation cache
//! - **[`Engine`]**: owns all of the above and exposes lookups and typed
//!   argument reads
//!
//! Data flows one way: `ConfigBatch` → [`Engine::load`] → collection →
//! processing → deltas → populated [`State`](state::State) records.
//!
//! ## Example
//!
//! ```
//! use framedef_core::section::{ConfigBatch, SectionData};
//! use framedef_core::{Engine, EngineConfig};
//!
//! let mut batch = ConfigBatch::new();
//! batch.frames.push(SectionData::new("S_NULL"));
//! batch.frames.push(
//!     SectionData::new("S_PLAY")
//!         .with("sprite", "PLAY")
//!         .with("tics", -1)
//!         .with("action", "A_Look(5)"),
//! );
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! engine.load(&batch).unwrap();
//!
//! let play = engine.lookup_by_name("s_play").unwrap();
//! assert_eq!(engine.state(play).unwrap().tics, -1);
//! assert_eq!(engine.arg_as_int(play, 0, 0), 5);
//! assert_eq!(engine.arg_as_int(play, 3, -1), -1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod cmp;
pub mod config;
pub mod error;
pub mod fixed;
pub mod flags;
pub mod keywords;
pub mod lexical;
pub mod misc;
pub mod namespace;
pub mod processor;
pub mod section;
pub mod state;

mod engine;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use args::{ArgError, ArgList, ArgResolver, EvalValue, MAX_ARGS};
pub use config::EngineConfig;
pub use engine::{Engine, LoadPhase};
pub use error::{LoadError, LoadLog, LoadWarning, NamespaceKind};
pub use fixed::{Angle, Fixed};
pub use flags::FlagSet;
pub use section::{ConfigBatch, FieldValue, Section, SectionData};
pub use state::{ParticleEvent, State, StateFlags};
