//! The frame table engine.
//!
//! [`Engine`] owns every namespace and is the only way in and out of them:
//! - [`Engine::load`] applies a [`ConfigBatch`] (and may be called again
//!   with further batches)
//! - lookups map names and legacy ids to state indexes
//! - `arg_as_*` accessors read a state's arguments as typed values
//!
//! # Loading
//!
//! Each load runs through [`LoadPhase`]s in order. Sprites, thing types,
//! sounds and strings are defined first so frames can refer to them, then
//! frames are collected, processed, and finally edited by deltas.
//!
//! A fatal error abandons the rest of the batch and returns the engine to
//! [`LoadPhase::Idle`]. Work already applied by that batch is kept, except
//! when no load has succeeded yet: a failed first load leaves the engine as
//! empty as [`Engine::new`] built it.
//!
//! # Threading
//!
//! Argument evaluation caches live in `Cell`s, so typed reads only need
//! `&Engine` but the engine is not `Sync`. Loads need `&mut Engine`.
//!
//! # Example
//!
//! ```
//! use framedef_core::section::{ConfigBatch, SectionData};
//! use framedef_core::{Engine, EngineConfig};
//!
//! let mut batch = ConfigBatch::new();
//! batch.thingtypes.push(SectionData::new("ZombieMan").with("dehackednum", 2));
//! batch.frames.push(SectionData::new("S_NULL"));
//! batch.frames.push(
//!     SectionData::new("S_LOOK")
//!         .with("cmp", "POSS|A|*|10|A_Look(thing:ZombieMan, 0.5)|@this"),
//! );
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! engine.load(&batch).unwrap();
//!
//! let look = engine.lookup_by_name("S_LOOK").unwrap();
//! let zombie = engine.things().index_of("ZombieMan").unwrap();
//! assert_eq!(engine.arg_as_thing(look, 0, 0), zombie);
//! assert_eq!(engine.arg_as_double(look, 1, 0.0), 0.5);
//! ```

use std::fmt;

use crate::args::{ArgError, ArgList, ArgResolver};
use crate::config::EngineConfig;
use crate::error::{LoadLog, LoadWarning, Result};
use crate::fixed::{Angle, Fixed};
use crate::flags::FlagSet;
use crate::namespace::{
    CodePointers, EdfString, Namespaces, Sound, SoundTable, SpriteTable, StringTable, ThingTable,
    ThingType,
};
use crate::processor::Processor;
use crate::section::{ConfigBatch, Section};
use crate::state::{State, StateTable};

// =============================================================================
// Load Phase
// =============================================================================

/// Where a load currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    /// No load has run, or the last one failed.
    #[default]
    Idle,
    /// Frame names are being given slots.
    Collecting,
    /// Frames and deltas are being filled in.
    Processing,
    /// The last load completed.
    Applied,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Processing => "processing",
            Self::Applied => "applied",
        })
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Owns the frame table and everything it refers to.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    tables: Namespaces,
    log: LoadLog,
    phase: LoadPhase,
    initialized: bool,
}

impl Engine {
    /// Creates an engine with empty namespaces.
    ///
    /// # Errors
    ///
    /// Fails if a namespace sentinel cannot be stored.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            tables: Namespaces::new(&config)?,
            config,
            log: LoadLog::new(),
            phase: LoadPhase::Idle,
            initialized: false,
        })
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Applies a batch of definitions.
    ///
    /// The first successful load must define at least one frame, including
    /// `S_NULL`. Later loads may add frames or edit existing ones.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`LoadError`](crate::LoadError). Recoverable
    /// problems are recorded in [`Engine::warnings`] instead.
    pub fn load<S: Section>(&mut self, batch: &ConfigBatch<S>) -> Result<()> {
        let result = self.run_load(batch);
        match &result {
            Ok(()) => {
                self.phase = LoadPhase::Applied;
                tracing::info!(states = self.tables.states.len(), "load applied");
            }
            Err(err) => {
                self.phase = LoadPhase::Idle;
                if !self.initialized {
                    self.discard_partial_load();
                }
                tracing::error!(error = %err, "load abandoned");
            }
        }
        result
    }

    /// Drops everything a failed first load linked. Frames collected before
    /// the `S_NULL` check must not survive into the next attempt.
    fn discard_partial_load(&mut self) {
        match Namespaces::new(&self.config) {
            Ok(fresh) => self.tables = fresh,
            Err(err) => tracing::warn!(error = %err, "could not reset namespaces"),
        }
    }

    fn run_load<S: Section>(&mut self, batch: &ConfigBatch<S>) -> Result<()> {
        for name in &batch.sprites {
            if self.tables.sprites.define(name).is_none() {
                self.log.warn(LoadWarning::InvalidSpriteName {
                    sprite: name.clone(),
                });
            }
        }
        for section in &batch.thingtypes {
            self.tables.things.define(ThingType::from_section(section))?;
        }
        for section in &batch.sounds {
            self.tables.sounds.define(Sound::from_section(section))?;
        }
        for section in &batch.strings {
            self.tables.strings.define(EdfString::from_section(section))?;
        }

        self.phase = LoadPhase::Collecting;
        let first_load = !self.initialized;
        Processor::new(&mut self.tables, &mut self.log).collect(&batch.frames, first_load)?;
        self.initialized = true;

        self.phase = LoadPhase::Processing;
        let mut processor = Processor::new(&mut self.tables, &mut self.log);
        processor.process_frames(&batch.frames)?;
        processor.apply_deltas(&batch.framedeltas)
    }

    /// Returns the phase of the current or last load.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Returns every warning recorded by all loads so far.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        self.log.warnings()
    }

    /// Forgets recorded warnings.
    pub fn clear_warnings(&mut self) {
        self.log.clear();
    }

    /// Returns the configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // States
    // -------------------------------------------------------------------------

    /// Looks a state up by name (case-insensitive).
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<usize> {
        self.tables.states.index_of(name)
    }

    /// Looks a state up by legacy id, falling back to the null state for
    /// negative or unknown ids. When several states share an id, the one
    /// given it most recently wins.
    ///
    /// Returns `None` until a load has succeeded, since there is no null
    /// state to fall back to before then.
    #[must_use]
    pub fn lookup_by_legacy_id(&self, id: i32) -> Option<usize> {
        let null = self.null_state()?;
        if id < 0 {
            return Some(null);
        }
        Some(self.tables.states.index_for_number(id).unwrap_or(null))
    }

    /// Returns the index of `S_NULL`, or `None` before the first successful
    /// load.
    #[must_use]
    pub fn null_state(&self) -> Option<usize> {
        self.initialized.then_some(self.tables.null_state)
    }

    /// Returns state `index`.
    #[must_use]
    pub fn state(&self, index: usize) -> Option<&State> {
        self.tables.states.get(index)
    }

    /// Iterates states in index order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.tables.states.iter()
    }

    /// Returns the number of states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.tables.states.len()
    }

    /// Returns the state table.
    #[must_use]
    pub fn state_table(&self) -> &StateTable {
        &self.tables.states
    }

    // -------------------------------------------------------------------------
    // Namespaces
    // -------------------------------------------------------------------------

    /// Returns the thing types.
    #[must_use]
    pub fn things(&self) -> &ThingTable {
        &self.tables.things
    }

    /// Returns the sounds.
    #[must_use]
    pub fn sounds(&self) -> &SoundTable {
        &self.tables.sounds
    }

    /// Returns the EDF strings.
    #[must_use]
    pub fn strings(&self) -> &StringTable {
        &self.tables.strings
    }

    /// Returns the sprite names.
    #[must_use]
    pub fn sprites(&self) -> &SpriteTable {
        &self.tables.sprites
    }

    /// Returns the code pointer table.
    #[must_use]
    pub fn code_pointers(&self) -> &CodePointers {
        &self.tables.code_pointers
    }

    /// Returns every namespace, for use as an [`ArgResolver`] with the
    /// lower-level [`ArgList`] accessors.
    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.tables
    }

    // -------------------------------------------------------------------------
    // Arguments
    // -------------------------------------------------------------------------

    fn args(&self, state: usize) -> Option<&ArgList> {
        self.tables.states.get(state)?.args.as_ref()
    }

    /// Returns the number of arguments of `state` (0 for unknown states).
    #[must_use]
    pub fn argument_count(&self, state: usize) -> usize {
        self.tables.states.get(state).map_or(0, State::argument_count)
    }

    /// Argument as an integer.
    #[must_use]
    pub fn arg_as_int(&self, state: usize, position: usize, default: i32) -> i32 {
        self.args(state).map_or(default, |a| a.as_int(position, default))
    }

    /// Argument as fixed-point.
    #[must_use]
    pub fn arg_as_fixed(&self, state: usize, position: usize, default: Fixed) -> Fixed {
        self.args(state).map_or(default, |a| a.as_fixed(position, default))
    }

    /// Argument as a double.
    #[must_use]
    pub fn arg_as_double(&self, state: usize, position: usize, default: f64) -> f64 {
        self.args(state).map_or(default, |a| a.as_double(position, default))
    }

    /// Argument in degrees, as a binary angle.
    #[must_use]
    pub fn arg_as_angle(&self, state: usize, position: usize, default: Angle) -> Angle {
        self.args(state).map_or(default, |a| a.as_angle(position, default))
    }

    /// Argument as a thing type index; unresolved references are `Unknown`.
    #[must_use]
    pub fn arg_as_thing(&self, state: usize, position: usize, default: usize) -> usize {
        self.args(state)
            .map_or(default, |a| a.as_thing(position, default, &self.tables))
    }

    /// Argument as a state index; unresolved references are the null state.
    #[must_use]
    pub fn arg_as_state(&self, state: usize, position: usize, default: usize) -> usize {
        self.args(state)
            .map_or(default, |a| a.as_state(position, default, &self.tables))
    }

    /// Argument as a sound index.
    #[must_use]
    pub fn arg_as_sound(&self, state: usize, position: usize, default: Option<usize>) -> Option<usize> {
        self.args(state)
            .map_or(default, |a| a.as_sound(position, default, &self.tables))
    }

    /// Argument as thing flags.
    #[must_use]
    pub fn arg_as_flags(&self, state: usize, position: usize, default: FlagSet) -> FlagSet {
        self.args(state)
            .map_or(default, |a| a.as_thing_flags(position, default))
    }

    /// Argument as a position in `keywords`; numbers pass through.
    #[must_use]
    pub fn arg_as_keyword(&self, state: usize, position: usize, keywords: &[&str], default: i32) -> i32 {
        self.args(state)
            .map_or(default, |a| a.as_keyword(position, keywords, default))
    }

    /// Argument as a code pointer index.
    #[must_use]
    pub fn arg_as_bexptr(&self, state: usize, position: usize) -> Option<usize> {
        self.args(state)?.as_bexptr(position, &self.tables)
    }

    /// Argument as an EDF string index.
    #[must_use]
    pub fn arg_as_edf_string(&self, state: usize, position: usize, default: Option<usize>) -> Option<usize> {
        self.args(state)
            .map_or(default, |a| a.as_edf_string(position, default, &self.tables))
    }

    /// Overwrites one argument of `state`, creating its list if needed.
    ///
    /// # Errors
    ///
    /// [`ArgError::UnknownState`] or [`ArgError::OutOfCapacity`].
    pub fn set_arg(&mut self, state: usize, position: usize, text: &str) -> std::result::Result<(), ArgError> {
        let record = self
            .tables
            .states
            .get_mut(state)
            .ok_or(ArgError::UnknownState { state })?;
        record.args.get_or_insert_with(ArgList::new).set(position, text)
    }

    /// Clears every cached argument evaluation.
    pub fn reset_all_argument_caches(&self) {
        for args in self.tables.states.iter().filter_map(|s| s.args.as_ref()) {
            args.reset_all();
        }
    }

    /// Returns how many argument parses have been performed in total.
    #[must_use]
    pub fn argument_evaluations(&self) -> u64 {
        self.tables
            .states
            .iter()
            .filter_map(|s| s.args.as_ref())
            .map(ArgList::evaluations)
            .sum()
    }
}

impl ArgResolver for Engine {
    fn thing_by_name(&self, name: &str) -> Option<usize> {
        self.tables.thing_by_name(name)
    }

    fn thing_by_number(&self, number: i32) -> Option<usize> {
        self.tables.thing_by_number(number)
    }

    fn unknown_thing(&self) -> usize {
        self.tables.unknown_thing()
    }

    fn state_by_name(&self, name: &str) -> Option<usize> {
        self.tables.state_by_name(name)
    }

    fn state_by_number(&self, number: i32) -> Option<usize> {
        self.tables.state_by_number(number)
    }

    fn null_state(&self) -> usize {
        self.tables.null_state
    }

    fn sound_by_name(&self, name: &str) -> Option<usize> {
        self.tables.sound_by_name(name)
    }

    fn sound_by_number(&self, number: i32) -> Option<usize> {
        self.tables.sound_by_number(number)
    }

    fn string_by_name(&self, name: &str) -> Option<usize> {
        self.tables.string_by_name(name)
    }

    fn string_by_number(&self, number: i32) -> Option<usize> {
        self.tables.string_by_number(number)
    }

    fn code_pointer(&self, name: &str) -> Option<usize> {
        self.tables.code_pointer(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionData;

    fn minimal() -> ConfigBatch {
        let mut batch = ConfigBatch::new();
        batch.frames.push(SectionData::new("S_NULL"));
        batch
    }

    #[test]
    fn phases() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.phase(), LoadPhase::Idle);

        engine.load(&ConfigBatch::<SectionData>::new()).unwrap_err();
        assert_eq!(engine.phase(), LoadPhase::Idle);

        engine.load(&minimal()).unwrap();
        assert_eq!(engine.phase(), LoadPhase::Applied);
        assert_eq!(engine.phase().to_string(), "applied");
    }

    #[test]
    fn later_loads_skip_first_load_checks() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.load(&minimal()).unwrap();
        engine.load(&ConfigBatch::<SectionData>::new()).unwrap();
        assert_eq!(engine.state_count(), 1);
    }

    #[test]
    fn legacy_id_fallbacks() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut batch = minimal();
        batch.frames.push(SectionData::new("S_ONE").with("dehackednum", 1));
        engine.load(&batch).unwrap();

        assert_eq!(engine.lookup_by_legacy_id(1), Some(1));
        assert_eq!(engine.lookup_by_legacy_id(-5), engine.null_state());
        assert_eq!(engine.lookup_by_legacy_id(77), engine.null_state());
        assert_eq!(engine.null_state(), Some(0));
    }

    #[test]
    fn no_null_state_before_first_load() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.null_state(), None);
        assert_eq!(engine.lookup_by_legacy_id(0), None);
        assert_eq!(engine.lookup_by_legacy_id(-1), None);
    }

    #[test]
    fn set_arg_errors() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.load(&minimal()).unwrap();

        assert_eq!(engine.set_arg(9, 0, "1"), Err(ArgError::UnknownState { state: 9 }));
        assert_eq!(
            engine.set_arg(0, 16, "1"),
            Err(ArgError::OutOfCapacity { index: 16 })
        );
        engine.set_arg(0, 2, "5").unwrap();
        assert_eq!(engine.argument_count(0), 3);
        assert_eq!(engine.arg_as_int(0, 2, 0), 5);
    }

    #[test]
    fn unknown_state_reads_default() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.arg_as_int(3, 0, -1), -1);
        assert_eq!(engine.argument_count(3), 0);
        assert_eq!(engine.arg_as_bexptr(3, 0), None);
    }

    #[test]
    fn invalid_batch_sprites_warn() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut batch = minimal();
        batch.sprites = vec!["TROO".into(), "TROOPER".into()];
        engine.load(&batch).unwrap();

        assert!(engine.sprites().index_of("TROO").is_some());
        assert!(matches!(
            engine.warnings(),
            [LoadWarning::InvalidSpriteName { sprite }] if sprite == "TROOPER"
        ));
        engine.clear_warnings();
        assert!(engine.warnings().is_empty());
    }
}
