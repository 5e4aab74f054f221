//! Named, numbered record collections.
//!
//! States, thing types, sounds and strings share one storage shape: an
//! [`EntityTable`] of records plus a [`Registry`] indexing them by name and
//! legacy id. [`Namespace`] owns both and keeps each record's own
//! `name`/`number` fields in step with the indexes.
//!
//! Code pointers and sprites are simpler lookup tables and live in
//! [`bexptr`] and [`sprites`].
//!
//! [`Namespaces`] bundles one of each, which is everything reference
//! resolution needs.

pub mod bexptr;
pub mod sounds;
pub mod sprites;
pub mod strings;
pub mod things;

use std::ops::Range;

use framedef_index::{AllocError, EntityTable, IdAllocator, Registry};

use crate::args::ArgResolver;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::state::StateTable;

pub use bexptr::CodePointers;
pub use sounds::{Sound, SoundTable};
pub use sprites::SpriteTable;
pub use strings::{EdfString, StringTable};
pub use things::{ThingTable, ThingType};

/// A record stored in a [`Namespace`].
pub trait Entry {
    /// Record name.
    fn name(&self) -> &str;

    /// Legacy id, or a negative value for none.
    fn number(&self) -> i32;

    /// Updates the stored legacy id.
    fn set_number(&mut self, number: i32);
}

/// Records indexed by name and legacy id.
#[derive(Debug, Clone)]
pub struct Namespace<E> {
    entries: EntityTable<E>,
    registry: Registry,
}

impl<E: Entry> Namespace<E> {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new(chains: usize) -> Self {
        Self {
            entries: EntityTable::new(),
            registry: Registry::new(chains),
        }
    }

    /// Reserves `count` slots without indexing them.
    ///
    /// Callers fill each slot and then call [`Namespace::link`].
    ///
    /// # Errors
    ///
    /// Fails if the table cannot grow.
    pub fn reserve_with<F>(&mut self, count: usize, init: F) -> Result<Range<usize>>
    where
        F: FnMut(usize) -> E,
    {
        Ok(self.entries.reserve_with(count, init)?)
    }

    /// Indexes a reserved slot by its record's name and number.
    ///
    /// # Errors
    ///
    /// Fails if the slot was already indexed.
    pub fn link(&mut self, slot: usize) -> Result<()> {
        let (name, number) = {
            let entry = &self.entries[slot];
            (entry.name().to_owned(), entry.number())
        };
        self.registry.insert_name(slot, &name)?;
        self.registry.assign_number(slot, number)?;
        Ok(())
    }

    /// Adds a record, or replaces an existing record with the same name in
    /// place (keeping its slot). Returns the slot.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot grow.
    pub fn define(&mut self, entry: E) -> Result<usize> {
        if let Some(slot) = self.index_of(entry.name()) {
            let number = entry.number();
            self.entries[slot] = entry;
            self.renumber(slot, number)?;
            return Ok(slot);
        }

        let slot = self.entries.push(entry)?;
        self.link(slot)?;
        Ok(slot)
    }

    /// Changes the legacy id of `slot`; negative means none.
    ///
    /// # Errors
    ///
    /// Only fails on index corruption.
    pub fn renumber(&mut self, slot: usize, number: i32) -> Result<()> {
        self.registry.assign_number(slot, number)?;
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.set_number(number);
        }
        Ok(())
    }

    /// Returns the legacy id of `slot`, allocating one if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Exhausted`] when the pool is dry.
    pub fn ensure_number(&mut self, slot: usize) -> std::result::Result<i32, AllocError> {
        let number = self.registry.ensure_number(slot)?;
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.set_number(number);
        }
        Ok(number)
    }

    /// Returns the slot named `name` (case-insensitive).
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.registry.slot_for_name(name)
    }

    /// Returns the newest slot holding legacy id `number`.
    #[must_use]
    pub fn index_for_number(&self, number: i32) -> Option<usize> {
        self.registry.slot_for_number(number)
    }

    /// Returns the record at `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&E> {
        self.entries.get(slot)
    }

    /// Returns the record at `slot` mutably.
    ///
    /// Name and number must be changed through the namespace, not through
    /// this reference.
    #[must_use]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut E> {
        self.entries.get_mut(slot)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the namespace is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter()
    }

    /// Iterates records mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.iter_mut()
    }

    /// Returns the logical allocation of the backing table.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.entries.allocated()
    }

    /// Returns the id allocator.
    #[must_use]
    pub fn allocator(&self) -> &IdAllocator {
        self.registry.allocator()
    }

    /// Replaces the id allocator.
    pub fn set_allocator(&mut self, allocator: IdAllocator) {
        self.registry.set_allocator(allocator);
    }
}

// ===== Namespace set =====

/// Every namespace a frame can refer to.
#[derive(Debug, Clone)]
pub struct Namespaces {
    /// Frames.
    pub states: StateTable,
    /// Thing types.
    pub things: ThingTable,
    /// Sounds.
    pub sounds: SoundTable,
    /// EDF strings.
    pub strings: StringTable,
    /// Sprite names.
    pub sprites: SpriteTable,
    /// Code pointers.
    pub code_pointers: CodePointers,
    /// Slot of `S_NULL`; 0 until a load defines it.
    pub null_state: usize,
}

impl Namespaces {
    /// Creates namespaces holding only their sentinels.
    ///
    /// # Errors
    ///
    /// Fails if a sentinel cannot be stored.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            states: StateTable::new(config.state_chains),
            things: ThingTable::new(config.thing_chains)?,
            sounds: SoundTable::new(config.sound_chains)?,
            strings: StringTable::new(config.string_chains),
            sprites: SpriteTable::new(config.sprite_chains),
            code_pointers: CodePointers::new(),
            null_state: 0,
        })
    }
}

impl ArgResolver for Namespaces {
    fn thing_by_name(&self, name: &str) -> Option<usize> {
        self.things.index_of(name)
    }

    fn thing_by_number(&self, number: i32) -> Option<usize> {
        self.things.index_for_number(number)
    }

    fn unknown_thing(&self) -> usize {
        self.things.unknown()
    }

    fn state_by_name(&self, name: &str) -> Option<usize> {
        self.states.index_of(name)
    }

    fn state_by_number(&self, number: i32) -> Option<usize> {
        self.states.index_for_number(number)
    }

    fn null_state(&self) -> usize {
        self.null_state
    }

    fn sound_by_name(&self, name: &str) -> Option<usize> {
        self.sounds.index_of(name)
    }

    fn sound_by_number(&self, number: i32) -> Option<usize> {
        self.sounds.index_for_number(number)
    }

    fn string_by_name(&self, name: &str) -> Option<usize> {
        self.strings.index_of(name)
    }

    fn string_by_number(&self, number: i32) -> Option<usize> {
        self.strings.index_for_number(number)
    }

    fn code_pointer(&self, name: &str) -> Option<usize> {
        self.code_pointers.index_of(name)
    }
}
