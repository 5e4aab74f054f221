//! Name and legacy-id bookkeeping for one namespace.
//!
//! Every namespace (states, things, sounds, strings) needs the same trio:
//! a case-insensitive name index, a legacy id index that tolerates shared
//! ids, and an allocator for records that are referenced by id but were
//! defined without one. [`Registry`] keeps the three consistent.

use serde::{Deserialize, Serialize};

use crate::alloc::IdAllocator;
use crate::chain::ChainIndex;
use crate::error::{AllocError, IndexError};
use crate::key::{NameKey, NumKey};

/// Name index, id index and id allocator over the slots of one table.
///
/// # Example
///
/// ```
/// use framedef_index::Registry;
///
/// let mut registry = Registry::new(17);
/// registry.insert_name(0, "S_NULL").unwrap();
/// registry.assign_number(0, 0).unwrap();
/// registry.insert_name(1, "S_LOOK").unwrap();
///
/// assert_eq!(registry.slot_for_name("s_look"), Some(1));
/// assert_eq!(registry.slot_for_number(0), Some(0));
///
/// // S_LOOK had no id; one is allocated from the top of the range.
/// assert_eq!(registry.ensure_number(1), Ok(i32::MAX));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    names: ChainIndex<NameKey>,
    numbers: ChainIndex<NumKey>,
    allocator: IdAllocator,
}

impl Registry {
    /// Creates an empty registry whose indexes use `chains` buckets.
    #[must_use]
    pub fn new(chains: usize) -> Self {
        Self {
            names: ChainIndex::with_chains(chains),
            numbers: ChainIndex::with_chains(chains),
            allocator: IdAllocator::new(),
        }
    }

    /// Indexes `slot` by name.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::AlreadyLinked`] if the slot already has a name.
    pub fn insert_name(&mut self, slot: usize, name: &str) -> Result<(), IndexError> {
        self.names.insert(slot, NameKey::new(name))
    }

    /// Returns the slot named `name` (case-insensitive).
    #[must_use]
    pub fn slot_for_name(&self, name: &str) -> Option<usize> {
        self.names.lookup(name)
    }

    /// Returns the newest slot holding legacy id `number`.
    ///
    /// Negative ids never match.
    #[must_use]
    pub fn slot_for_number(&self, number: i32) -> Option<usize> {
        if number < 0 {
            return None;
        }
        self.numbers.lookup(&number)
    }

    /// Returns the name `slot` is indexed under.
    #[must_use]
    pub fn name_of(&self, slot: usize) -> Option<&str> {
        self.names.key_of(slot).map(NameKey::as_str)
    }

    /// Returns the legacy id `slot` is indexed under.
    #[must_use]
    pub fn number_of(&self, slot: usize) -> Option<i32> {
        self.numbers.key_of(slot).map(|key| key.get())
    }

    /// Re-keys `slot` in the id index.
    ///
    /// The slot is unlinked from its old chain first; a negative `number`
    /// leaves it unnumbered.
    ///
    /// # Errors
    ///
    /// Only fails if the index is corrupt (the slot stayed linked after
    /// removal).
    pub fn assign_number(&mut self, slot: usize, number: i32) -> Result<(), IndexError> {
        self.numbers.remove(slot);
        if number >= 0 {
            self.numbers.insert(slot, NumKey::new(number))?;
        }
        Ok(())
    }

    /// Returns the legacy id of `slot`, allocating one if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Exhausted`] if the slot has no id and the pool is
    /// empty. The slot stays unnumbered.
    pub fn ensure_number(&mut self, slot: usize) -> Result<i32, AllocError> {
        if let Some(number) = self.number_of(slot) {
            return Ok(number);
        }

        let numbers = &self.numbers;
        let number = self.allocator.allocate(|id| numbers.lookup(&id).is_some())?;
        self.numbers.insert(slot, NumKey::new(number))?;
        tracing::debug!(slot, number, "auto-allocated legacy id");
        Ok(number)
    }

    /// Returns the id allocator.
    #[must_use]
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Replaces the id allocator (used to resume or constrain numbering).
    pub fn set_allocator(&mut self, allocator: IdAllocator) {
        self.allocator = allocator;
    }

    /// Returns the number of named slots.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Returns the number of numbered slots.
    #[must_use]
    pub fn number_count(&self) -> usize {
        self.numbers.len()
    }
}
