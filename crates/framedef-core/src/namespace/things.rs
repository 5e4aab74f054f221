//! Thing types.
//!
//! Only the identity of a thing type matters here: frames refer to things
//! by name or legacy id in misc fields and arguments. The table always
//! holds an `Unknown` thing that failed lookups resolve to.

use framedef_index::AllocError;

use super::{Entry, Namespace};
use crate::error::Result;
use crate::section::Section;

/// Name of the sentinel thing type.
pub const UNKNOWN_THING: &str = "Unknown";

/// A thing type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingType {
    /// Mnemonic.
    pub name: String,
    /// Legacy id (`-1` for none).
    pub dehnum: i32,
}

impl ThingType {
    /// Creates a thing type.
    #[must_use]
    pub fn new(name: impl Into<String>, dehnum: i32) -> Self {
        Self {
            name: name.into(),
            dehnum,
        }
    }

    /// Builds a thing type from a `thingtype` section.
    #[must_use]
    pub fn from_section<S: Section>(section: &S) -> Self {
        let dehnum = section
            .int("dehackednum")
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(-1);
        Self::new(section.title(), dehnum)
    }
}

impl Entry for ThingType {
    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i32 {
        self.dehnum
    }

    fn set_number(&mut self, number: i32) {
        self.dehnum = number;
    }
}

/// All thing types, with the `Unknown` sentinel.
#[derive(Debug, Clone)]
pub struct ThingTable {
    things: Namespace<ThingType>,
    unknown: usize,
}

impl ThingTable {
    /// Creates a table holding only `Unknown`.
    ///
    /// # Errors
    ///
    /// Fails if the first slot cannot be allocated.
    pub fn new(chains: usize) -> Result<Self> {
        let mut things = Namespace::new(chains);
        let unknown = things.define(ThingType::new(UNKNOWN_THING, -1))?;
        Ok(Self { things, unknown })
    }

    /// Adds or redefines a thing type.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot grow.
    pub fn define(&mut self, thing: ThingType) -> Result<usize> {
        let slot = self.things.define(thing)?;
        tracing::trace!(slot, "defined thing type");
        Ok(slot)
    }

    /// Returns the index of the `Unknown` thing.
    #[must_use]
    pub fn unknown(&self) -> usize {
        self.unknown
    }

    /// Looks a thing up by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.things.index_of(name)
    }

    /// Looks a thing up by legacy id.
    #[must_use]
    pub fn index_for_number(&self, number: i32) -> Option<usize> {
        self.things.index_for_number(number)
    }

    /// Looks a thing up by name, falling back to `Unknown`.
    #[must_use]
    pub fn safe_by_name(&self, name: &str) -> usize {
        self.index_of(name).unwrap_or(self.unknown)
    }

    /// Looks a thing up by legacy id, falling back to `Unknown`.
    #[must_use]
    pub fn safe_by_number(&self, number: i32) -> usize {
        self.index_for_number(number).unwrap_or(self.unknown)
    }

    /// Returns the legacy id of `slot`, allocating one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Exhausted`] when no id is free.
    pub fn ensure_number(&mut self, slot: usize) -> std::result::Result<i32, AllocError> {
        self.things.ensure_number(slot)
    }

    /// Returns a thing type.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&ThingType> {
        self.things.get(slot)
    }

    /// Returns the number of thing types, `Unknown` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.things.len()
    }

    /// Always false: `Unknown` is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// Gives access to the underlying namespace.
    #[must_use]
    pub fn namespace_mut(&mut self) -> &mut Namespace<ThingType> {
        &mut self.things
    }
}
