//! Sound mnemonics.
//!
//! The table always holds a null sound (`none`, legacy id 0) that failed
//! misc-field lookups resolve to.

use framedef_index::AllocError;

use super::{Entry, Namespace};
use crate::error::Result;
use crate::section::Section;

/// Mnemonic of the null sound.
pub const NULL_SOUND: &str = "none";

/// A sound definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// Mnemonic.
    pub mnemonic: String,
    /// Legacy id (`-1` for none).
    pub dehnum: i32,
}

impl Sound {
    /// Creates a sound.
    #[must_use]
    pub fn new(mnemonic: impl Into<String>, dehnum: i32) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            dehnum,
        }
    }

    /// Builds a sound from a `sound` section.
    #[must_use]
    pub fn from_section<S: Section>(section: &S) -> Self {
        let dehnum = section
            .int("dehackednum")
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(-1);
        Self::new(section.title(), dehnum)
    }
}

impl Entry for Sound {
    fn name(&self) -> &str {
        &self.mnemonic
    }

    fn number(&self) -> i32 {
        self.dehnum
    }

    fn set_number(&mut self, number: i32) {
        self.dehnum = number;
    }
}

/// All sounds, with the null sound.
#[derive(Debug, Clone)]
pub struct SoundTable {
    sounds: Namespace<Sound>,
    null: usize,
}

impl SoundTable {
    /// Creates a table holding only the null sound.
    ///
    /// # Errors
    ///
    /// Fails if the first slot cannot be allocated.
    pub fn new(chains: usize) -> Result<Self> {
        let mut sounds = Namespace::new(chains);
        let null = sounds.define(Sound::new(NULL_SOUND, 0))?;
        Ok(Self { sounds, null })
    }

    /// Adds or redefines a sound.
    ///
    /// # Errors
    ///
    /// Fails if the table cannot grow.
    pub fn define(&mut self, sound: Sound) -> Result<usize> {
        self.sounds.define(sound)
    }

    /// Returns the index of the null sound.
    #[must_use]
    pub fn null(&self) -> usize {
        self.null
    }

    /// Looks a sound up by mnemonic.
    #[must_use]
    pub fn index_of(&self, mnemonic: &str) -> Option<usize> {
        self.sounds.index_of(mnemonic)
    }

    /// Looks a sound up by legacy id.
    #[must_use]
    pub fn index_for_number(&self, number: i32) -> Option<usize> {
        self.sounds.index_for_number(number)
    }

    /// Returns the legacy id of `slot`, allocating one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Exhausted`] when no id is free.
    pub fn ensure_number(&mut self, slot: usize) -> std::result::Result<i32, AllocError> {
        self.sounds.ensure_number(slot)
    }

    /// Returns a sound.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Sound> {
        self.sounds.get(slot)
    }

    /// Returns the number of sounds, the null sound included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Always false: the null sound is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Gives access to the underlying namespace.
    #[must_use]
    pub fn namespace_mut(&mut self) -> &mut Namespace<Sound> {
        &mut self.sounds
    }
}
