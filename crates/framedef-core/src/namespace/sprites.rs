//! Sprite names.
//!
//! Sprites are four-character lump prefixes. Slot 0 is the special `BLANK`
//! sprite, which frames use when they draw nothing.

use framedef_index::{ChainIndex, NameKey};

/// Name of the blank sprite.
pub const BLANK_SPRITE: &str = "BLANK";

/// Length every real sprite name must have.
pub const SPRITE_NAME_LEN: usize = 4;

/// Sprite name table.
#[derive(Debug, Clone)]
pub struct SpriteTable {
    names: Vec<String>,
    index: ChainIndex<NameKey>,
}

impl SpriteTable {
    /// Creates a table holding only `BLANK`.
    #[must_use]
    pub fn new(chains: usize) -> Self {
        let mut index = ChainIndex::with_chains(chains);
        let inserted = index.insert(0, NameKey::new(BLANK_SPRITE));
        debug_assert!(inserted.is_ok(), "fresh sprite index rejected BLANK");
        Self {
            names: vec![BLANK_SPRITE.to_owned()],
            index,
        }
    }

    /// Returns the index of `BLANK`.
    #[must_use]
    pub const fn blank(&self) -> usize {
        0
    }

    /// Defines a sprite, returning its index.
    ///
    /// Returns the existing index for a known name and `None` for a name
    /// that is not exactly four characters long.
    pub fn define(&mut self, name: &str) -> Option<usize> {
        if let Some(existing) = self.index_of(name) {
            return Some(existing);
        }
        if name.chars().count() != SPRITE_NAME_LEN {
            return None;
        }

        let slot = self.names.len();
        self.index.insert(slot, NameKey::new(name)).ok()?;
        self.names.push(name.to_owned());
        tracing::trace!(sprite = name, slot, "defined sprite");
        Some(slot)
    }

    /// Looks a sprite up by name (case-insensitive).
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.lookup(name)
    }

    /// Returns the name of sprite `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the number of sprites, `BLANK` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
