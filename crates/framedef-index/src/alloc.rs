//! Auto-numbering of legacy ids.
//!
//! Records that are referenced by legacy id but were defined without one get
//! an id from a shrinking pool that starts at `i32::MAX` and counts down,
//! skipping ids that are already in use. Allocating from the top keeps
//! automatic ids clear of the small numbers that hand-written definitions
//! use.

use serde::{Deserialize, Serialize};

use crate::error::AllocError;

/// A high-to-low legacy id allocator.
///
/// # Example
///
/// ```
/// use framedef_index::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// let first = ids.allocate(|_| false).unwrap();
/// let second = ids.allocate(|_| false).unwrap();
///
/// assert_eq!(first, i32::MAX);
/// assert_eq!(second, i32::MAX - 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    cursor: i32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates an allocator whose first candidate is `i32::MAX`.
    #[must_use]
    pub const fn new() -> Self {
        Self { cursor: i32::MAX }
    }

    /// Creates an allocator whose first candidate is `cursor`.
    #[must_use]
    pub const fn starting_at(cursor: i32) -> Self {
        Self { cursor }
    }

    /// Returns the next candidate id.
    #[must_use]
    pub const fn cursor(&self) -> i32 {
        self.cursor
    }

    /// Returns true once the pool has run dry.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.cursor < 0
    }

    /// Issues the next id for which `in_use` returns false.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Exhausted`] when the cursor passes below zero.
    /// Once exhausted, every later call fails the same way.
    pub fn allocate<F>(&mut self, mut in_use: F) -> Result<i32, AllocError>
    where
        F: FnMut(i32) -> bool,
    {
        if self.is_exhausted() {
            return Err(AllocError::Exhausted);
        }

        loop {
            let candidate = self.cursor;
            self.cursor -= 1;

            if candidate < 0 {
                return Err(AllocError::Exhausted);
            }
            if !in_use(candidate) {
                return Ok(candidate);
            }
        }
    }
}
