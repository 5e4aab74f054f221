//! Growable entity table addressed by stable integer index.
//!
//! The table hands out slots in contiguous batches so that a whole
//! configuration batch can be pre-allocated (and its names hashed) before
//! any record body is filled in. A slot's index is its position and never
//! changes; slots are never removed.
//!
//! # Growth Policy
//!
//! The logical allocation grows only when a batch does not fit:
//! - the first batch allocates exactly what it asks for
//! - small batches (up to [`SMALL_BATCH`] slots) grow by twice the request
//!   plus [`SMALL_BATCH_PADDING`]
//! - larger batches grow by exactly the request

use std::ops::{Index, IndexMut, Range};

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Largest batch that is over-allocated.
pub const SMALL_BATCH: usize = 50;

/// Extra slots added on top of a doubled small batch.
pub const SMALL_BATCH_PADDING: usize = 32;

/// A growable array of records whose index equals their position.
///
/// # Example
///
/// ```
/// use framedef_index::EntityTable;
///
/// let mut table: EntityTable<(usize, &str)> = EntityTable::new();
/// let slots = table.reserve_with(3, |index| (index, "")).unwrap();
///
/// assert_eq!(slots, 0..3);
/// assert_eq!(table[2].0, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTable<T> {
    items: Vec<T>,
    /// Logical allocation tracked independently of `Vec` capacity.
    allocated: usize,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            allocated: 0,
        }
    }

    /// Appends `count` fresh slots, building each with `init(index)`.
    ///
    /// Returns the range of new indices.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::OutOfMemory`] if the backing storage cannot be
    /// grown. The table is left unchanged in that case.
    pub fn reserve_with<F>(&mut self, count: usize, mut init: F) -> Result<Range<usize>, TableError>
    where
        F: FnMut(usize) -> T,
    {
        let first = self.items.len();
        if count == 0 {
            return Ok(first..first);
        }

        self.grow_allocation(count)?;
        self.items.extend((first..first + count).map(&mut init));

        Ok(first..first + count)
    }

    /// Appends one record and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::OutOfMemory`] if the backing storage cannot be
    /// grown.
    pub fn push(&mut self, item: T) -> Result<usize, TableError> {
        self.grow_allocation(1)?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    fn grow_allocation(&mut self, count: usize) -> Result<(), TableError> {
        let needed = self.items.len() + count;
        if self.allocated != 0 && needed <= self.allocated {
            return Ok(());
        }

        let allocated = if self.allocated == 0 {
            count
        } else if count <= SMALL_BATCH {
            self.allocated + count * 2 + SMALL_BATCH_PADDING
        } else {
            self.allocated + count
        };

        self.items
            .try_reserve_exact(allocated - self.items.len())
            .map_err(|_| TableError::OutOfMemory { requested: count })?;
        tracing::trace!(from = self.allocated, to = allocated, "grew entity table");
        self.allocated = allocated;
        Ok(())
    }

    /// Returns the number of claimed slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the table has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the logical allocation (slots that fit without regrowing).
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Returns the record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the record at `index` mutably.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Iterates records in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterates records mutably in index order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Index<usize> for EntityTable<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for EntityTable<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a EntityTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
