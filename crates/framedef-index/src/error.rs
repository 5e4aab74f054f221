//! Error types for index, table and allocator operations.

use thiserror::Error;

/// Errors raised by [`ChainIndex`](crate::ChainIndex) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The slot is already a member of a chain.
    ///
    /// A slot must be removed before it is re-inserted under a new key;
    /// inserting it twice would leave a stale link in its old chain.
    #[error("slot {slot} is already linked into the index")]
    AlreadyLinked {
        /// The offending slot.
        slot: usize,
    },
}

/// Errors raised while growing an [`EntityTable`](crate::EntityTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The backing storage could not be grown.
    #[error("out of memory growing entity table by {requested} slots")]
    OutOfMemory {
        /// Number of slots that were requested.
        requested: usize,
    },
}

/// Errors raised by legacy id allocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// Every id down to zero has been handed out or is in use.
    #[error("legacy id pool exhausted")]
    Exhausted,

    /// The freshly allocated id could not be indexed.
    #[error(transparent)]
    Index(#[from] IndexError),
}
