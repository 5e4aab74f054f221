//! Chained hash index over slot numbers.
//!
//! A [`ChainIndex`] maps keys to slots of some external table. Each slot
//! owns at most one link (its key and the slot that follows it in the same
//! chain), so no wrapper nodes are allocated per entry and a slot can never
//! be reachable from two chains at once.
//!
//! # Ordering
//!
//! Insertion pushes onto the head of a chain, so lookups walk from the most
//! recently inserted entry backwards. When several slots share a key (legal
//! for numeric ids) the newest one wins.
//!
//! # Re-keying
//!
//! A slot's key must never be changed in place. Call [`ChainIndex::remove`]
//! first and then [`ChainIndex::insert`] with the new key; inserting a slot
//! that is still linked is rejected with [`IndexError::AlreadyLinked`].
//!
//! # Example
//!
//! ```
//! use framedef_index::{ChainIndex, NumKey};
//!
//! let mut index = ChainIndex::with_chains(7);
//! index.insert(0, NumKey::new(42)).unwrap();
//! index.insert(1, NumKey::new(42)).unwrap();
//!
//! // Most recent owner of a shared id wins.
//! assert_eq!(index.lookup(&42), Some(1));
//!
//! index.remove(1);
//! assert_eq!(index.lookup(&42), Some(0));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::key::ChainKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Link<K> {
    key: K,
    next: Option<usize>,
}

/// A fixed-size bucket array of index-linked chains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainIndex<K> {
    /// Head slot of each chain.
    chains: Vec<Option<usize>>,
    /// Link owned by each slot, `None` if the slot is not indexed.
    links: Vec<Option<Link<K>>>,
    /// Number of linked slots.
    len: usize,
}

impl<K: ChainKey> ChainIndex<K> {
    /// Creates an empty index with `count` chains (at least one).
    #[must_use]
    pub fn with_chains(count: usize) -> Self {
        Self {
            chains: vec![None; count.max(1)],
            links: Vec::new(),
            len: 0,
        }
    }

    fn chain_of(&self, query: &K::Query) -> usize {
        K::hash_query(query) as usize % self.chains.len()
    }

    /// Links `slot` under `key` at the head of its chain.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::AlreadyLinked`] if the slot is still a member of
    /// a chain.
    pub fn insert(&mut self, slot: usize, key: K) -> Result<(), IndexError> {
        if self.is_linked(slot) {
            return Err(IndexError::AlreadyLinked { slot });
        }
        if slot >= self.links.len() {
            self.links.resize_with(slot + 1, || None);
        }

        let chain = self.chain_of(key.as_query());
        self.links[slot] = Some(Link {
            key,
            next: self.chains[chain],
        });
        self.chains[chain] = Some(slot);
        self.len += 1;
        Ok(())
    }

    /// Unlinks `slot` from its chain and returns the key it was stored under.
    ///
    /// Returns `None` if the slot was not linked.
    pub fn remove(&mut self, slot: usize) -> Option<K> {
        let chain = self.chain_of(self.links.get(slot)?.as_ref()?.key.as_query());

        let mut previous: Option<usize> = None;
        let mut cursor = self.chains[chain];
        while let Some(current) = cursor {
            let next = self.links[current].as_ref().and_then(|link| link.next);
            if current == slot {
                match previous {
                    None => self.chains[chain] = next,
                    Some(prev) => {
                        if let Some(link) = self.links[prev].as_mut() {
                            link.next = next;
                        }
                    }
                }
                self.len -= 1;
                return self.links[slot].take().map(|link| link.key);
            }
            previous = cursor;
            cursor = next;
        }

        None
    }

    /// Returns the newest slot whose key matches `query`.
    #[must_use]
    pub fn lookup(&self, query: &K::Query) -> Option<usize> {
        self.matching(query).next()
    }

    /// Iterates every slot whose key matches `query`, newest first.
    pub fn matching<'a>(&'a self, query: &'a K::Query) -> impl Iterator<Item = usize> + 'a {
        ChainIter {
            links: &self.links,
            cursor: self.chains[self.chain_of(query)],
        }
        .filter(move |&slot| {
            self.links[slot]
                .as_ref()
                .is_some_and(|link| link.key.matches(query))
        })
    }

    /// Returns the key `slot` is linked under, if any.
    #[must_use]
    pub fn key_of(&self, slot: usize) -> Option<&K> {
        self.links.get(slot)?.as_ref().map(|link| &link.key)
    }

    /// Returns true if `slot` is currently a member of a chain.
    #[must_use]
    pub fn is_linked(&self, slot: usize) -> bool {
        matches!(self.links.get(slot), Some(Some(_)))
    }

    /// Returns the number of linked slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no slot is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of chains.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }
}

/// Walks one chain from its head.
struct ChainIter<'a, K> {
    links: &'a [Option<Link<K>>],
    cursor: Option<usize>,
}

impl<K> Iterator for ChainIter<'_, K> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let slot = self.cursor?;
        self.cursor = self.links.get(slot)?.as_ref().and_then(|link| link.next);
        Some(slot)
    }
}
