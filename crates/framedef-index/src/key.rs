//! Key types stored in chained indexes.
//!
//! Two flavours of key are provided:
//! - [`NameKey`]: case-insensitive mnemonic, hashed with a case-folding sdbm hash
//! - [`NumKey`]: legacy numeric id, hashed by value
//!
//! Both implement [`ChainKey`], which is all a [`ChainIndex`](crate::ChainIndex)
//! needs to place and find keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key that can be stored in a [`ChainIndex`](crate::ChainIndex).
///
/// Lookups go through the borrowed [`ChainKey::Query`] form so callers can
/// search with `&str` or a bare integer without building an owned key.
pub trait ChainKey {
    /// Borrowed form used for lookups.
    type Query: ?Sized;

    /// Computes the raw hash of a query. The index reduces it modulo its
    /// chain count.
    fn hash_query(query: &Self::Query) -> u32;

    /// Returns true if this key matches the query.
    fn matches(&self, query: &Self::Query) -> bool;

    /// Borrows this key in its query form.
    fn as_query(&self) -> &Self::Query;
}

/// Case-folding sdbm hash used for every mnemonic index.
///
/// Two strings that differ only in ASCII case hash identically.
///
/// # Example
///
/// ```
/// use framedef_index::key::name_hash;
///
/// assert_eq!(name_hash("S_NULL"), name_hash("s_null"));
/// assert_ne!(name_hash("S_NULL"), name_hash("S_PLAY"));
/// ```
#[must_use]
pub fn name_hash(name: &str) -> u32 {
    name.bytes().fold(0u32, |h, c| {
        u32::from(c.to_ascii_uppercase())
            .wrapping_add(h << 6)
            .wrapping_add(h << 16)
            .wrapping_sub(h)
    })
}

// =============================================================================
// Name Key
// =============================================================================

/// A case-insensitive mnemonic key.
///
/// The original spelling is preserved; only comparisons ignore case.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameKey(String);

impl NameKey {
    /// Creates a key from a mnemonic.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the mnemonic with its original spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ChainKey for NameKey {
    type Query = str;

    fn hash_query(query: &str) -> u32 {
        name_hash(query)
    }

    fn matches(&self, query: &str) -> bool {
        self.0.eq_ignore_ascii_case(query)
    }

    fn as_query(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({:?})", self.0)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Numeric Key
// =============================================================================

/// A legacy numeric id key.
///
/// Numeric keys are not required to be unique; the index hands back the
/// most recently inserted owner.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumKey(i32);

impl NumKey {
    /// Creates a key from a legacy id.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl ChainKey for NumKey {
    type Query = i32;

    #[allow(clippy::cast_sign_loss)]
    fn hash_query(query: &i32) -> u32 {
        *query as u32
    }

    fn matches(&self, query: &i32) -> bool {
        self.0 == *query
    }

    fn as_query(&self) -> &i32 {
        &self.0
    }
}

impl fmt::Debug for NumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumKey({})", self.0)
    }
}
