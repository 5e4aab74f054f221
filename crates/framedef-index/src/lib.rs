//! # Framedef Index
//!
//! Storage substrate for data-driven definition tables.
//!
//! Definition tables are filled from configuration text in batches and
//! referenced from everywhere by stable integer index, by mnemonic name, or
//! by a legacy numeric id. This crate provides the pieces that keep those
//! three views consistent:
//!
//! - **[`EntityTable`]**: growable array whose slots keep their index forever
//! - **[`ChainIndex`]**: chained hash index with per-slot links and
//!   newest-first lookup
//! - **[`IdAllocator`]**: high-to-low legacy id pool for records defined
//!   without one
//! - **[`Registry`]**: name index + id index + allocator for one namespace
//!
//! ## Quick Start
//!
//! ```
//! use framedef_index::{EntityTable, Registry};
//!
//! let mut table: EntityTable<String> = EntityTable::new();
//! let mut registry = Registry::new(31);
//!
//! for (slot, name) in table.reserve_with(2, |_| String::new()).unwrap().zip(["S_NULL", "S_SPAWN"]) {
//!     table[slot] = name.to_owned();
//!     registry.insert_name(slot, name).unwrap();
//! }
//!
//! assert_eq!(registry.slot_for_name("s_spawn"), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alloc;
pub mod chain;
pub mod error;
pub mod key;
pub mod registry;
pub mod table;

// Re-exports for convenience
pub use alloc::IdAllocator;
pub use chain::ChainIndex;
pub use error::{AllocError, IndexError, TableError};
pub use key::{ChainKey, NameKey, NumKey};
pub use registry::Registry;
pub use table::EntityTable;
