//! Test helper functions for building batches and loaded engines.
//!
//! This module provides section builders and setup utilities that keep the
//! scenario tests short and consistent.

use crate::section::{ConfigBatch, SectionData};
use crate::state::State;
use crate::{Engine, EngineConfig};

// =============================================================================
// Logging
// =============================================================================

/// Routes `tracing` output to the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Section Builders
// =============================================================================

/// A frame section with no fields.
pub fn frame(name: &str) -> SectionData {
    SectionData::new(name)
}

/// A frame section defined by a packed `cmp` string.
pub fn cmp_frame(name: &str, packed: &str) -> SectionData {
    SectionData::new(name).with("cmp", packed)
}

/// A framedelta section editing `target`.
pub fn delta(target: &str) -> SectionData {
    SectionData::new("framedelta").with("name", target)
}

/// A thingtype section; a negative `dehnum` leaves the field out.
pub fn thing(name: &str, dehnum: i32) -> SectionData {
    with_dehnum(SectionData::new(name), dehnum)
}

/// A sound section; a negative `dehnum` leaves the field out.
pub fn sound(name: &str, dehnum: i32) -> SectionData {
    with_dehnum(SectionData::new(name), dehnum)
}

/// A string section.
pub fn string(name: &str, numkey: i32, value: &str) -> SectionData {
    SectionData::new(name).with("num", numkey).with("val", value)
}

fn with_dehnum(section: SectionData, dehnum: i32) -> SectionData {
    if dehnum >= 0 {
        section.with("dehackednum", dehnum)
    } else {
        section
    }
}

// =============================================================================
// Batches and Engines
// =============================================================================

/// A batch with `S_NULL` (legacy id 0), two thing types, two sounds and a
/// string.
///
/// | kind  | name        | id |
/// |-------|-------------|----|
/// | thing | `ZombieMan` | 2  |
/// | thing | `DoomImp`   | -  |
/// | sound | `pistol`    | 1  |
/// | sound | `claw`      | -  |
/// | string| `GREETING`  | 7  |
pub fn base_batch() -> ConfigBatch {
    let mut batch = ConfigBatch::new();
    batch.thingtypes = vec![thing("ZombieMan", 2), thing("DoomImp", -1)];
    batch.sounds = vec![sound("pistol", 1), sound("claw", -1)];
    batch.strings = vec![string("GREETING", 7, "Hello")];
    batch.frames.push(frame("S_NULL").with("dehackednum", 0));
    batch
}

/// [`base_batch`] plus `frames`.
pub fn batch_with(frames: impl IntoIterator<Item = SectionData>) -> ConfigBatch {
    let mut batch = base_batch();
    batch.frames.extend(frames);
    batch
}

/// A fresh engine with `batch` loaded.
///
/// # Panics
///
/// Panics if the load fails.
pub fn loaded(batch: &ConfigBatch) -> Engine {
    init_tracing();
    let mut engine = Engine::new(EngineConfig::default()).expect("engine");
    engine.load(batch).expect("load");
    engine
}

/// The state named `name`.
///
/// # Panics
///
/// Panics if no such state exists.
pub fn state<'e>(engine: &'e Engine, name: &str) -> &'e State {
    let index = engine
        .lookup_by_name(name)
        .unwrap_or_else(|| panic!("no state named {name}"));
    engine.state(index).expect("state")
}

/// Argument texts of the state named `name`.
pub fn arg_texts(engine: &Engine, name: &str) -> Vec<String> {
    state(engine, name)
        .args
        .as_ref()
        .map(|args| args.texts().map(str::to_owned).collect())
        .unwrap_or_default()
}
