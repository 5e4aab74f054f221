//! Misc-field resolution.
//!
//! `misc1` and `misc2` hold a single integer whose meaning depends on the
//! action that reads it: a thing id, a sound id, a fixed-point distance,
//! flag bits and so on. The text form lets authors write the reference
//! rather than the number:
//!
//! - `prefix:value` resolves `value` in the named namespace
//! - a complete number is used as written (with a `.` it is fixed-point)
//! - any other name is tried as a thing, frame, sound, string and code
//!   pointer, in that order
//!
//! Nothing here fails a load. Unresolvable text becomes a fallback value
//! and a [`LoadWarning`].

use crate::error::{LoadLog, LoadWarning, NamespaceKind};
use crate::fixed::Fixed;
use crate::flags::{parse_flags_single, FlagWord};
use crate::keywords::{keyword_index, MISC_PREFIXES};
use crate::lexical::{parse_double, parse_long_exact, saturate_i32};
use crate::namespace::Namespaces;

/// Namespace named by a misc-field prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscPrefix {
    /// `frame:`
    Frame,
    /// `thing:`
    Thing,
    /// `sound:`
    Sound,
    /// `flags:` through `flags4:`
    Flags(FlagWord),
    /// `bexptr:`
    BexPtr,
    /// `string:`
    String,
}

impl MiscPrefix {
    const ORDER: [Self; 9] = [
        Self::Frame,
        Self::Thing,
        Self::Sound,
        Self::Flags(FlagWord::Flags),
        Self::Flags(FlagWord::Flags2),
        Self::Flags(FlagWord::Flags3),
        Self::Flags(FlagWord::Flags4),
        Self::BexPtr,
        Self::String,
    ];

    /// Looks a prefix up (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        keyword_index(MISC_PREFIXES, name).and_then(|i| Self::ORDER.get(i).copied())
    }
}

fn slot_value(slot: usize) -> i32 {
    i32::try_from(slot).unwrap_or(i32::MAX)
}

#[allow(clippy::cast_possible_wrap)]
fn bits_value(bits: u32) -> i32 {
    bits as i32
}

/// Resolves a misc-field token to its integer value.
///
/// # Example
///
/// ```
/// use framedef_core::error::LoadLog;
/// use framedef_core::misc::resolve_misc;
/// use framedef_core::namespace::Namespaces;
/// use framedef_core::EngineConfig;
///
/// let mut tables = Namespaces::new(&EngineConfig::default()).unwrap();
/// let mut log = LoadLog::new();
///
/// assert_eq!(resolve_misc(&mut tables, &mut log, "0x20"), 32);
/// assert_eq!(resolve_misc(&mut tables, &mut log, "1.5"), 0x18000);
/// assert_eq!(resolve_misc(&mut tables, &mut log, "flags:SOLID|SHOOTABLE"), 0x6);
/// assert!(log.is_empty());
/// ```
pub fn resolve_misc(tables: &mut Namespaces, log: &mut LoadLog, token: &str) -> i32 {
    if let Some((prefix, value)) = token.split_once(':') {
        return resolve_prefixed(tables, log, token, prefix, value);
    }

    if let Some(number) = parse_misc_number(token) {
        return number;
    }

    resolve_bare(tables, log, token)
}

/// Parses a misc token that is entirely numeric.
///
/// Tokens with a `.` are fixed-point; others use `strtol` base detection.
#[must_use]
pub fn parse_misc_number(token: &str) -> Option<i32> {
    if token.contains('.') {
        match parse_double(token) {
            (value, "") => Some(Fixed::from_f64(value).raw()),
            _ => None,
        }
    } else {
        parse_long_exact(token).map(saturate_i32)
    }
}

fn resolve_prefixed(
    tables: &mut Namespaces,
    log: &mut LoadLog,
    token: &str,
    prefix: &str,
    value: &str,
) -> i32 {
    if value.is_empty() {
        log.warn(LoadWarning::EmptyMiscValue {
            token: token.to_owned(),
        });
        return 0;
    }

    let Some(kind) = MiscPrefix::from_name(prefix) else {
        log.warn(LoadWarning::UnknownMiscPrefix {
            prefix: prefix.to_owned(),
        });
        return 0;
    };

    match kind {
        MiscPrefix::Frame => match tables.states.index_of(value) {
            Some(slot) => state_value(tables, log, slot),
            None => {
                unresolved(log, NamespaceKind::State, value);
                slot_value(tables.null_state)
            }
        },
        MiscPrefix::Thing => match tables.things.index_of(value) {
            Some(slot) => thing_value(tables, log, slot),
            None => {
                unresolved(log, NamespaceKind::Thing, value);
                slot_value(tables.things.unknown())
            }
        },
        MiscPrefix::Sound => {
            let slot = tables.sounds.index_of(value).unwrap_or_else(|| {
                unresolved(log, NamespaceKind::Sound, value);
                tables.sounds.null()
            });
            sound_value(tables, log, slot)
        }
        MiscPrefix::Flags(word) => bits_value(parse_flags_single(value, word)),
        MiscPrefix::BexPtr => match tables.code_pointers.index_of(value) {
            Some(index) => slot_value(index),
            None => {
                unresolved(log, NamespaceKind::BexPtr, value);
                slot_value(tables.code_pointers.null_index())
            }
        },
        MiscPrefix::String => string_value(tables, log, value),
    }
}

fn resolve_bare(tables: &mut Namespaces, log: &mut LoadLog, token: &str) -> i32 {
    if let Some(slot) = tables.things.index_of(token) {
        thing_value(tables, log, slot)
    } else if let Some(slot) = tables.states.index_of(token) {
        state_value(tables, log, slot)
    } else if let Some(slot) = tables.sounds.index_of(token) {
        sound_value(tables, log, slot)
    } else if tables.strings.index_of(token).is_some() {
        string_value(tables, log, token)
    } else if let Some(index) = tables.code_pointers.index_of(token) {
        slot_value(index)
    } else {
        log.warn(LoadWarning::UnresolvedMisc {
            token: token.to_owned(),
        });
        0
    }
}

// ===== Per-namespace values =====

fn unresolved(log: &mut LoadLog, namespace: NamespaceKind, name: &str) {
    log.warn(LoadWarning::UnresolvedReference {
        namespace,
        name: name.to_owned(),
    });
}

fn exhausted(log: &mut LoadLog, namespace: NamespaceKind, name: &str) {
    log.warn(LoadWarning::AllocatorExhausted {
        namespace,
        name: name.to_owned(),
    });
}

fn state_value(tables: &mut Namespaces, log: &mut LoadLog, slot: usize) -> i32 {
    match tables.states.ensure_number(slot) {
        Ok(number) => number,
        Err(_) => {
            let name = tables.states.get(slot).map(|s| s.name.clone()).unwrap_or_default();
            exhausted(log, NamespaceKind::State, &name);
            slot_value(tables.null_state)
        }
    }
}

fn thing_value(tables: &mut Namespaces, log: &mut LoadLog, slot: usize) -> i32 {
    match tables.things.ensure_number(slot) {
        Ok(number) => number,
        Err(_) => {
            let name = tables.things.get(slot).map(|t| t.name.clone()).unwrap_or_default();
            exhausted(log, NamespaceKind::Thing, &name);
            slot_value(tables.things.unknown())
        }
    }
}

fn sound_value(tables: &mut Namespaces, log: &mut LoadLog, slot: usize) -> i32 {
    match tables.sounds.ensure_number(slot) {
        Ok(number) => number,
        Err(_) => {
            let name = tables.sounds.get(slot).map(|s| s.mnemonic.clone()).unwrap_or_default();
            exhausted(log, NamespaceKind::Sound, &name);
            0
        }
    }
}

fn string_value(tables: &Namespaces, log: &mut LoadLog, name: &str) -> i32 {
    let numkey = tables
        .strings
        .index_of(name)
        .and_then(|slot| tables.strings.get(slot))
        .map_or(-1, |s| s.numkey);
    if numkey < 0 {
        unresolved(log, NamespaceKind::String, name);
        0
    } else {
        numkey
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::namespace::{EdfString, Sound, ThingType};
    use crate::state::State;
    use framedef_index::IdAllocator;

    fn tables() -> Namespaces {
        let mut tables = Namespaces::new(&EngineConfig::default()).unwrap();
        tables.things.define(ThingType::new("ZombieMan", 2)).unwrap();
        tables.things.define(ThingType::new("Imp", -1)).unwrap();
        tables.sounds.define(Sound::new("pistol", 1)).unwrap();
        tables.sounds.define(Sound::new("quiet", -1)).unwrap();
        tables.strings.define(EdfString::new("HELLO", 42, "hi")).unwrap();
        tables.strings.define(EdfString::new("NOKEY", -1, "")).unwrap();
        let states = &mut tables.states;
        states.define(State::new(0, "S_NULL", 0)).unwrap();
        states.define(State::new(1, "S_SPAWN", -1)).unwrap();
        tables
    }

    fn resolve(tables: &mut Namespaces, token: &str) -> (i32, LoadLog) {
        let mut log = LoadLog::new();
        let value = resolve_misc(tables, &mut log, token);
        (value, log)
    }

    mod number_tests {
        use super::*;

        #[test]
        fn integers_use_base_detection() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "42").0, 42);
            assert_eq!(resolve(&mut t, "-7").0, -7);
            assert_eq!(resolve(&mut t, "0x10").0, 16);
            assert_eq!(resolve(&mut t, "010").0, 8);
        }

        #[test]
        fn decimals_are_fixed_point() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "0.5").0, 0x8000);
            assert_eq!(resolve(&mut t, "-2.25").0, -0x24000);
        }

        #[test]
        fn empty_token_is_zero() {
            let mut t = tables();
            let (value, log) = resolve(&mut t, "");
            assert_eq!(value, 0);
            assert!(log.is_empty());
        }
    }

    mod prefix_tests {
        use super::*;

        #[test]
        fn thing_prefix_allocates_missing_ids() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "thing:ZombieMan").0, 2);
            let (imp, log) = resolve(&mut t, "THING:imp");
            assert_eq!(imp, i32::MAX);
            assert!(log.is_empty());
            assert_eq!(t.things.index_for_number(i32::MAX), t.things.index_of("Imp"));
        }

        #[test]
        fn unknown_thing_falls_back() {
            let mut t = tables();
            let (value, log) = resolve(&mut t, "thing:Cyberdemon");
            assert_eq!(value, slot_value(t.things.unknown()));
            assert!(matches!(
                log.warnings(),
                [LoadWarning::UnresolvedReference { namespace: NamespaceKind::Thing, .. }]
            ));
        }

        #[test]
        fn frame_prefix() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "frame:S_NULL").0, 0);
            assert_eq!(resolve(&mut t, "frame:S_SPAWN").0, i32::MAX);
            let (missing, log) = resolve(&mut t, "frame:S_GONE");
            assert_eq!(missing, slot_value(t.null_state));
            assert_eq!(log.len(), 1);
        }

        #[test]
        fn sound_prefix_falls_back_to_null_sound() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "sound:pistol").0, 1);
            let (value, log) = resolve(&mut t, "sound:bfg");
            assert_eq!(value, 0);
            assert_eq!(log.len(), 1);
        }

        #[test]
        fn exhausted_allocator_warns() {
            let mut t = tables();
            t.sounds.namespace_mut().set_allocator(IdAllocator::starting_at(-1));

            let (value, log) = resolve(&mut t, "sound:quiet");
            assert_eq!(value, 0);
            assert!(matches!(log.warnings(), [LoadWarning::AllocatorExhausted { .. }]));
        }

        #[test]
        fn flag_prefixes_pick_a_word() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "flags:SOLID").0, 0x2);
            assert_eq!(resolve(&mut t, "flags2:LOGRAV").0, 0x1);
            assert_eq!(resolve(&mut t, "flags:BOGUS").0, 0);
        }

        #[test]
        fn bexptr_prefix() {
            let mut t = tables();
            let look = t.code_pointers.index_of("Look").unwrap();
            assert_eq!(resolve(&mut t, "bexptr:A_Look").0, slot_value(look));
            let (value, log) = resolve(&mut t, "bexptr:A_Nothing");
            assert_eq!(value, slot_value(t.code_pointers.null_index()));
            assert_eq!(log.len(), 1);
        }

        #[test]
        fn string_prefix_needs_a_numkey() {
            let mut t = tables();
            assert_eq!(resolve(&mut t, "string:HELLO").0, 42);
            let (value, log) = resolve(&mut t, "string:NOKEY");
            assert_eq!(value, 0);
            assert_eq!(log.len(), 1);
        }

        #[test]
        fn malformed_prefixes() {
            let mut t = tables();
            let (value, log) = resolve(&mut t, "colour:red");
            assert_eq!(value, 0);
            assert!(matches!(log.warnings(), [LoadWarning::UnknownMiscPrefix { prefix }] if prefix == "colour"));

            let (value, log) = resolve(&mut t, "thing:");
            assert_eq!(value, 0);
            assert!(matches!(log.warnings(), [LoadWarning::EmptyMiscValue { .. }]));
        }
    }

    mod bare_name_tests {
        use super::*;

        #[test]
        fn namespace_precedence() {
            let mut t = tables();
            // A sound and a thing share a name: the thing wins.
            t.sounds.define(Sound::new("ZombieMan", 77)).unwrap();
            assert_eq!(resolve(&mut t, "ZombieMan").0, 2);
            assert_eq!(resolve(&mut t, "pistol").0, 1);
            assert_eq!(resolve(&mut t, "HELLO").0, 42);
            assert_eq!(resolve(&mut t, "S_NULL").0, 0);
        }

        #[test]
        fn code_pointers_come_last() {
            let mut t = tables();
            let chase = t.code_pointers.index_of("Chase").unwrap();
            assert_eq!(resolve(&mut t, "A_Chase").0, slot_value(chase));
        }

        #[test]
        fn unmatched_name_warns() {
            let mut t = tables();
            let (value, log) = resolve(&mut t, "Nonsense");
            assert_eq!(value, 0);
            assert!(matches!(log.warnings(), [LoadWarning::UnresolvedMisc { token }] if token == "Nonsense"));
        }
    }
}
