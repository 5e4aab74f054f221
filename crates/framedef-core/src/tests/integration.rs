//! Integration tests for whole loads.
//!
//! These tests drive [`Engine::load`] with complete batches and check the
//! resulting frames, covering:
//! - Packed (`cmp`) definitions in both argument syntaxes
//! - Legacy id auto-numbering and most-recent-wins lookups
//! - Deltas and reloads
//! - Fatal errors and recoverable warnings
//! - Typed argument reads through the engine

use crate::flags::{FlagSet, FlagWord};
use crate::fixed::{Angle, Fixed};
use crate::section::ConfigBatch;
use crate::state::{ParticleEvent, StateFlags};
use crate::{Engine, EngineConfig, LoadError, LoadPhase, LoadWarning};

use super::helpers::{
    arg_texts, base_batch, batch_with, cmp_frame, delta, frame, init_tracing, loaded, state,
};

// =============================================================================
// Packed Definitions
// =============================================================================

#[test]
fn test_cmp_scenario() {
    let engine = loaded(&batch_with([
        cmp_frame("S_FOO1", "PLAY|A|*|5|A_Look|S_FOO2|*|thing:ZOMBIEMAN|*"),
        frame("S_FOO2"),
    ]));

    let foo = state(&engine, "S_FOO1");
    assert_eq!(engine.sprites().name(foo.sprite), Some("PLAY"));
    assert_eq!(foo.frame_number(), 0);
    assert!(!foo.is_fullbright());
    assert_eq!(foo.tics, 5);
    assert_eq!(foo.action, engine.code_pointers().index_of("A_Look"));
    assert_eq!(Some(foo.nextstate), engine.lookup_by_name("S_FOO2"));
    assert_eq!(foo.particle_event, ParticleEvent::None);
    assert_eq!(foo.misc1, 2);
    assert_eq!(foo.misc2, 0);
    assert_eq!(foo.argument_count(), 0);
    assert!(engine.warnings().is_empty());
}

#[test]
fn test_cmp_nextframe_creates_placeholder() {
    let engine = loaded(&batch_with([cmp_frame(
        "S_FOO1",
        "PLAY|A|*|5|A_Look|S_FOO2|*|thing:ZOMBIEMAN|*",
    )]));

    let foo2 = engine.lookup_by_name("S_FOO2");
    assert!(foo2.is_some());
    assert_eq!(Some(state(&engine, "S_FOO1").nextstate), foo2);
    assert_eq!(Some(state(&engine, "S_FOO2").nextstate), engine.null_state());
    assert!(matches!(
        engine.warnings(),
        [LoadWarning::ImplicitState { frame, target }] if frame == "S_FOO1" && target == "S_FOO2"
    ));
}

#[test]
fn test_cmp_misc_auto_numbers_thing() {
    let engine = loaded(&batch_with([cmp_frame(
        "S_IMP",
        "TROO|A|*|5|*|*|*|thing:DoomImp|sound:claw",
    )]));

    let imp = state(&engine, "S_IMP");
    assert_eq!(imp.misc1, i32::MAX);
    assert_eq!(
        engine.things().index_for_number(i32::MAX),
        engine.things().index_of("DoomImp")
    );
    assert_eq!(imp.misc2, i32::MAX);
    assert_eq!(
        engine.sounds().index_for_number(i32::MAX),
        engine.sounds().index_of("claw")
    );
}

#[test]
fn test_legacy_and_modern_syntax_agree() {
    let engine = loaded(&batch_with([
        cmp_frame(
            "S_LEGACY",
            "SARG|A|*|8|A_Chase|S_NULL|*|*|*|thing:DoomImp|sound:pistol|*|0x10",
        ),
        cmp_frame(
            "S_MODERN",
            "SARG|A|*|8|A_Chase(thing:DoomImp, sound:pistol, *, 0x10)|S_NULL",
        ),
    ]));

    assert_eq!(arg_texts(&engine, "S_LEGACY"), ["DoomImp", "pistol", "", "0x10"]);
    assert_eq!(arg_texts(&engine, "S_LEGACY"), arg_texts(&engine, "S_MODERN"));

    let legacy = engine.lookup_by_name("S_LEGACY").unwrap();
    let modern = engine.lookup_by_name("S_MODERN").unwrap();
    let imp = engine.things().index_of("DoomImp").unwrap();
    for index in [legacy, modern] {
        assert_eq!(engine.arg_as_thing(index, 0, 0), imp);
        assert_eq!(engine.arg_as_sound(index, 1, None), engine.sounds().index_of("pistol"));
        assert_eq!(engine.arg_as_int(index, 2, 9), 0);
        assert_eq!(engine.arg_as_int(index, 3, 0), 16);
    }

    let (a, b) = (state(&engine, "S_LEGACY"), state(&engine, "S_MODERN"));
    assert_eq!((a.sprite, a.frame, a.tics), (b.sprite, b.frame, b.tics));
    assert_eq!((a.action, a.nextstate), (b.action, b.nextstate));
}

#[test]
fn test_cmp_argument_overflow_warns() {
    let inner: Vec<String> = (0..20).map(|i| i.to_string()).collect();
    let packed = format!("*|*|*|*|A_Look({})", inner.join(","));
    let engine = loaded(&batch_with([cmp_frame("S_MANY", &packed)]));

    assert_eq!(state(&engine, "S_MANY").argument_count(), crate::MAX_ARGS);
    assert!(matches!(
        engine.warnings(),
        [LoadWarning::DroppedArguments { count: 4, .. }]
    ));
}

// =============================================================================
// Legacy Ids
// =============================================================================

#[test]
fn test_two_auto_numbered_states() {
    let engine = loaded(&batch_with([
        frame("S_A"),
        frame("S_B"),
        frame("S_REF")
            .with("misc1", "frame:S_A")
            .with("misc2", "frame:S_B"),
    ]));

    let refs = state(&engine, "S_REF");
    assert_eq!(refs.misc1, i32::MAX);
    assert_eq!(refs.misc2, i32::MAX - 1);
    assert_eq!(engine.lookup_by_legacy_id(refs.misc1), engine.lookup_by_name("S_A"));
    assert_eq!(engine.lookup_by_legacy_id(refs.misc2), engine.lookup_by_name("S_B"));
    assert_eq!(state(&engine, "S_A").dehnum, i32::MAX);
}

#[test]
fn test_legacy_id_most_recent_wins_across_loads() {
    let mut engine = loaded(&batch_with([frame("S_ONE").with("dehackednum", 10)]));
    let one = engine.lookup_by_name("S_ONE").unwrap();

    let mut second = ConfigBatch::new();
    second.frames.push(frame("S_TWO").with("dehackednum", 10));
    engine.load(&second).unwrap();
    let two = engine.lookup_by_name("S_TWO").unwrap();
    assert_eq!(engine.lookup_by_legacy_id(10), Some(two));

    let mut third = ConfigBatch::new();
    third.frames.push(frame("S_ONE").with("dehackednum", 12));
    engine.load(&third).unwrap();
    assert_eq!(engine.lookup_by_name("S_ONE"), Some(one));
    assert_eq!(engine.lookup_by_legacy_id(12), Some(one));
    assert_eq!(engine.lookup_by_legacy_id(10), Some(two));
    assert_eq!(engine.state(one).map(|s| s.dehnum), Some(12));
}

// =============================================================================
// Deltas and Reloads
// =============================================================================

#[test]
fn test_tics_only_delta_leaves_other_fields() {
    let mut engine = loaded(&batch_with([cmp_frame(
        "S_WALK",
        "POSS|B|*|4|A_Chase(1, 2)|@this",
    )]));

    let mut edit = ConfigBatch::new();
    edit.framedeltas.push(delta("S_WALK").with("tics", 9));
    engine.load(&edit).unwrap();

    let walk = state(&engine, "S_WALK");
    assert_eq!(walk.tics, 9);
    assert_eq!(engine.sprites().name(walk.sprite), Some("POSS"));
    assert_eq!(walk.frame_number(), 1);
    assert_eq!(walk.action, engine.code_pointers().index_of("Chase"));
    assert_eq!(walk.nextstate, walk.index);
    assert_eq!(arg_texts(&engine, "S_WALK"), ["1", "2"]);
}

#[test]
fn test_delta_args_replace_whole_list() {
    let mut batch = batch_with([cmp_frame("S_X", "*|*|*|*|A_Look(1, 2, 3)")]);
    batch
        .framedeltas
        .push(delta("S_X").with("args", ["thing:ZombieMan"]));
    let engine = loaded(&batch);

    assert_eq!(arg_texts(&engine, "S_X"), ["ZombieMan"]);
}

#[test]
fn test_decorate_reservation() {
    let mut engine = loaded(&batch_with([frame("S_DEC")
        .with("decorate", true)
        .with("sprite", "TROO")
        .with("misc1", "thing:ZombieMan")]));

    let dec = state(&engine, "S_DEC");
    assert!(dec.flags.contains(StateFlags::DECORATE));
    assert_eq!(dec.sprite, engine.sprites().blank());
    assert_eq!(dec.misc1, 2);

    let mut redefine = ConfigBatch::new();
    redefine.frames.push(frame("S_DEC").with("tics", 3));
    engine.load(&redefine).unwrap();
    let dec = state(&engine, "S_DEC");
    assert!(!dec.flags.contains(StateFlags::DECORATE));
    assert_eq!(dec.tics, 3);
}

#[test]
fn test_nextframe_forms() {
    let engine = loaded(&batch_with([
        frame("S_A").with("nextframe", "0"),
        frame("S_B").with("nextframe", "@prev"),
        frame("S_C").with("nextframe", "@NULL"),
        frame("S_D").with("nextframe", "s_a"),
    ]));

    let a = engine.lookup_by_name("S_A").unwrap();
    assert_eq!(Some(state(&engine, "S_A").nextstate), engine.null_state());
    assert_eq!(state(&engine, "S_B").nextstate, a);
    assert_eq!(Some(state(&engine, "S_C").nextstate), engine.null_state());
    assert_eq!(state(&engine, "S_D").nextstate, a);
}

#[test]
fn test_placeholder_is_filled_by_later_load() {
    let mut engine = loaded(&batch_with([frame("S_A").with("nextframe", "S_LATER")]));
    let later = engine.lookup_by_name("S_LATER").unwrap();
    assert!(matches!(
        engine.warnings(),
        [LoadWarning::ImplicitState { target, .. }] if target == "S_LATER"
    ));

    let mut fill = ConfigBatch::new();
    fill.frames.push(frame("S_LATER").with("tics", 3));
    engine.load(&fill).unwrap();

    assert_eq!(engine.lookup_by_name("S_LATER"), Some(later));
    assert_eq!(engine.state(later).map(|s| s.tics), Some(3));
}

// =============================================================================
// Errors and Warnings
// =============================================================================

#[test]
fn test_fatal_errors_abandon_load() {
    init_tracing();

    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let mut no_null = ConfigBatch::new();
    no_null.frames.push(frame("S_X"));
    assert_eq!(engine.load(&no_null), Err(LoadError::MissingNullState));
    assert_eq!(engine.phase(), LoadPhase::Idle);

    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let err = engine
        .load(&batch_with([frame("S_BAD").with("action", "A_Nope")]))
        .unwrap_err();
    assert_eq!(
        err,
        LoadError::BadAction {
            frame: "S_BAD".into(),
            value: "A_Nope".into(),
        }
    );

    let mut engine = loaded(&base_batch());
    let mut stray = ConfigBatch::new();
    stray.framedeltas.push(delta("S_NOWHERE").with("tics", 1));
    assert_eq!(
        engine.load(&stray),
        Err(LoadError::UnknownDeltaTarget("S_NOWHERE".into()))
    );
}

#[test]
fn test_failed_first_load_leaves_no_null_state() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let mut no_null = ConfigBatch::new();
    no_null.frames.push(frame("S_X").with("dehackednum", 99));
    assert_eq!(engine.load(&no_null), Err(LoadError::MissingNullState));

    assert_eq!(engine.state_count(), 0);
    assert_eq!(engine.lookup_by_name("S_X"), None);
    assert_eq!(engine.null_state(), None);
    assert_eq!(engine.lookup_by_legacy_id(99), None);

    engine.load(&base_batch()).unwrap();
    let null = engine.lookup_by_name("S_NULL");
    assert!(null.is_some());
    assert_eq!(engine.null_state(), null);
    assert_eq!(engine.lookup_by_legacy_id(99), null);
    assert_eq!(engine.lookup_by_name("S_X"), None);
}

#[test]
fn test_recoverable_problems_are_logged() {
    let engine = loaded(&batch_with([
        frame("S_W1").with("misc1", "Nonsense"),
        frame("S_W2").with("misc2", "thing:Nobody"),
        frame("S_W3").with("sprite", "TOOLONG"),
    ]));

    assert_eq!(engine.phase(), LoadPhase::Applied);
    let warnings = engine.warnings();
    assert_eq!(warnings.len(), 3);
    assert!(matches!(warnings[0], LoadWarning::UnresolvedMisc { .. }));
    assert!(matches!(warnings[1], LoadWarning::UnresolvedReference { .. }));
    assert!(matches!(warnings[2], LoadWarning::UndefinableSprite { .. }));
    assert_eq!(state(&engine, "S_W2").misc2, i32::try_from(engine.things().unknown()).unwrap());
}

// =============================================================================
// Typed Argument Reads
// =============================================================================

#[test]
fn test_argument_reads_are_cached() {
    let mut engine = loaded(&batch_with([cmp_frame(
        "S_ARGS",
        "*|*|*|*|A_Look(12, S_NULL, pistol, SOLID+SHOOTABLE, fast, 90)",
    )]));
    let s = engine.lookup_by_name("S_ARGS").unwrap();
    assert_eq!(engine.argument_evaluations(), 0);

    assert_eq!(engine.arg_as_int(s, 0, 0), 12);
    assert_eq!(engine.arg_as_int(s, 0, 0), 12);
    assert_eq!(engine.argument_evaluations(), 1);

    assert_eq!(Some(engine.arg_as_state(s, 1, 99)), engine.null_state());
    assert_eq!(engine.arg_as_sound(s, 2, None), engine.sounds().index_of("pistol"));
    assert_eq!(engine.arg_as_flags(s, 3, FlagSet::EMPTY).word(FlagWord::Flags), 0x6);
    assert_eq!(engine.arg_as_keyword(s, 4, &["slow", "fast"], -1), 1);
    assert_eq!(engine.arg_as_angle(s, 5, Angle(0)), Angle::ANG90);
    assert_eq!(engine.argument_evaluations(), 6);

    engine.reset_all_argument_caches();
    assert_eq!(engine.arg_as_int(s, 0, 0), 12);
    assert_eq!(engine.argument_evaluations(), 7);

    engine.set_arg(s, 0, "13").unwrap();
    assert_eq!(engine.arg_as_int(s, 0, 0), 13);
    assert_eq!(engine.arg_as_fixed(s, 5, Fixed::ZERO), Fixed(90 << 16));
    assert_eq!(engine.arg_as_int(s, 40, -3), -3);
}

#[test]
fn test_string_and_bexptr_arguments() {
    let engine = loaded(&batch_with([
        frame("S_S").with("args", ["GREETING", "7", "A_Chase", "string:NOPE"]),
    ]));
    let s = engine.lookup_by_name("S_S").unwrap();
    let greeting = engine.strings().index_of("GREETING");

    assert_eq!(engine.arg_as_edf_string(s, 0, None), greeting);
    assert_eq!(engine.arg_as_edf_string(s, 1, None), greeting);
    assert_eq!(engine.arg_as_bexptr(s, 2), engine.code_pointers().index_of("Chase"));
    assert_eq!(engine.arg_as_edf_string(s, 3, None), None);
}

// =============================================================================
// Serialized Batches
// =============================================================================

#[test]
fn test_batch_from_json() {
    let json = r#"{
        "thingtypes": [{ "title": "Imp", "fields": { "dehackednum": 31 } }],
        "frames": [
            { "title": "S_NULL" },
            {
                "title": "S_IMP",
                "fields": {
                    "sprite": "TROO",
                    "spriteframe": "B",
                    "tics": 8,
                    "action": "A_Chase",
                    "nextframe": "S_IMP",
                    "args": ["thing:Imp", "2"],
                    "SKILL5FAST": true
                }
            }
        ],
        "framedeltas": [{ "title": "", "fields": { "name": "S_IMP", "misc1": "thing:Imp" } }]
    }"#;
    let batch: ConfigBatch = serde_json::from_str(json).unwrap();
    let engine = loaded(&batch);

    let imp = state(&engine, "S_IMP");
    assert_eq!(imp.frame_number(), 1);
    assert_eq!(imp.tics, 8);
    assert_eq!(imp.nextstate, imp.index);
    assert_eq!(imp.flags, StateFlags::SKILL5FAST);
    assert_eq!(imp.misc1, 31);
    assert_eq!(arg_texts(&engine, "S_IMP"), ["Imp", "2"]);
}
