//! Frame collection and processing.
//!
//! A batch of frame sections is applied in two passes so frames can refer
//! to each other regardless of order:
//!
//! 1. [`Processor::collect`] gives every new name a slot and indexes it by
//!    name and legacy id. Names already in the table only have their legacy
//!    id reconciled.
//! 2. [`Processor::process_frames`] fills each frame from its section.
//!
//! [`Processor::apply_deltas`] then edits existing frames from `framedelta`
//! sections, touching only the fields each section writes.
//!
//! # Field order
//!
//! A definition fills fields in this order, with two entry points that
//! skip ahead:
//!
//! ```text
//! decorate? ──────────────────────────────────────────────┐
//! cmp? ───────────────────────────────────┐               │
//! sprite  spriteframe  fullbright  tics  action  nextframe │
//!                                         args  flags      │
//!                                                   misc1  misc2  particle_event
//! ```
//!
//! A `cmp` definition fills the frame from its packed string and then
//! treats the rest of the section as a delta. A `decorate` definition only
//! takes the misc fields and particle event.

use std::collections::HashSet;

use crate::args::ArgList;
use crate::cmp::{strip_arg_prefix, ActionCall, CmpFrame};
use crate::error::{LoadError, LoadLog, LoadWarning, Result};
use crate::keywords::{keyword_index, NEXTFRAME_SPECIALS};
use crate::lexical::{parse_long, parse_long_exact, saturate_i32};
use crate::misc::resolve_misc;
use crate::namespace::sprites::BLANK_SPRITE;
use crate::namespace::Namespaces;
use crate::section::{FieldValue, Section};
use crate::state::{ParticleEvent, State, StateFlags, FF_FULLBRIGHT, NULL_STATE, PREFIX_FLAGS};

// ===== Field keys =====

/// Reserves a frame for a thing's state block.
pub const FIELD_DECORATE: &str = "decorate";
/// Packed definition.
pub const FIELD_CMP: &str = "cmp";
/// Sprite name.
pub const FIELD_SPRITE: &str = "sprite";
/// Sprite frame letter or number.
pub const FIELD_SPRITEFRAME: &str = "spriteframe";
/// Fullbright switch.
pub const FIELD_FULLBRIGHT: &str = "fullbright";
/// Duration.
pub const FIELD_TICS: &str = "tics";
/// Code pointer, optionally with inline arguments.
pub const FIELD_ACTION: &str = "action";
/// Successor frame.
pub const FIELD_NEXTFRAME: &str = "nextframe";
/// First misc value.
pub const FIELD_MISC1: &str = "misc1";
/// Second misc value.
pub const FIELD_MISC2: &str = "misc2";
/// Particle event.
pub const FIELD_PARTICLE_EVENT: &str = "particle_event";
/// Argument list.
pub const FIELD_ARGS: &str = "args";
/// Legacy id.
pub const FIELD_DEHNUM: &str = "dehackednum";
/// Target frame of a delta.
pub const FIELD_NAME: &str = "name";

/// Parses a sprite frame: a letter `A` to `]`, or an integer.
///
/// # Example
///
/// ```
/// use framedef_core::processor::parse_sprite_frame;
///
/// assert_eq!(parse_sprite_frame("C"), Some(2));
/// assert_eq!(parse_sprite_frame("]"), Some(28));
/// assert_eq!(parse_sprite_frame("0x10"), Some(16));
/// assert_eq!(parse_sprite_frame("a"), None);
/// ```
#[must_use]
pub fn parse_sprite_frame(text: &str) -> Option<i32> {
    let mut chars = text.chars();
    if let (Some(c @ 'A'..=']'), None) = (chars.next(), chars.next()) {
        return Some(c as i32 - 'A' as i32);
    }
    parse_long_exact(text).map(saturate_i32)
}

fn dehnum_of<S: Section>(section: &S) -> i32 {
    section
        .int(FIELD_DEHNUM)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(-1)
}

/// Integer field that tolerates text, reading its leading number.
fn int_field<S: Section>(section: &S, key: &str) -> Option<i32> {
    match section.value(key)? {
        FieldValue::Int(i) => Some(saturate_i32(*i)),
        FieldValue::Bool(b) => Some(i32::from(*b)),
        FieldValue::Str(s) => Some(saturate_i32(parse_long(s).0)),
        FieldValue::List(_) => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum NextSpecial {
    Next,
    Prev,
    This,
    Null,
}

impl NextSpecial {
    const ORDER: [Self; 4] = [Self::Next, Self::Prev, Self::This, Self::Null];

    fn from_name(name: &str) -> Option<Self> {
        keyword_index(NEXTFRAME_SPECIALS, name).and_then(|i| Self::ORDER.get(i).copied())
    }
}

/// Applies frame sections to a set of namespaces.
pub struct Processor<'a> {
    tables: &'a mut Namespaces,
    log: &'a mut LoadLog,
}

impl<'a> Processor<'a> {
    /// Creates a processor writing into `tables` and reporting to `log`.
    pub fn new(tables: &'a mut Namespaces, log: &'a mut LoadLog) -> Self {
        Self { tables, log }
    }

    // ===== Collection =====

    /// Creates and indexes a slot for every new frame name.
    ///
    /// On the first load the batch must define at least one frame and
    /// `S_NULL`, which becomes the null state.
    ///
    /// # Errors
    ///
    /// [`LoadError::NoFrames`] and [`LoadError::MissingNullState`] on a
    /// first load; table and index failures at any time.
    pub fn collect<S: Section>(&mut self, frames: &[S], first_load: bool) -> Result<()> {
        let states = &mut self.tables.states;

        let mut seen = HashSet::new();
        let fresh: Vec<(&str, i32)> = frames
            .iter()
            .filter(|section| {
                states.index_of(section.title()).is_none()
                    && seen.insert(section.title().to_ascii_lowercase())
            })
            .map(|section| (section.title(), dehnum_of(section)))
            .collect();

        tracing::info!(
            "{} states defined ({} new)",
            frames.len(),
            fresh.len()
        );

        let mut pending = fresh.iter();
        let reserved = states.reserve_with(fresh.len(), |slot| {
            let (name, dehnum) = pending.next().copied().unwrap_or_default();
            State::new(slot, name, dehnum)
        })?;

        let mut unlinked = reserved;
        for section in frames {
            let dehnum = dehnum_of(section);
            if let Some(slot) = states.index_of(section.title()) {
                if states.get(slot).map(|s| s.dehnum) != Some(dehnum) {
                    states.renumber(slot, dehnum)?;
                }
            } else if let Some(slot) = unlinked.next() {
                states.link(slot)?;
            }
        }

        if first_load {
            if states.is_empty() {
                return Err(LoadError::NoFrames);
            }
            self.tables.null_state = states
                .index_of(NULL_STATE)
                .ok_or(LoadError::MissingNullState)?;
        }

        Ok(())
    }

    // ===== Processing =====

    /// Fills every collected frame from its section.
    ///
    /// # Errors
    ///
    /// Any fatal field error.
    pub fn process_frames<S: Section>(&mut self, frames: &[S]) -> Result<()> {
        tracing::debug!("processing frame data");
        for section in frames {
            let Some(slot) = self.tables.states.index_of(section.title()) else {
                continue;
            };
            self.process_state(slot, section, true)?;
            tracing::debug!(frame = section.title(), slot, "Finished frame");
        }
        Ok(())
    }

    /// Applies `framedelta` sections in order.
    ///
    /// # Errors
    ///
    /// [`LoadError::DeltaWithoutName`], [`LoadError::UnknownDeltaTarget`]
    /// or any fatal field error.
    pub fn apply_deltas<S: Section>(&mut self, deltas: &[S]) -> Result<()> {
        tracing::debug!("{} framedelta(s) defined", deltas.len());
        for (position, section) in deltas.iter().enumerate() {
            let name = section
                .text(FIELD_NAME)
                .ok_or(LoadError::DeltaWithoutName { position })?;
            let slot = self
                .tables
                .states
                .index_of(&name)
                .ok_or_else(|| LoadError::UnknownDeltaTarget(name.clone()))?;

            self.process_state(slot, section, false)?;
            tracing::debug!(delta = position, frame = %name, slot, "Applied framedelta");
        }
        Ok(())
    }

    fn process_state<S: Section>(&mut self, slot: usize, section: &S, def: bool) -> Result<()> {
        let frame = self.frame_name(slot);
        let is_set = |key: &str| def || section.has(key);

        if def {
            if section.flag(FIELD_DECORATE).unwrap_or(false) {
                self.edit(slot, |s| s.flags.insert(StateFlags::DECORATE));
                return self.apply_misc_fields(slot, &frame, section, true);
            }
            self.edit(slot, |s| s.flags.remove(StateFlags::DECORATE));

            if let Some(packed) = section.text(FIELD_CMP) {
                self.apply_cmp(slot, &frame, &packed)?;
                return self.apply_tail(slot, &frame, section, false, None);
            }
        }

        if is_set(FIELD_SPRITE) {
            let name = section
                .text(FIELD_SPRITE)
                .unwrap_or_else(|| BLANK_SPRITE.to_owned());
            let sprite = self.resolve_sprite(&frame, &name);
            self.edit(slot, |s| s.sprite = sprite);
        }

        if is_set(FIELD_SPRITEFRAME) {
            let number = match section.value(FIELD_SPRITEFRAME) {
                None => 0,
                Some(FieldValue::Int(i)) => saturate_i32(*i),
                Some(other) => other
                    .to_text()
                    .as_deref()
                    .and_then(parse_sprite_frame)
                    .ok_or_else(|| LoadError::BadSpriteFrame {
                        frame: frame.clone(),
                        value: other.to_text().unwrap_or_default(),
                    })?,
            };
            self.edit(slot, |s| s.frame = number);
        }

        let blank = self.tables.sprites.blank();
        self.edit(slot, |s| {
            if s.sprite == blank {
                s.frame = 0;
            }
        });

        if is_set(FIELD_FULLBRIGHT) && section.flag(FIELD_FULLBRIGHT).unwrap_or(false) {
            self.edit(slot, |s| s.frame |= FF_FULLBRIGHT);
        }

        if is_set(FIELD_TICS) {
            let tics = int_field(section, FIELD_TICS).unwrap_or(1);
            self.edit(slot, |s| s.tics = tics);
        }

        let mut inline_args = None;
        if is_set(FIELD_ACTION) {
            let call = section
                .text(FIELD_ACTION)
                .map_or_else(|| ActionCall::parse("NULL"), |text| ActionCall::parse(&text));
            let action = self.resolve_action(&frame, &call.name)?;
            self.edit(slot, |s| s.action = action);
            inline_args = call.args;
        }

        if is_set(FIELD_NEXTFRAME) {
            let target = section
                .text(FIELD_NEXTFRAME)
                .unwrap_or_else(|| NULL_STATE.to_owned());
            let next = self.resolve_nextframe(slot, &frame, &target)?;
            self.edit(slot, |s| s.nextstate = next);
        }

        self.apply_tail(slot, &frame, section, def, inline_args)
    }

    /// Arguments and prefix flags, then the misc fields.
    fn apply_tail<S: Section>(
        &mut self,
        slot: usize,
        frame: &str,
        section: &S,
        def: bool,
        inline_args: Option<Vec<String>>,
    ) -> Result<()> {
        let values = section.list(FIELD_ARGS).or(inline_args).or_else(|| def.then(Vec::new));
        if let Some(values) = values {
            let stripped = values.iter().map(|v| strip_arg_prefix(v).to_owned()).collect();
            self.set_args(slot, frame, stripped, 0);
        }

        for &(key, flag) in PREFIX_FLAGS {
            if let Some(on) = section.flag(key) {
                self.edit(slot, |s| s.flags.set(flag, on));
            }
        }

        self.apply_misc_fields(slot, frame, section, def)
    }

    fn apply_misc_fields<S: Section>(
        &mut self,
        slot: usize,
        frame: &str,
        section: &S,
        def: bool,
    ) -> Result<()> {
        let is_set = |key: &str| def || section.has(key);

        if is_set(FIELD_MISC1) {
            let text = section.text(FIELD_MISC1).unwrap_or_default();
            let value = resolve_misc(self.tables, self.log, &text);
            self.edit(slot, |s| s.misc1 = value);
        }

        if is_set(FIELD_MISC2) {
            let text = section.text(FIELD_MISC2).unwrap_or_default();
            let value = resolve_misc(self.tables, self.log, &text);
            self.edit(slot, |s| s.misc2 = value);
        }

        if is_set(FIELD_PARTICLE_EVENT) {
            let event = match section.text(FIELD_PARTICLE_EVENT) {
                Some(name) => particle_event(frame, &name)?,
                None => ParticleEvent::None,
            };
            self.edit(slot, |s| s.particle_event = event);
        }

        Ok(())
    }

    fn apply_cmp(&mut self, slot: usize, frame: &str, packed: &str) -> Result<()> {
        let cmp = CmpFrame::parse(packed);
        let blank = self.tables.sprites.blank();

        let sprite = match &cmp.sprite {
            Some(name) => self.resolve_sprite(frame, name),
            None => blank,
        };

        let mut number = match &cmp.frame {
            Some(value) => parse_sprite_frame(value).ok_or_else(|| LoadError::BadSpriteFrame {
                frame: frame.to_owned(),
                value: value.clone(),
            })?,
            None => 0,
        };
        if sprite == blank {
            number = 0;
        }
        if cmp.fullbright.as_deref().is_some_and(|v| v.starts_with(['t', 'T'])) {
            number |= FF_FULLBRIGHT;
        }

        let tics = cmp.tics.as_deref().map_or(1, |v| saturate_i32(parse_long(v).0));

        let action = match &cmp.action {
            Some(name) => self.resolve_action(frame, name)?,
            None => None,
        };

        let nextstate = match &cmp.nextframe {
            Some(target) => self.resolve_nextframe(slot, frame, target)?,
            None => self.tables.null_state,
        };

        let particle = match &cmp.particle_event {
            Some(name) => particle_event(frame, name)?,
            None => ParticleEvent::None,
        };

        let misc1 = cmp
            .misc1
            .as_deref()
            .map_or(0, |v| resolve_misc(self.tables, self.log, v));
        let misc2 = cmp
            .misc2
            .as_deref()
            .map_or(0, |v| resolve_misc(self.tables, self.log, v));

        self.edit(slot, |s| {
            s.sprite = sprite;
            s.frame = number;
            s.tics = tics;
            s.action = action;
            s.nextstate = nextstate;
            s.particle_event = particle;
            s.misc1 = misc1;
            s.misc2 = misc2;
        });
        self.set_args(slot, frame, cmp.args, cmp.dropped_args);

        if cmp.extra_fields > 0 {
            self.log.warn(LoadWarning::ExtraCmpFields {
                frame: frame.to_owned(),
                count: cmp.extra_fields,
            });
        }
        Ok(())
    }

    // ===== Field resolution =====

    fn resolve_sprite(&mut self, frame: &str, name: &str) -> usize {
        let sprites = &mut self.tables.sprites;
        if name.eq_ignore_ascii_case(BLANK_SPRITE) {
            return sprites.blank();
        }
        if let Some(index) = sprites.index_of(name) {
            return index;
        }
        match sprites.define(name) {
            Some(index) => {
                tracing::debug!(frame, sprite = name, "implicitly defined sprite");
                index
            }
            None => {
                self.log.warn(LoadWarning::UndefinableSprite {
                    frame: frame.to_owned(),
                    sprite: name.to_owned(),
                });
                sprites.blank()
            }
        }
    }

    fn resolve_action(&self, frame: &str, name: &str) -> Result<Option<usize>> {
        let pointers = &self.tables.code_pointers;
        match pointers.index_of(name) {
            Some(index) if index == pointers.null_index() => Ok(None),
            Some(index) => Ok(Some(index)),
            None => Err(LoadError::BadAction {
                frame: frame.to_owned(),
                value: name.to_owned(),
            }),
        }
    }

    fn resolve_nextframe(&mut self, slot: usize, frame: &str, target: &str) -> Result<usize> {
        let bad = || LoadError::BadNextFrame {
            frame: frame.to_owned(),
            value: target.to_owned(),
        };
        let states = &mut self.tables.states;

        if let Some(special) = target.strip_prefix('@') {
            let last = states.len().saturating_sub(1);
            return match NextSpecial::from_name(special) {
                Some(NextSpecial::Next) if slot < last => Ok(slot + 1),
                Some(NextSpecial::Prev) if slot > 0 => Ok(slot - 1),
                Some(NextSpecial::This) => Ok(slot),
                Some(NextSpecial::Null) => Ok(self.tables.null_state),
                _ => Err(bad()),
            };
        }

        if let Some(index) = states.index_of(target) {
            return Ok(index);
        }

        if let Some(number) = parse_long_exact(target) {
            return states.index_for_number(saturate_i32(number)).ok_or_else(bad);
        }

        let mut placeholder = State::new(states.len(), target, -1);
        placeholder.nextstate = self.tables.null_state;
        let index = states.define(placeholder)?;
        self.log.warn(LoadWarning::ImplicitState {
            frame: frame.to_owned(),
            target: target.to_owned(),
        });
        Ok(index)
    }

    /// Replaces a frame's arguments with `values`, which are already
    /// stripped of prefixes.
    fn set_args(&mut self, slot: usize, frame: &str, values: Vec<String>, dropped: usize) {
        let mut overflow = dropped;
        self.edit(slot, |s| {
            let args: &mut ArgList = s.clear_args();
            overflow += values.iter().filter(|v| !args.push(v)).count();
        });
        if overflow > 0 {
            self.log.warn(LoadWarning::DroppedArguments {
                frame: frame.to_owned(),
                count: overflow,
            });
        }
    }

    // ===== Slot access =====

    fn frame_name(&self, slot: usize) -> String {
        self.tables
            .states
            .get(slot)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    fn edit(&mut self, slot: usize, f: impl FnOnce(&mut State)) {
        if let Some(state) = self.tables.states.get_mut(slot) {
            f(state);
        }
    }
}

fn particle_event(frame: &str, name: &str) -> Result<ParticleEvent> {
    ParticleEvent::from_name(name).ok_or_else(|| LoadError::BadParticleEvent {
        frame: frame.to_owned(),
        value: name.to_owned(),
    })
}
