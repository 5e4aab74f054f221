//! Frame records.
//!
//! A [`State`] is one frame of an animation/behaviour sequence: what to
//! draw, for how long, which action to run, and which state follows. States
//! live in a [`StateTable`] and refer to each other by table index.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::args::ArgList;
use crate::namespace::{Entry, Namespace};

/// Fullbright bit in [`State::frame`].
pub const FF_FULLBRIGHT: i32 = 0x8000;

/// Mask for the frame number in [`State::frame`].
pub const FF_FRAMEMASK: i32 = 0x7fff;

/// Name of the mandatory null state.
pub const NULL_STATE: &str = "S_NULL";

bitflags! {
    /// Per-state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct StateFlags: u32 {
        /// Body is supplied later by a thing's state block.
        const DECORATE = 0x1;
        /// Tics are halved on the fastest skill.
        const SKILL5FAST = 0x2;
        /// Rendering may interpolate into the next frame.
        const INTERPOLATE = 0x8;
    }
}

/// Sign-prefixed flag fields (`+SKILL5FAST`, `-INTERPOLATE`) a frame
/// section may carry.
pub const PREFIX_FLAGS: &[(&str, StateFlags)] = &[
    ("SKILL5FAST", StateFlags::SKILL5FAST),
    ("INTERPOLATE", StateFlags::INTERPOLATE),
];

/// Particle effect spawned when a state is entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleEvent {
    /// No effect.
    #[default]
    None,
    /// Rocket explosion.
    RocketExplosion,
    /// BFG explosion.
    BfgExplosion,
}

impl ParticleEvent {
    /// Every event with its configuration name.
    pub const ALL: [(Self, &'static str); 3] = [
        (Self::None, "pevt_none"),
        (Self::RocketExplosion, "pevt_rexpl"),
        (Self::BfgExplosion, "pevt_bfgexpl"),
    ];

    /// Looks an event up by configuration name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(event, _)| *event)
    }

    /// Returns the configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "pevt_none",
            Self::RocketExplosion => "pevt_rexpl",
            Self::BfgExplosion => "pevt_bfgexpl",
        }
    }
}

/// One frame.
#[derive(Debug, Clone)]
pub struct State {
    /// Position in the state table.
    pub index: usize,
    /// Mnemonic.
    pub name: String,
    /// Legacy id (`-1` for none).
    pub dehnum: i32,
    /// Sprite index.
    pub sprite: usize,
    /// Frame number plus [`FF_FULLBRIGHT`].
    pub frame: i32,
    /// Duration; `-1` is forever.
    pub tics: i32,
    /// Code pointer index; `None` runs nothing.
    pub action: Option<usize>,
    /// Successor state index.
    pub nextstate: usize,
    /// Particle effect.
    pub particle_event: ParticleEvent,
    /// First misc value.
    pub misc1: i32,
    /// Second misc value.
    pub misc2: i32,
    /// Flags.
    pub flags: StateFlags,
    /// Arguments for the action.
    pub args: Option<ArgList>,
}

impl State {
    /// Creates an unpopulated state.
    ///
    /// Sprite and successor are 0 until processing assigns them.
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>, dehnum: i32) -> Self {
        Self {
            index,
            name: name.into(),
            dehnum,
            sprite: 0,
            frame: 0,
            tics: 1,
            action: None,
            nextstate: 0,
            particle_event: ParticleEvent::None,
            misc1: 0,
            misc2: 0,
            flags: StateFlags::empty(),
            args: None,
        }
    }

    /// Returns the frame number without the fullbright bit.
    #[must_use]
    pub fn frame_number(&self) -> i32 {
        self.frame & FF_FRAMEMASK
    }

    /// Returns true if the frame is drawn fullbright.
    #[must_use]
    pub fn is_fullbright(&self) -> bool {
        self.frame & FF_FULLBRIGHT != 0
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        self.args.as_ref().map_or(0, ArgList::len)
    }

    /// Gives the state an empty argument list, clearing any existing one.
    pub fn clear_args(&mut self) -> &mut ArgList {
        let args = self.args.get_or_insert_with(ArgList::new);
        args.clear();
        args
    }
}

impl Entry for State {
    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i32 {
        self.dehnum
    }

    fn set_number(&mut self, number: i32) {
        self.dehnum = number;
    }
}

/// All states, indexed by name and legacy id.
pub type StateTable = Namespace<State>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_events_by_name() {
        assert_eq!(ParticleEvent::from_name("PEVT_REXPL"), Some(ParticleEvent::RocketExplosion));
        assert_eq!(ParticleEvent::from_name("pevt_boom"), None);
        for (event, name) in ParticleEvent::ALL {
            assert_eq!(event.name(), name);
        }
    }

    #[test]
    fn frame_bits() {
        let mut state = State::new(0, "S_X", -1);
        state.frame = 3 | FF_FULLBRIGHT;
        assert_eq!(state.frame_number(), 3);
        assert!(state.is_fullbright());
    }

    #[test]
    fn clear_args_reuses_the_list() {
        let mut state = State::new(0, "S_X", -1);
        assert_eq!(state.argument_count(), 0);
        state.clear_args().push("1");
        assert_eq!(state.argument_count(), 1);
        state.clear_args();
        assert!(state.args.is_some());
        assert_eq!(state.argument_count(), 0);
    }

    #[test]
    fn flags_serialization_roundtrip() {
        let flags = StateFlags::SKILL5FAST | StateFlags::INTERPOLATE;
        let json = serde_json::to_string(&flags).unwrap();
        let back: StateFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
        assert_eq!(flags.bits(), 0xA);
    }
}
