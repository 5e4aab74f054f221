//! Thing flag mnemonics.
//!
//! Thing behaviour bits live in four 32-bit words (`flags` .. `flags4`).
//! Configuration text names bits by mnemonic, separated by any of
//! `,`, `+`, `|` or whitespace, e.g. `"SOLID|SHOOTABLE+COUNTKILL"`.
//!
//! Parsing is either **single-word** (only mnemonics belonging to one word
//! are honoured, as with the `flags2:` misc prefix) or **combined** (every
//! mnemonic lands in its own word). Unknown mnemonics are skipped.

use std::fmt;

/// One of the four thing flag words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagWord {
    /// `flags`
    Flags,
    /// `flags2`
    Flags2,
    /// `flags3`
    Flags3,
    /// `flags4`
    Flags4,
}

impl FlagWord {
    /// Number of flag words.
    pub const COUNT: usize = 4;

    /// Returns the position of this word in a [`FlagSet`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Flags => 0,
            Self::Flags2 => 1,
            Self::Flags3 => 2,
            Self::Flags4 => 3,
        }
    }
}

/// A flag mnemonic and the bit it sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDef {
    /// Mnemonic, matched case-insensitively.
    pub name: &'static str,
    /// Bit value.
    pub value: u32,
    /// Word the bit belongs to.
    pub word: FlagWord,
}

const fn flag(name: &'static str, value: u32, word: FlagWord) -> FlagDef {
    FlagDef { name, value, word }
}

use FlagWord::{Flags, Flags2, Flags3, Flags4};

/// Every thing flag mnemonic.
///
/// Order matters for combined parsing: the first entry with a matching name
/// wins, which is why the `flags3` `SLIDE` precedes the inert `flags` one.
pub static THING_FLAGS: &[FlagDef] = &[
    flag("SPECIAL", 0x0000_0001, Flags),
    flag("SOLID", 0x0000_0002, Flags),
    flag("SHOOTABLE", 0x0000_0004, Flags),
    flag("NOSECTOR", 0x0000_0008, Flags),
    flag("NOBLOCKMAP", 0x0000_0010, Flags),
    flag("AMBUSH", 0x0000_0020, Flags),
    flag("JUSTHIT", 0x0000_0040, Flags),
    flag("JUSTATTACKED", 0x0000_0080, Flags),
    flag("SPAWNCEILING", 0x0000_0100, Flags),
    flag("NOGRAVITY", 0x0000_0200, Flags),
    flag("DROPOFF", 0x0000_0400, Flags),
    flag("PICKUP", 0x0000_0800, Flags),
    flag("NOCLIP", 0x0000_1000, Flags),
    flag("SLIDE", 0x0000_0100, Flags3),
    flag("SLIDE", 0x0000_2000, Flags),
    flag("FLOAT", 0x0000_4000, Flags),
    flag("TELEPORT", 0x0000_8000, Flags),
    flag("MISSILE", 0x0001_0000, Flags),
    flag("DROPPED", 0x0002_0000, Flags),
    flag("SHADOW", 0x0004_0000, Flags),
    flag("NOBLOOD", 0x0008_0000, Flags),
    flag("CORPSE", 0x0010_0000, Flags),
    flag("INFLOAT", 0x0020_0000, Flags),
    flag("COUNTKILL", 0x0040_0000, Flags),
    flag("COUNTITEM", 0x0080_0000, Flags),
    flag("SKULLFLY", 0x0100_0000, Flags),
    flag("NOTDMATCH", 0x0200_0000, Flags),
    flag("TRANSLATION", 0x0400_0000, Flags),
    flag("TRANSLATION1", 0x0400_0000, Flags),
    flag("TRANSLATION2", 0x0800_0000, Flags),
    flag("UNUSED1", 0x0800_0000, Flags),
    flag("UNUSED2", 0x1000_0000, Flags),
    flag("UNUSED3", 0x2000_0000, Flags),
    flag("UNUSED4", 0x4000_0000, Flags),
    flag("TOUCHY", 0x1000_0000, Flags),
    flag("BOUNCES", 0x2000_0000, Flags),
    flag("FRIEND", 0x4000_0000, Flags),
    flag("TRANSLUCENT", 0x8000_0000, Flags),
    flag("LOGRAV", 0x0000_0001, Flags2),
    flag("NOSPLASH", 0x0000_0002, Flags2),
    flag("NOSTRAFE", 0x0000_0004, Flags2),
    flag("NORESPAWN", 0x0000_0008, Flags2),
    flag("ALWAYSRESPAWN", 0x0000_0010, Flags2),
    flag("REMOVEDEAD", 0x0000_0020, Flags2),
    flag("NOTHRUST", 0x0000_0040, Flags2),
    flag("NOCROSS", 0x0000_0080, Flags2),
    flag("JUMPDOWN", 0x0000_0100, Flags2),
    flag("PUSHABLE", 0x0000_0200, Flags2),
    flag("MAP07BOSS1", 0x0000_0400, Flags2),
    flag("MAP07BOSS2", 0x0000_0800, Flags2),
    flag("E1M8BOSS", 0x0000_1000, Flags2),
    flag("E2M8BOSS", 0x0000_2000, Flags2),
    flag("E3M8BOSS", 0x0000_4000, Flags2),
    flag("BOSS", 0x0000_8000, Flags2),
    flag("E4M6BOSS", 0x0001_0000, Flags2),
    flag("E4M8BOSS", 0x0002_0000, Flags2),
    flag("FOOTCLIP", 0x0004_0000, Flags2),
    flag("FLOATBOB", 0x0008_0000, Flags2),
    flag("DONTDRAW", 0x0010_0000, Flags2),
    flag("SHORTMRANGE", 0x0020_0000, Flags2),
    flag("LONGMELEE", 0x0040_0000, Flags2),
    flag("RANGEHALF", 0x0080_0000, Flags2),
    flag("HIGHERMPROB", 0x0100_0000, Flags2),
    flag("CANTLEAVEFLOORPIC", 0x0200_0000, Flags2),
    flag("SPAWNFLOAT", 0x0400_0000, Flags2),
    flag("INVULNERABLE", 0x0800_0000, Flags2),
    flag("DORMANT", 0x1000_0000, Flags2),
    flag("SEEKERMISSILE", 0x2000_0000, Flags2),
    flag("DEFLECTIVE", 0x4000_0000, Flags2),
    flag("REFLECTIVE", 0x8000_0000, Flags2),
    flag("GHOST", 0x0000_0001, Flags3),
    flag("THRUGHOST", 0x0000_0002, Flags3),
    flag("NODMGTHRUST", 0x0000_0004, Flags3),
    flag("ACTSEESOUND", 0x0000_0008, Flags3),
    flag("LOUDACTIVE", 0x0000_0010, Flags3),
    flag("E5M8BOSS", 0x0000_0020, Flags3),
    flag("DMGIGNORED", 0x0000_0040, Flags3),
    flag("BOSSIGNORE", 0x0000_0080, Flags3),
    flag("TELESTOMP", 0x0000_0200, Flags3),
    flag("WINDTHRUST", 0x0000_0400, Flags3),
    flag("FIREDAMAGE", 0x0000_0800, Flags3),
    flag("KILLABLE", 0x0000_1000, Flags3),
    flag("DEADFLOAT", 0x0000_2000, Flags3),
    flag("NOTHRESHOLD", 0x0000_4000, Flags3),
    flag("FLOORMISSILE", 0x0000_8000, Flags3),
    flag("SUPERITEM", 0x0001_0000, Flags3),
    flag("NOITEMRESP", 0x0002_0000, Flags3),
    flag("SUPERFRIEND", 0x0004_0000, Flags3),
    flag("INVULNCHARGE", 0x0008_0000, Flags3),
    flag("EXPLOCOUNT", 0x0010_0000, Flags3),
    flag("CANNOTPUSH", 0x0020_0000, Flags3),
    flag("TLSTYLEADD", 0x0040_0000, Flags3),
    flag("SPACMONSTER", 0x0080_0000, Flags3),
    flag("SPACMISSILE", 0x0100_0000, Flags3),
    flag("NOFRIENDDMG", 0x0200_0000, Flags3),
    flag("3DDECORATION", 0x0400_0000, Flags3),
    flag("ALWAYSFAST", 0x0800_0000, Flags3),
    flag("PASSMOBJ", 0x1000_0000, Flags3),
    flag("DONTOVERLAP", 0x2000_0000, Flags3),
    flag("CYCLEALPHA", 0x4000_0000, Flags3),
    flag("RIP", 0x8000_0000, Flags3),
    flag("AUTOTRANSLATE", 0x0000_0001, Flags4),
    flag("NORADIUSDMG", 0x0000_0002, Flags4),
    flag("FORCERADIUSDMG", 0x0000_0004, Flags4),
    flag("LOOKALLAROUND", 0x0000_0008, Flags4),
    flag("NODAMAGE", 0x0000_0010, Flags4),
    flag("SYNCHRONIZED", 0x0000_0020, Flags4),
    flag("NORANDOMIZE", 0x0000_0040, Flags4),
    flag("BRIGHT", 0x0000_0080, Flags4),
    flag("FLY", 0x0000_0100, Flags4),
    flag("NORADIUSHACK", 0x0000_0200, Flags4),
    flag("NOSOUNDCUTOFF", 0x0000_0400, Flags4),
    flag("RAVENRESPAWN", 0x0000_0800, Flags4),
    flag("NOTSHAREWARE", 0x0000_1000, Flags4),
    flag("NOTORQUE", 0x0000_2000, Flags4),
    flag("ALWAYSTORQUE", 0x0000_4000, Flags4),
    flag("NOZERODAMAGE", 0x0000_8000, Flags4),
    flag("TLSTYLESUB", 0x0001_0000, Flags4),
    flag("TOTALINVISIBLE", 0x0002_0000, Flags4),
    flag("DRAWSBLOOD", 0x0004_0000, Flags4),
    flag("SPACPUSHWALL", 0x0008_0000, Flags4),
    flag("NOSPECIESINFIGHT", 0x0010_0000, Flags4),
    flag("HARMSPECIESMISSILE", 0x0020_0000, Flags4),
    flag("FRIENDFOEMISSILE", 0x0040_0000, Flags4),
    flag("BLOODLESSIMPACT", 0x0080_0000, Flags4),
    flag("HERETICBOUNCES", 0x0100_0000, Flags4),
    flag("MONSTERPASS", 0x0200_0000, Flags4),
    flag("LOWAIMPRIO", 0x0400_0000, Flags4),
    flag("STICKYCARRY", 0x0800_0000, Flags4),
    flag("SETTARGETONDEATH", 0x1000_0000, Flags4),
    flag("SLIDEOVERTHINGS", 0x2000_0000, Flags4),
    flag("UNSTEPPABLE", 0x4000_0000, Flags4),
    flag("RANGEEIGHTH", 0x8000_0000, Flags4),
];

/// The four flag words produced by a combined parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlagSet(pub [u32; FlagWord::COUNT]);

impl FlagSet {
    /// All words zero.
    pub const EMPTY: Self = Self([0; FlagWord::COUNT]);

    /// Returns one word.
    #[must_use]
    pub const fn word(&self, word: FlagWord) -> u32 {
        self.0[word.index()]
    }

    /// Returns true if no bit is set in any word.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#010x}:{:#010x}:{:#010x}:{:#010x}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

fn is_flag_separator(c: char) -> bool {
    matches!(c, ',' | '+' | '|' | ' ' | '\t' | '\x0c' | '\r')
}

fn mnemonics(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_flag_separator).filter(|s| !s.is_empty())
}

fn find_flag<'a>(table: &'a [FlagDef], name: &str, word: Option<FlagWord>) -> Option<&'a FlagDef> {
    table
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name) && word.map_or(true, |w| def.word == w))
}

/// Parses `text` honouring only mnemonics that belong to `word`.
///
/// # Example
///
/// ```
/// use framedef_core::flags::{parse_flags_single, FlagWord};
///
/// assert_eq!(parse_flags_single("SOLID|SHOOTABLE", FlagWord::Flags), 0x6);
/// // BOSS is a flags2 bit, so it is ignored here.
/// assert_eq!(parse_flags_single("SOLID+BOSS", FlagWord::Flags), 0x2);
/// ```
#[must_use]
pub fn parse_flags_single(text: &str, word: FlagWord) -> u32 {
    mnemonics(text).fold(0, |acc, name| match find_flag(THING_FLAGS, name, Some(word)) {
        Some(def) => acc | def.value,
        None => {
            tracing::debug!(mnemonic = name, ?word, "unknown flag mnemonic");
            acc
        }
    })
}

/// Parses `text` into all four words at once.
#[must_use]
pub fn parse_flags_combined(text: &str) -> FlagSet {
    let mut set = FlagSet::EMPTY;
    for name in mnemonics(text) {
        match find_flag(THING_FLAGS, name, None) {
            Some(def) => set.0[def.word.index()] |= def.value,
            None => tracing::debug!(mnemonic = name, "unknown flag mnemonic"),
        }
    }
    set
}

/// Parses `text` against a caller-supplied table, ORing every match into
/// one word regardless of the word each definition names.
#[must_use]
pub fn parse_flags_with(text: &str, table: &[FlagDef]) -> u32 {
    mnemonics(text)
        .filter_map(|name| find_flag(table, name, None))
        .fold(0, |acc, def| acc | def.value)
}
