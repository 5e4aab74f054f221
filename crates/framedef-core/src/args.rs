//! Argument lists and their evaluation cache.
//!
//! Frames carry a short list of textual arguments. Action code reads them
//! through typed accessors (`as_int`, `as_thing`, ...) every time the
//! action runs, so each argument memoises its last typed evaluation:
//!
//! - the first `as_T` call parses the text, tags the cell with `T` and
//!   stores the result
//! - later `as_T` calls return the stored value without parsing
//! - an `as_U` call on the same cell re-parses and re-tags it
//!
//! The cache only remembers the last requested type, so alternating
//! between two types on one cell parses every time. Writing a cell with
//! [`ArgList::set`] clears its tag.
//!
//! Reading past the end of the list is not an error: every accessor takes
//! (or defines) a default for that case.
//!
//! # Example
//!
//! ```
//! use framedef_core::args::ArgList;
//!
//! let mut args = ArgList::new();
//! args.push("0x10");
//! args.push("2.5");
//!
//! assert_eq!(args.as_int(0, -1), 16);
//! assert_eq!(args.as_int(0, -1), 16);
//! assert_eq!(args.evaluations(), 1);
//!
//! assert_eq!(args.as_int(5, -1), -1);
//! ```

use std::cell::Cell;

use thiserror::Error;

use crate::fixed::{Angle, Fixed};
use crate::flags::{parse_flags_combined, parse_flags_with, FlagDef, FlagSet};
use crate::keywords::keyword_index;
use crate::lexical::{parse_double, parse_long, saturate_i32};

/// Capacity of an argument list.
pub const MAX_ARGS: usize = 16;

/// Errors from editing an argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgError {
    /// The index is at or beyond [`MAX_ARGS`].
    #[error("argument index {index} exceeds capacity {MAX_ARGS}")]
    OutOfCapacity {
        /// Requested index.
        index: usize,
    },

    /// The state to edit does not exist.
    #[error("no state at index {state}")]
    UnknownState {
        /// Requested state index.
        state: usize,
    },
}

/// A cached typed evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum EvalValue {
    /// Not evaluated.
    #[default]
    None,
    /// Integer.
    Int(i32),
    /// Fixed-point.
    Fixed(Fixed),
    /// Double.
    Double(f64),
    /// Binary angle.
    Angle(Angle),
    /// Thing type index, or `-1`.
    ThingNum(i32),
    /// State index, `-1`, or a passed-through negative number.
    StateNum(i32),
    /// Flag words. Single-table parses only fill word 0.
    Flags(FlagSet),
    /// Sound index.
    Sound(Option<usize>),
    /// Code pointer index.
    BexPtr(Option<usize>),
    /// EDF string index.
    EdfString(Option<usize>),
    /// Keyword position or verbatim number.
    Keyword(i32),
}

/// Namespace lookups needed by reference-typed accessors.
pub trait ArgResolver {
    /// Thing type by name.
    fn thing_by_name(&self, name: &str) -> Option<usize>;
    /// Thing type by legacy id.
    fn thing_by_number(&self, number: i32) -> Option<usize>;
    /// The `Unknown` thing type.
    fn unknown_thing(&self) -> usize;
    /// State by name.
    fn state_by_name(&self, name: &str) -> Option<usize>;
    /// State by legacy id.
    fn state_by_number(&self, number: i32) -> Option<usize>;
    /// The null state.
    fn null_state(&self) -> usize;
    /// Sound by mnemonic.
    fn sound_by_name(&self, name: &str) -> Option<usize>;
    /// Sound by legacy id.
    fn sound_by_number(&self, number: i32) -> Option<usize>;
    /// EDF string by mnemonic.
    fn string_by_name(&self, name: &str) -> Option<usize>;
    /// EDF string by numeric key.
    fn string_by_number(&self, number: i32) -> Option<usize>;
    /// Code pointer by mnemonic.
    fn code_pointer(&self, name: &str) -> Option<usize>;
}

#[derive(Debug, Clone, Default)]
struct Arg {
    text: String,
    cache: Cell<EvalValue>,
}

impl Arg {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            cache: Cell::new(EvalValue::None),
        }
    }
}

/// Splits argument text into "is a name" or "is a number".
enum Operand<'a> {
    Name(&'a str),
    Number(i32),
}

fn operand(text: &str) -> Operand<'_> {
    match parse_long(text) {
        (value, "") => Operand::Number(saturate_i32(value)),
        _ => Operand::Name(text),
    }
}

fn to_handle(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(-1)
}

fn from_handle(handle: i32) -> Option<usize> {
    usize::try_from(handle).ok()
}

/// An ordered list of at most [`MAX_ARGS`] textual arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgList {
    args: Vec<Arg>,
    evaluations: Cell<u64>,
}

impl ArgList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from `values`, returning it with the number of values
    /// that did not fit.
    #[must_use]
    pub fn from_values<I, S>(values: I) -> (Self, usize)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        let dropped = values
            .into_iter()
            .filter(|value| !list.push(value.as_ref()))
            .count();
        (list, dropped)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true if the list has no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Appends an argument. Returns false if the list is full.
    pub fn push(&mut self, text: &str) -> bool {
        if self.args.len() >= MAX_ARGS {
            return false;
        }
        self.args.push(Arg::new(text));
        true
    }

    /// Removes every argument.
    pub fn clear(&mut self) {
        self.args.clear();
    }

    /// Overwrites argument `index`, padding with empty arguments as needed,
    /// and clears its cached evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::OutOfCapacity`] if `index >= MAX_ARGS`.
    pub fn set(&mut self, index: usize, text: &str) -> Result<(), ArgError> {
        if index >= MAX_ARGS {
            return Err(ArgError::OutOfCapacity { index });
        }
        if index >= self.args.len() {
            self.args.resize_with(index + 1, Arg::default);
        }
        let arg = &mut self.args[index];
        text.clone_into(&mut arg.text);
        arg.cache.set(EvalValue::None);
        Ok(())
    }

    /// [`ArgList::set`] with the decimal text of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::OutOfCapacity`] if `index >= MAX_ARGS`.
    pub fn set_number(&mut self, index: usize, value: i32) -> Result<(), ArgError> {
        self.set(index, &value.to_string())
    }

    /// Clears the cached evaluation of argument `index`, if it exists.
    pub fn reset_eval(&self, index: usize) {
        if let Some(arg) = self.args.get(index) {
            arg.cache.set(EvalValue::None);
        }
    }

    /// Clears every cached evaluation.
    pub fn reset_all(&self) {
        for arg in &self.args {
            arg.cache.set(EvalValue::None);
        }
    }

    /// Returns the raw text of argument `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(|arg| arg.text.as_str())
    }

    /// Returns the raw text of argument `index`, or `default`.
    #[must_use]
    pub fn as_string<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.text(index).unwrap_or(default)
    }

    /// Iterates the raw argument texts.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.text.as_str())
    }

    /// Returns the cached evaluation of argument `index`.
    #[must_use]
    pub fn cached(&self, index: usize) -> Option<EvalValue> {
        self.args.get(index).map(|arg| arg.cache.get())
    }

    /// Returns how many parses this list has performed.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    fn memo<T>(
        &self,
        index: usize,
        extract: impl Fn(EvalValue) -> Option<T>,
        compute: impl FnOnce(&str) -> EvalValue,
    ) -> Option<T> {
        let arg = self.args.get(index)?;
        if let Some(value) = extract(arg.cache.get()) {
            return Some(value);
        }

        let value = compute(&arg.text);
        arg.cache.set(value);
        self.evaluations.set(self.evaluations.get() + 1);
        extract(value)
    }

    // ===== Scalars =====

    /// Argument as a base-detecting integer.
    #[must_use]
    pub fn as_int(&self, index: usize, default: i32) -> i32 {
        self.memo(
            index,
            |v| match v {
                EvalValue::Int(i) => Some(i),
                _ => None,
            },
            |text| EvalValue::Int(saturate_i32(parse_long(text).0)),
        )
        .unwrap_or(default)
    }

    /// Argument as a 16.16 fixed-point number.
    #[must_use]
    pub fn as_fixed(&self, index: usize, default: Fixed) -> Fixed {
        self.memo(
            index,
            |v| match v {
                EvalValue::Fixed(x) => Some(x),
                _ => None,
            },
            |text| EvalValue::Fixed(Fixed::from_f64(parse_double(text).0)),
        )
        .unwrap_or(default)
    }

    /// Argument as a double.
    #[must_use]
    pub fn as_double(&self, index: usize, default: f64) -> f64 {
        self.memo(
            index,
            |v| match v {
                EvalValue::Double(d) => Some(d),
                _ => None,
            },
            |text| EvalValue::Double(parse_double(text).0),
        )
        .unwrap_or(default)
    }

    /// Argument in degrees as a binary angle.
    #[must_use]
    pub fn as_angle(&self, index: usize, default: Angle) -> Angle {
        self.memo(
            index,
            |v| match v {
                EvalValue::Angle(a) => Some(a),
                _ => None,
            },
            |text| EvalValue::Angle(Angle::from_degrees(parse_double(text).0)),
        )
        .unwrap_or(default)
    }

    // ===== Things =====

    /// Argument as a thing type index.
    ///
    /// Names resolve by mnemonic and numbers by legacy id; anything
    /// unresolved is the `Unknown` thing.
    #[must_use]
    pub fn as_thing<R: ArgResolver + ?Sized>(&self, index: usize, default: usize, resolver: &R) -> usize {
        let unknown = resolver.unknown_thing();
        self.memo(
            index,
            |v| match v {
                EvalValue::ThingNum(n) => Some(from_handle(n).unwrap_or(unknown)),
                _ => None,
            },
            |text| {
                let found = match operand(text) {
                    Operand::Name(name) => resolver.thing_by_name(name),
                    Operand::Number(n) => resolver.thing_by_number(n),
                };
                EvalValue::ThingNum(to_handle(found.unwrap_or(unknown)))
            },
        )
        .unwrap_or(default)
    }

    /// Argument as a thing type index, converting only positive numbers.
    ///
    /// Zero, negative numbers, unresolved references and missing arguments
    /// are all `None`.
    #[must_use]
    pub fn as_thing_g0<R: ArgResolver + ?Sized>(&self, index: usize, resolver: &R) -> Option<usize> {
        self.memo(
            index,
            |v| match v {
                EvalValue::ThingNum(n) => Some(from_handle(n)),
                _ => None,
            },
            |text| {
                let found = match operand(text) {
                    Operand::Name(name) => resolver.thing_by_name(name),
                    Operand::Number(n) if n > 0 => resolver.thing_by_number(n),
                    Operand::Number(_) => None,
                };
                EvalValue::ThingNum(found.map_or(-1, to_handle))
            },
        )
        .flatten()
    }

    // ===== States =====

    /// Argument as a state index; anything unresolved is the null state.
    #[must_use]
    pub fn as_state<R: ArgResolver + ?Sized>(&self, index: usize, default: usize, resolver: &R) -> usize {
        let null = resolver.null_state();
        self.memo(
            index,
            |v| match v {
                EvalValue::StateNum(n) => Some(from_handle(n).unwrap_or(null)),
                _ => None,
            },
            |text| {
                let found = match operand(text) {
                    Operand::Name(name) => resolver.state_by_name(name),
                    Operand::Number(n) => resolver.state_by_number(n),
                };
                EvalValue::StateNum(to_handle(found.unwrap_or(null)))
            },
        )
        .unwrap_or(default)
    }

    /// Argument as a state index without the null-state fallback.
    #[must_use]
    pub fn as_state_ni<R: ArgResolver + ?Sized>(&self, index: usize, resolver: &R) -> Option<usize> {
        self.memo(
            index,
            |v| match v {
                EvalValue::StateNum(n) => Some(from_handle(n)),
                _ => None,
            },
            |text| {
                let found = match operand(text) {
                    Operand::Name(name) => resolver.state_by_name(name),
                    Operand::Number(n) => resolver.state_by_number(n),
                };
                EvalValue::StateNum(found.map_or(-1, to_handle))
            },
        )
        .flatten()
    }

    /// Argument as a state index, converting only non-negative numbers.
    ///
    /// Negative numbers are returned as written (callers use them as
    /// relative offsets); unresolved references and missing arguments are
    /// `-1`.
    #[must_use]
    pub fn as_state_g0<R: ArgResolver + ?Sized>(&self, index: usize, resolver: &R) -> i32 {
        self.memo(
            index,
            |v| match v {
                EvalValue::StateNum(n) => Some(n),
                _ => None,
            },
            |text| {
                EvalValue::StateNum(match operand(text) {
                    Operand::Name(name) => resolver.state_by_name(name).map_or(-1, to_handle),
                    Operand::Number(n) if n >= 0 => resolver.state_by_number(n).map_or(-1, to_handle),
                    Operand::Number(n) => n,
                })
            },
        )
        .unwrap_or(-1)
    }

    // ===== Flags =====

    /// Argument as thing flags over all four words. Empty text is zero.
    #[must_use]
    pub fn as_thing_flags(&self, index: usize, default: FlagSet) -> FlagSet {
        self.memo(
            index,
            |v| match v {
                EvalValue::Flags(set) => Some(set),
                _ => None,
            },
            |text| EvalValue::Flags(parse_flags_combined(text)),
        )
        .unwrap_or(default)
    }

    /// Argument as one flag word parsed against `table`.
    ///
    /// Shares its cache tag with [`ArgList::as_thing_flags`]: after a
    /// combined parse this returns word 0 of that result.
    #[must_use]
    pub fn as_flags(&self, index: usize, table: &[FlagDef], default: u32) -> u32 {
        self.memo(
            index,
            |v| match v {
                EvalValue::Flags(set) => Some(set.0[0]),
                _ => None,
            },
            |text| EvalValue::Flags(FlagSet([parse_flags_with(text, table), 0, 0, 0])),
        )
        .unwrap_or(default)
    }

    // ===== Other references =====

    /// Argument as a sound index.
    #[must_use]
    pub fn as_sound<R: ArgResolver + ?Sized>(
        &self,
        index: usize,
        default: Option<usize>,
        resolver: &R,
    ) -> Option<usize> {
        self.memo(
            index,
            |v| match v {
                EvalValue::Sound(s) => Some(s),
                _ => None,
            },
            |text| {
                EvalValue::Sound(match operand(text) {
                    Operand::Name(name) => resolver.sound_by_name(name),
                    Operand::Number(n) => resolver.sound_by_number(n),
                })
            },
        )
        .unwrap_or(default)
    }

    /// Argument as a code pointer index.
    #[must_use]
    pub fn as_bexptr<R: ArgResolver + ?Sized>(&self, index: usize, resolver: &R) -> Option<usize> {
        self.memo(
            index,
            |v| match v {
                EvalValue::BexPtr(p) => Some(p),
                _ => None,
            },
            |text| EvalValue::BexPtr(resolver.code_pointer(text)),
        )
        .flatten()
    }

    /// Argument as an EDF string index.
    #[must_use]
    pub fn as_edf_string<R: ArgResolver + ?Sized>(
        &self,
        index: usize,
        default: Option<usize>,
        resolver: &R,
    ) -> Option<usize> {
        self.memo(
            index,
            |v| match v {
                EvalValue::EdfString(s) => Some(s),
                _ => None,
            },
            |text| {
                EvalValue::EdfString(match operand(text) {
                    Operand::Name(name) => resolver.string_by_name(name),
                    Operand::Number(n) => resolver.string_by_number(n),
                })
            },
        )
        .unwrap_or(default)
    }

    /// Argument as a position in `keywords`.
    ///
    /// Numbers are returned verbatim; unknown names become `default`.
    #[must_use]
    pub fn as_keyword(&self, index: usize, keywords: &[&str], default: i32) -> i32 {
        self.memo(
            index,
            |v| match v {
                EvalValue::Keyword(k) => Some(k),
                _ => None,
            },
            |text| {
                EvalValue::Keyword(match operand(text) {
                    Operand::Name(name) => keyword_index(keywords, name).map_or(default, to_handle),
                    Operand::Number(n) => n,
                })
            },
        )
        .unwrap_or(default)
    }
}

impl PartialEq for ArgList {
    /// Lists are equal when their texts are; caches are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.texts().eq(other.texts())
    }
}
