//! Configuration sections.
//!
//! The engine does not parse configuration text itself. A front end turns
//! text into sections (a title plus keyed fields) and hands them over in a
//! [`ConfigBatch`]. Anything implementing [`Section`] works; [`SectionData`]
//! is the owned, serde-friendly implementation used by tests and simple
//! front ends.
//!
//! A field that is absent is different from a field set to its default:
//! deltas only touch fields that are present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A field value as produced by the configuration front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer.
    Int(i64),
    /// Boolean or sign-prefixed flag.
    Bool(bool),
    /// String.
    Str(String),
    /// String list.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the value as text. Integers and booleans are rendered.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Int(i) => Some(i.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Str(s) => Some(s.clone()),
            Self::List(_) => None,
        }
    }

    /// Returns the string slice if this is a [`FieldValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer. Strings are not converted.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Returns the value as a boolean. Strings starting with `t`/`T`, `y`/`Y`
    /// or `on` count as true.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Str(s) => Some(
                s.starts_with(['t', 'T', 'y', 'Y']) || s.eq_ignore_ascii_case("on"),
            ),
            Self::List(_) => None,
        }
    }

    /// Returns the value as a list. A scalar becomes a one-element list.
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            other => other.to_text().into_iter().collect(),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// A titled group of fields.
pub trait Section {
    /// Returns the section title (the record name for frames and things).
    fn title(&self) -> &str;

    /// Returns the field named `key`, or `None` if it was not written.
    fn value(&self, key: &str) -> Option<&FieldValue>;

    /// Returns true if `key` was written.
    fn has(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Returns a field as text.
    fn text(&self, key: &str) -> Option<String> {
        self.value(key).and_then(FieldValue::to_text)
    }

    /// Returns a field as an integer.
    fn int(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(FieldValue::as_int)
    }

    /// Returns a field as a boolean.
    fn flag(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(FieldValue::as_bool)
    }

    /// Returns a field as a string list.
    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.value(key).map(FieldValue::as_list)
    }
}

/// Owned section with case-insensitive keys.
///
/// # Example
///
/// ```
/// use framedef_core::section::{Section, SectionData};
///
/// let frame = SectionData::new("S_SPAWN")
///     .with("sprite", "TROO")
///     .with("tics", 10);
///
/// assert_eq!(frame.title(), "S_SPAWN");
/// assert_eq!(frame.int("TICS"), Some(10));
/// assert!(!frame.has("action"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionData {
    /// Section title.
    pub title: String,
    /// Fields by key.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl SectionData {
    /// Creates an empty section.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a field, replacing any value under the same key.
    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.retain(|k, _| !k.eq_ignore_ascii_case(key));
        self.fields.insert(key.to_owned(), value.into());
    }
}

impl Section for SectionData {
    fn title(&self) -> &str {
        &self.title
    }

    fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key).or_else(|| {
            self.fields
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }
}

/// Everything one load consumes, grouped by section kind.
///
/// Kinds are applied in field order: sprites, thing types, sounds, strings,
/// frames, then frame deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigBatch<S = SectionData> {
    /// Sprite names.
    pub sprites: Vec<String>,
    /// `thingtype` sections (`dehackednum`).
    pub thingtypes: Vec<S>,
    /// `sound` sections (`dehackednum`).
    pub sounds: Vec<S>,
    /// `string` sections (`num`, `val`).
    pub strings: Vec<S>,
    /// `frame` sections.
    pub frames: Vec<S>,
    /// `framedelta` sections.
    pub framedeltas: Vec<S>,
}

impl<S> Default for ConfigBatch<S> {
    fn default() -> Self {
        Self {
            sprites: Vec::new(),
            thingtypes: Vec::new(),
            sounds: Vec::new(),
            strings: Vec::new(),
            frames: Vec::new(),
            framedeltas: Vec::new(),
        }
    }
}

impl<S> ConfigBatch<S> {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
