//! EDF strings: mnemonic text entries with an optional numeric key.

use super::{Entry, Namespace};
use crate::error::Result;
use crate::section::Section;

/// A string definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdfString {
    /// Mnemonic.
    pub mnemonic: String,
    /// Numeric key (`-1` for none).
    pub numkey: i32,
    /// Text.
    pub value: String,
}

impl EdfString {
    /// Creates a string entry.
    #[must_use]
    pub fn new(mnemonic: impl Into<String>, numkey: i32, value: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            numkey,
            value: value.into(),
        }
    }

    /// Builds a string from a `string` section (`num`, `val`).
    #[must_use]
    pub fn from_section<S: Section>(section: &S) -> Self {
        let numkey = section
            .int("num")
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(-1);
        let value = section.text("val").unwrap_or_default();
        Self::new(section.title(), numkey, value)
    }
}

impl Entry for EdfString {
    fn name(&self) -> &str {
        &self.mnemonic
    }

    fn number(&self) -> i32 {
        self.numkey
    }

    fn set_number(&mut self, number: i32) {
        self.numkey = number;
    }
}

/// All strings. Numeric keys are never auto-allocated.
pub type StringTable = Namespace<EdfString>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionData;

    #[test]
    fn section_fields() {
        let mut table = StringTable::new(7);
        let slot = table
            .define(EdfString::from_section(
                &SectionData::new("HELLO").with("num", 42).with("val", "Hello!"),
            ))
            .unwrap();

        assert_eq!(table.index_for_number(42), Some(slot));
        assert_eq!(table.get(slot).map(|s| s.value.as_str()), Some("Hello!"));
    }

    #[test]
    fn no_numkey() {
        let mut table = StringTable::new(7);
        let slot = table.define(EdfString::new("QUIET", -1, "")).unwrap();
        assert_eq!(table.index_of("quiet"), Some(slot));
        assert_eq!(table.index_for_number(-1), None);
    }
}
