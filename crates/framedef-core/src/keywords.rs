//! Keyword tables: mnemonic to enum position.

/// Returns the position of `name` in `keywords` (case-insensitive).
///
/// # Example
///
/// ```
/// use framedef_core::keywords::keyword_index;
///
/// const MODES: &[&str] = &["normal", "fast", "slow"];
/// assert_eq!(keyword_index(MODES, "FAST"), Some(1));
/// assert_eq!(keyword_index(MODES, "sideways"), None);
/// ```
#[must_use]
pub fn keyword_index(keywords: &[&str], name: &str) -> Option<usize> {
    keywords.iter().position(|kw| kw.eq_ignore_ascii_case(name))
}

/// Nextframe specials accepted after an `@`.
pub const NEXTFRAME_SPECIALS: &[&str] = &["next", "prev", "this", "null"];

/// Namespace prefixes recognised by the misc-field resolver.
pub const MISC_PREFIXES: &[&str] = &[
    "frame", "thing", "sound", "flags", "flags2", "flags3", "flags4", "bexptr", "string",
];
