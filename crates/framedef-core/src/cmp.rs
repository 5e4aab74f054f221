//! Compressed frame definitions.
//!
//! A `cmp` field packs a whole frame into one delimited string. Two layouts
//! are accepted:
//!
//! ```text
//! sprite|frame|fullbright|tics|action|nextframe|ptcl|misc1|misc2|a0|a1|a2|a3|a4
//! sprite|frame|fullbright|tics|action(a0, a1, ...)|nextframe|ptcl|misc1|misc2
//! ```
//!
//! `|` and `,` both separate fields. Blanks outside quotes are dropped;
//! single or double quotes make everything up to the closing quote literal.
//! A field written as a bare `*`, or missing from the end, takes its
//! default. Both layouts parse into the same [`CmpFrame`], so later stages
//! never see which one was used.

use crate::args::MAX_ARGS;

/// Number of trailing argument fields in the legacy layout.
pub const LEGACY_ARG_FIELDS: usize = 5;

/// One lexed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Field text with quotes and blanks removed.
    pub text: String,
    /// True if any part of the field was quoted.
    pub quoted: bool,
}

impl Token {
    /// Returns true for a bare `*`.
    ///
    /// Only an unquoted token that is exactly `*` marks a default. Text that
    /// merely starts with `*` (such as `*5`) is an ordinary value, and `'*'`
    /// is a literal star.
    #[must_use]
    pub fn is_default(&self) -> bool {
        !self.quoted && self.text == "*"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    InDoubleQuote,
    InSingleQuote,
}

/// Field lexer for compressed definitions.
///
/// # Example
///
/// ```
/// use framedef_core::cmp::CmpTokenizer;
///
/// let fields: Vec<String> = CmpTokenizer::new("PLAY | A, 'a|b'")
///     .map(|token| token.text)
///     .collect();
/// assert_eq!(fields, ["PLAY", "A", "a|b"]);
/// ```
#[derive(Debug, Clone)]
pub struct CmpTokenizer<'a> {
    text: &'a str,
    pos: usize,
    in_action: bool,
    early_args_found: bool,
    early_args_end: bool,
}

impl<'a> CmpTokenizer<'a> {
    /// Starts lexing `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            in_action: false,
            early_args_found: false,
            early_args_end: false,
        }
    }

    /// Enables or disables action mode, in which `(` opens an inline
    /// argument list and `)` closes it.
    pub fn set_action_mode(&mut self, on: bool) {
        self.in_action = on;
    }

    /// Returns true once an inline argument list has been opened.
    #[must_use]
    pub fn early_args_found(&self) -> bool {
        self.early_args_found
    }

    /// Returns true once an inline argument list has been closed.
    #[must_use]
    pub fn early_args_end(&self) -> bool {
        self.early_args_end
    }

    /// Returns the next field, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.text.len() {
            return None;
        }

        let mut token = Token {
            text: String::new(),
            quoted: false,
        };
        let mut state = LexState::Default;

        for (offset, c) in self.text[self.pos..].char_indices() {
            let next = self.pos + offset + c.len_utf8();
            match state {
                LexState::Default => match c {
                    ' ' | '\t' => {}
                    '"' => {
                        state = LexState::InDoubleQuote;
                        token.quoted = true;
                    }
                    '\'' => {
                        state = LexState::InSingleQuote;
                        token.quoted = true;
                    }
                    '|' | ',' => {
                        self.pos = next;
                        return Some(token);
                    }
                    '(' if self.in_action => {
                        self.early_args_found = true;
                        self.pos = next;
                        return Some(token);
                    }
                    ')' if self.in_action && self.early_args_found => {
                        self.early_args_end = true;
                    }
                    _ => token.text.push(c),
                },
                LexState::InDoubleQuote => match c {
                    '"' => state = LexState::Default,
                    _ => token.text.push(c),
                },
                LexState::InSingleQuote => match c {
                    '\'' => state = LexState::Default,
                    _ => token.text.push(c),
                },
            }
        }

        // Unterminated quotes end here too.
        self.pos = self.text.len();
        Some(token)
    }
}

impl Iterator for CmpTokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Strips a `prefix:` from an argument value.
///
/// # Example
///
/// ```
/// use framedef_core::cmp::strip_arg_prefix;
///
/// assert_eq!(strip_arg_prefix("thing:ZOMBIEMAN"), "ZOMBIEMAN");
/// assert_eq!(strip_arg_prefix("12"), "12");
/// ```
#[must_use]
pub fn strip_arg_prefix(value: &str) -> &str {
    value.split_once(':').map_or(value, |(_, rest)| rest)
}

/// A parsed compressed definition. `None` fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmpFrame {
    /// Sprite name.
    pub sprite: Option<String>,
    /// Sprite frame letter or number.
    pub frame: Option<String>,
    /// Fullbright marker.
    pub fullbright: Option<String>,
    /// Duration.
    pub tics: Option<String>,
    /// Code pointer mnemonic.
    pub action: Option<String>,
    /// Successor.
    pub nextframe: Option<String>,
    /// Particle event.
    pub particle_event: Option<String>,
    /// First misc value.
    pub misc1: Option<String>,
    /// Second misc value.
    pub misc2: Option<String>,
    /// Arguments, prefixes stripped. A `*` argument is an empty string.
    pub args: Vec<String>,
    /// Arguments discarded for exceeding the list capacity.
    pub dropped_args: usize,
    /// Fields after the last slot that were ignored.
    pub extra_fields: usize,
}

/// Reads an inline argument list up to its closing `)` or end of input.
fn inline_args(tokens: &mut CmpTokenizer<'_>) -> Vec<Token> {
    let mut raw = Vec::new();
    while !tokens.early_args_end() {
        match tokens.next_token() {
            Some(token) => raw.push(token),
            None => break,
        }
    }
    // `action()` lexes as one empty field.
    if let [only] = raw.as_slice() {
        if only.text.is_empty() && !only.quoted {
            raw.clear();
        }
    }
    raw
}

/// An `action` field value, optionally written as a call.
///
/// # Example
///
/// ```
/// use framedef_core::cmp::ActionCall;
///
/// let call = ActionCall::parse("A_PlaySound(sound:pistol, 1)");
/// assert_eq!(call.name, "A_PlaySound");
/// assert_eq!(call.args, Some(vec!["sound:pistol".to_owned(), "1".to_owned()]));
///
/// assert_eq!(ActionCall::parse("A_Look").args, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    /// Code pointer mnemonic.
    pub name: String,
    /// Arguments as written, if the value had parentheses.
    pub args: Option<Vec<String>>,
}

impl ActionCall {
    /// Splits an action value into mnemonic and arguments.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut tokens = CmpTokenizer::new(text);
        tokens.set_action_mode(true);
        let name = tokens.next_token().map(|t| t.text).unwrap_or_default();
        let args = tokens
            .early_args_found()
            .then(|| inline_args(&mut tokens).into_iter().map(|t| t.text).collect());
        Self { name, args }
    }
}

fn field(token: Option<Token>) -> Option<String> {
    token.filter(|t| !t.is_default()).map(|t| t.text)
}

impl CmpFrame {
    /// Parses a compressed definition.
    ///
    /// # Example
    ///
    /// ```
    /// use framedef_core::cmp::CmpFrame;
    ///
    /// let legacy = CmpFrame::parse("TROO|A|*|10|A_Chase|S_RUN|*|*|*|1|thing:Imp");
    /// let modern = CmpFrame::parse("TROO|A|*|10|A_Chase(1, thing:Imp)|S_RUN");
    ///
    /// assert_eq!(legacy, modern);
    /// assert_eq!(modern.args, ["1", "Imp"]);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut tokens = CmpTokenizer::new(text);
        let mut frame = Self {
            sprite: field(tokens.next_token()),
            frame: field(tokens.next_token()),
            fullbright: field(tokens.next_token()),
            tics: field(tokens.next_token()),
            ..Self::default()
        };

        tokens.set_action_mode(true);
        frame.action = field(tokens.next_token());

        let inline = tokens.early_args_found();
        if inline {
            for token in inline_args(&mut tokens) {
                frame.push_arg(&token);
            }
        }
        tokens.set_action_mode(false);

        frame.nextframe = field(tokens.next_token());
        frame.particle_event = field(tokens.next_token());
        frame.misc1 = field(tokens.next_token());
        frame.misc2 = field(tokens.next_token());

        if !inline {
            for token in tokens.by_ref().take(LEGACY_ARG_FIELDS) {
                frame.push_arg(&token);
            }
        }

        frame.extra_fields = tokens.count();
        frame
    }

    /// Appends one argument field.
    ///
    /// A default marker still occupies its position as an empty argument, so
    /// `A_Chase(*, 3)` keeps `3` as the second argument.
    fn push_arg(&mut self, token: &Token) {
        if self.args.len() >= MAX_ARGS {
            self.dropped_args += 1;
            return;
        }
        let value = if token.is_default() {
            ""
        } else {
            strip_arg_prefix(&token.text)
        };
        self.args.push(value.to_owned());
    }
}
