//! C-style numeric scanning.
//!
//! Configuration text follows the conventions of `strtol(s, &end, 0)` and
//! `strtod(s, &end)`: leading whitespace is skipped, a prefix of the input
//! is converted, and the unconsumed remainder tells the caller whether the
//! whole token was a number. Several resolvers branch on exactly that, so
//! these scanners return the remainder alongside the value.

/// Scans a base-detecting integer (`0x` hex, leading `0` octal, decimal).
///
/// Returns the value and the unconsumed rest of `text`. When no digits are
/// found the value is 0 and the rest is the whole of `text`. Out-of-range
/// values saturate.
///
/// # Example
///
/// ```
/// use framedef_core::lexical::parse_long;
///
/// assert_eq!(parse_long("0x1F|rest"), (31, "|rest"));
/// assert_eq!(parse_long("010"), (8, ""));
/// assert_eq!(parse_long("S_NULL"), (0, "S_NULL"));
/// ```
#[must_use]
pub fn parse_long(text: &str) -> (i64, &str) {
    let bytes = text.as_bytes();
    let mut pos = skip_space(bytes, 0);

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let (radix, digits_start) = if bytes.get(pos) == Some(&b'0')
        && matches!(bytes.get(pos + 1), Some(b'x' | b'X'))
        && bytes.get(pos + 2).is_some_and(u8::is_ascii_hexdigit)
    {
        (16, pos + 2)
    } else if bytes.get(pos) == Some(&b'0') {
        (8, pos)
    } else {
        (10, pos)
    };

    let mut end = digits_start;
    let mut magnitude: i64 = 0;
    let mut overflow = false;
    while let Some(digit) = bytes.get(end).and_then(|&b| char::from(b).to_digit(radix)) {
        match magnitude
            .checked_mul(i64::from(radix))
            .and_then(|m| m.checked_add(i64::from(digit)))
        {
            Some(m) => magnitude = m,
            None => overflow = true,
        }
        end += 1;
    }

    if end == digits_start {
        return (0, text);
    }

    let value = match (overflow, negative) {
        (true, true) => i64::MIN,
        (true, false) => i64::MAX,
        (false, true) => -magnitude,
        (false, false) => magnitude,
    };
    (value, &text[end..])
}

/// Scans a decimal floating-point number with optional exponent.
///
/// Returns the value and the unconsumed rest of `text`; no digits means
/// `(0.0, text)`.
///
/// # Example
///
/// ```
/// use framedef_core::lexical::parse_double;
///
/// assert_eq!(parse_double("1.5e1x"), (15.0, "x"));
/// assert_eq!(parse_double(" -.25"), (-0.25, ""));
/// ```
#[must_use]
pub fn parse_double(text: &str) -> (f64, &str) {
    let bytes = text.as_bytes();
    let start = skip_space(bytes, 0);
    let mut pos = start;

    if matches!(bytes.get(pos), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(bytes, pos);
    pos += int_digits;
    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(bytes, pos + 1);
        if int_digits + frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return (0.0, text);
    }

    // Exponent only counts if at least one digit follows.
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(bytes, exp);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }

    let value = text[start..pos].parse::<f64>().unwrap_or(0.0);
    (value, &text[pos..])
}

/// Parses `text` as an integer only if the whole token is numeric.
///
/// The empty string counts as a complete parse of zero, mirroring an
/// `strtol` whose end pointer lands on the terminator.
#[must_use]
pub fn parse_long_exact(text: &str) -> Option<i64> {
    match parse_long(text) {
        (value, "") => Some(value),
        _ => None,
    }
}

/// Returns true if `text` names something rather than a number.
///
/// This is the test argument evaluators use to choose between a by-name
/// and a by-id lookup.
#[must_use]
pub fn is_name(text: &str) -> bool {
    !parse_long(text).1.is_empty()
}

/// Narrows a scanned integer to `i32`, saturating.
#[must_use]
pub fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn skip_space(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

fn count_digits(bytes: &[u8], pos: usize) -> usize {
    bytes[pos.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod long_tests {
        use super::*;

        #[test]
        fn decimal_with_sign_and_space() {
            assert_eq!(parse_long("  -42"), (-42, ""));
            assert_eq!(parse_long("+7tics"), (7, "tics"));
        }

        #[test]
        fn hex_requires_digit_after_prefix() {
            assert_eq!(parse_long("0xff"), (255, ""));
            // "0x" without hex digits parses the zero and leaves "x".
            assert_eq!(parse_long("0xg"), (0, "xg"));
        }

        #[test]
        fn octal_stops_at_non_octal_digit() {
            assert_eq!(parse_long("0178"), (15, "8"));
        }

        #[test]
        fn no_digits_returns_whole_input() {
            assert_eq!(parse_long(""), (0, ""));
            assert_eq!(parse_long("-"), (0, "-"));
            assert_eq!(parse_long("ZOMBIEMAN"), (0, "ZOMBIEMAN"));
        }

        #[test]
        fn overflow_saturates() {
            assert_eq!(parse_long("99999999999999999999").0, i64::MAX);
            assert_eq!(parse_long("-99999999999999999999").0, i64::MIN);
            assert_eq!(saturate_i32(i64::MAX), i32::MAX);
            assert_eq!(saturate_i32(-5), -5);
        }

        #[test]
        fn exact_and_name_classification() {
            assert_eq!(parse_long_exact("12"), Some(12));
            assert_eq!(parse_long_exact(""), Some(0));
            assert_eq!(parse_long_exact("12a"), None);
            assert!(is_name("S_SPAWN"));
            assert!(!is_name("0x10"));
            assert!(!is_name(""));
        }
    }

    mod double_tests {
        use super::*;

        #[test]
        fn fraction_forms() {
            assert_eq!(parse_double("2."), (2.0, ""));
            assert_eq!(parse_double(".5"), (0.5, ""));
            assert_eq!(parse_double("3.25rest"), (3.25, "rest"));
        }

        #[test]
        fn dangling_exponent_is_not_consumed() {
            assert_eq!(parse_double("1e"), (1.0, "e"));
            assert_eq!(parse_double("1e+x"), (1.0, "e+x"));
        }

        #[test]
        fn not_a_number() {
            assert_eq!(parse_double("."), (0.0, "."));
            assert_eq!(parse_double("abc"), (0.0, "abc"));
        }
    }
}
