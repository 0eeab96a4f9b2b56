use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Matches a doubled backslash, a lowercase `u`, and exactly four hex digits.
/// Upstream error bodies arrive pre-escaped, so the sequences carry two
/// literal backslashes; single-backslash escapes are deliberately not matched.
static ESCAPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\u([0-9a-fA-F]{4})").expect("escape pattern compiles"));

/// Decode `\\uXXXX` escape sequences into their literal Unicode characters.
///
/// Replacement is non-overlapping and left-to-right in a single pass.
/// Anything that does not match the pattern passes through unchanged,
/// including truncated or non-hex sequences. A hex value outside the valid
/// scalar range (the surrogate block) is also left as literal text.
pub fn decode_unicode_escapes(text: &str) -> Cow<'_, str> {
    ESCAPE_PATTERN.replace_all(text, |caps: &Captures| {
        match u32::from_str_radix(&caps[1], 16).ok().and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}
