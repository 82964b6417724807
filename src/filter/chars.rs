//! Typographic character normalization.

use std::borrow::Cow;

use super::TextFilter;

/// Maps typographic characters that word processors love to ASCII/Latin-1
/// cognates.
///
/// | Source | Replacement |
/// |--------|-------------|
/// | `‘ ’ ‚` | `'` |
/// | `“ ” „` | `"` |
/// | `…` | `...` |
/// | `– —` | `-` |
/// | `ˆ` | `^` |
/// | `‹` | `<` |
/// | `›` | `>` |
/// | `˜`, no-break space | space |
///
/// # Example
///
/// ```
/// use paste_sanitizer::CharNormalizer;
///
/// assert_eq!(CharNormalizer::normalize("\u{201C}Hi\u{201D}\u{2026}"), "\"Hi\"...");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CharNormalizer;

impl CharNormalizer {
    /// Normalize `text`, borrowing it unchanged when nothing needs mapping.
    pub fn normalize(text: &str) -> Cow<'_, str> {
        if !text.chars().any(|c| replacement(c).is_some()) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match replacement(c) {
                Some(r) => out.push_str(r),
                None => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

fn replacement(c: char) -> Option<&'static str> {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' => Some("'"),
        '\u{201C}' | '\u{201D}' | '\u{201E}' => Some("\""),
        '\u{2026}' => Some("..."),
        '\u{2013}' | '\u{2014}' => Some("-"),
        '\u{02C6}' => Some("^"),
        '\u{2039}' => Some("<"),
        '\u{203A}' => Some(">"),
        '\u{02DC}' | '\u{00A0}' => Some(" "),
        _ => None,
    }
}

impl TextFilter for CharNormalizer {
    fn filter(&self, markup: &str) -> String {
        Self::normalize(markup).into_owned()
    }
}
