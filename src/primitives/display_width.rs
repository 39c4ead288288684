//! Display width calculation for Unicode text
//!
//! Terminal columns are not bytes and not chars: CJK characters and most
//! emoji take two columns, combining marks and control characters take none.
//! Column layout in the picker is computed with these helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Appended to text that had to be cut to fit its column.
pub const ELLIPSIS: &str = "...";

/// Calculate the display width of a single character.
///
/// Returns 0 for control characters and zero-width characters,
/// 2 for CJK/fullwidth characters and emoji,
/// 1 for most other characters.
#[inline]
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Calculate the display width of a string.
#[inline]
pub fn str_width(s: &str) -> usize {
    s.width()
}

/// Cut `text` so that it occupies at most `max_width` columns.
///
/// Text that already fits is returned unchanged. Otherwise whole characters
/// are kept while they fit in `max_width - ELLIPSIS.len()` columns and the
/// ellipsis is appended. A budget no larger than the ellipsis itself yields a
/// prefix of the ellipsis.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 || text.is_empty() {
        return String::new();
    }

    if str_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = str_width(ELLIPSIS);
    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let limit = max_width - ellipsis_width;
    let mut out = String::with_capacity(text.len().min(limit * 4) + ELLIPSIS.len());
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > limit {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}
