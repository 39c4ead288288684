//! Frame rendering for the script picker
//!
//! `render` turns a picker snapshot and a terminal size into one string of
//! bytes. The frame redraws the whole screen: the list sits at the bottom,
//! above a `(selected/total)` counter rule and the search line.

use super::state::{ListLayout, ScriptPicker};
use crate::input::fuzzy::{find_subsequence, fold, fold_char};
use crate::primitives::ansi;
use crate::primitives::display_width::{str_width, truncate_to_width};

pub const SELECTION_MARKER: &str = "▌";
pub const EMPTY_STATE: &str = "No matching scripts";
const RULE: &str = "─";
const PROMPT: &str = "> ";

/// Narrower terminals are laid out as if they were this wide
const MIN_AVAILABLE_WIDTH: usize = 20;
/// Share of the available width given to script names, in tenths
const NAME_COLUMN_TENTHS: usize = 4;
const COLUMN_GAP: usize = 2;

/// A rendered frame and where its rows landed.
#[derive(Debug, Clone)]
pub struct Frame {
    pub output: String,
    pub layout: ListLayout,
}

/// Rows available for the list on a terminal `rows` tall.
///
/// Never more than the screen leaves above the counter and search lines, so
/// a frame does not scroll the terminal and clicks land on the drawn rows.
pub fn list_height(rows: u16) -> usize {
    usize::from(rows).saturating_sub(2).max(1)
}

pub fn render(picker: &ScriptPicker, (cols, rows): (u16, u16)) -> Frame {
    let max_height = list_height(rows);
    let cols = usize::from(cols);
    let rows = usize::from(rows);
    let mut out = String::with_capacity(cols * rows * 2);

    out.push_str(ansi::CLEAR_SCREEN);
    out.push_str(ansi::CLEAR_SCROLLBACK);
    out.push_str(ansi::CURSOR_HOME);
    out.push_str(ansi::HIDE_CURSOR);

    let available = cols.saturating_sub(4).max(MIN_AVAILABLE_WIDTH);
    let name_budget = available * NAME_COLUMN_TENTHS / 10;
    let command_budget = available - name_budget - COLUMN_GAP;

    let name_column = picker
        .filtered_scripts()
        .map(|s| str_width(&truncate_to_width(&s.name, name_budget)))
        .max()
        .unwrap_or(0);

    let (start, end) = picker.viewport(max_height);
    let list_lines = rows.saturating_sub(2);
    let shown = if picker.filtered_len() == 0 {
        1
    } else {
        end - start
    };
    let padding = list_lines.saturating_sub(shown);
    for _ in 0..padding {
        out.push_str(ansi::CLEAR_LINE);
        out.push_str(ansi::NEWLINE);
    }

    let layout = ListLayout {
        first_row: u16::try_from(padding + 1).unwrap_or(u16::MAX),
        start,
        end,
    };

    if picker.filtered_len() == 0 {
        out.push_str("  ");
        out.push_str(ansi::FG_DIM);
        out.push_str(EMPTY_STATE);
        out.push_str(ansi::RESET);
        out.push_str(ansi::NEWLINE);
    }

    let query = picker.query();
    for index in start..end {
        let Some(script) = picker.filtered_script(index) else {
            break;
        };
        let selected = index == picker.selected_index();
        if selected {
            out.push_str(ansi::BOLD);
            out.push_str(ansi::FG_MAGENTA);
            out.push_str(ansi::SELECTED_BG);
            out.push_str(ansi::SELECTION_MARKER_COLOR);
            out.push_str(SELECTION_MARKER);
            out.push_str(ansi::RESET);
            out.push_str(ansi::BOLD);
            out.push_str(ansi::SELECTED_BG);
            out.push(' ');
        } else {
            out.push_str("  ");
        }

        let name = truncate_to_width(&script.name, name_budget);
        let command = truncate_to_width(&script.command, command_budget);
        let name_width = str_width(&name);
        let command_width = str_width(&command);

        out.push_str(&highlight_match(&name, query, selected));
        out.push_str(&" ".repeat(name_column.saturating_sub(name_width)));
        out.push_str("  ");
        out.push_str(&highlight_match(&command, query, selected));

        if selected {
            let used = 2 + name_column + COLUMN_GAP + command_width;
            out.push_str(&" ".repeat(cols.saturating_sub(used)));
            out.push_str(ansi::RESET);
        }
        out.push_str(ansi::NEWLINE);
    }

    let counter = if picker.filtered_len() > 0 {
        format!("({}/{})", picker.selected_index() + 1, picker.filtered_len())
    } else {
        "(0/0)".to_string()
    };
    out.push_str(&counter);
    out.push_str(&RULE.repeat(cols.saturating_sub(counter.len())));
    out.push_str(ansi::NEWLINE);

    out.push_str(ansi::BOLD);
    out.push_str(ansi::SEARCH_MARKER_COLOR);
    out.push_str(PROMPT);
    out.push_str(ansi::RESET);
    out.push_str(ansi::BOLD);
    out.push_str(query);
    out.push_str(ansi::SHOW_CURSOR);

    Frame {
        output: out,
        layout,
    }
}

/// Colour the part of `text` that matched `query`.
///
/// A contiguous case-insensitive occurrence is highlighted as one span;
/// otherwise each subsequence character is highlighted on its own.
pub fn highlight_match(text: &str, query: &str, selected: bool) -> String {
    if query.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let (color, reset) = if selected {
        (ansi::FG_BOLD_YELLOW, format!("{}{}", ansi::RESET, ansi::SELECTED_BG))
    } else {
        (ansi::FG_YELLOW, ansi::RESET.to_string())
    };

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold_char).collect();
    let needle = fold(query);

    let mut out = String::with_capacity(text.len() + 16);
    if let Some(at) = find_subsequence(&folded, &needle) {
        let end = at + needle.len();
        out.extend(&chars[..at]);
        out.push_str(color);
        out.extend(&chars[at..end]);
        out.push_str(&reset);
        out.extend(&chars[end..]);
        return out;
    }

    let mut qi = 0;
    for (c, f) in chars.iter().zip(&folded) {
        if qi < needle.len() && *f == needle[qi] {
            out.push_str(color);
            out.push(*c);
            out.push_str(&reset);
            qi += 1;
        } else {
            out.push(*c);
        }
    }
    out
}
