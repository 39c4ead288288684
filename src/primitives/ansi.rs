//! Raw ANSI control sequences used by the script picker.
//!
//! The picker writes these directly instead of going through a terminal
//! abstraction so that every frame is a single byte-exact buffer.

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CLEAR_SCROLLBACK: &str = "\x1b[3J";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const ENABLE_ALT_SCREEN: &str = "\x1b[?1049h";
pub const DISABLE_ALT_SCREEN: &str = "\x1b[?1049l";
/// Button tracking, drag tracking and the SGR extended encoding.
pub const ENABLE_MOUSE: &str = "\x1b[?1000h\x1b[?1002h\x1b[?1006h";
pub const DISABLE_MOUSE: &str = "\x1b[?1000l\x1b[?1002l\x1b[?1006l";
pub const CLEAR_LINE: &str = "\x1b[K";
pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// Raw mode disables output post-processing, so lines end in an explicit CR.
pub const NEWLINE: &str = "\r\n";

pub const FG_YELLOW: &str = "\x1b[33m";
pub const FG_BOLD_YELLOW: &str = "\x1b[1;33m";
pub const FG_BLUE: &str = "\x1b[34m";
pub const FG_MAGENTA: &str = "\x1b[35m";
pub const FG_DIM: &str = "\x1b[2m";
pub const FG_PINK_256: &str = "\x1b[38;5;198m";
pub const BG_GRAY_256: &str = "\x1b[48;5;237m";

pub const SEARCH_MARKER_COLOR: &str = FG_BLUE;
pub const SELECTION_MARKER_COLOR: &str = FG_PINK_256;
pub const SELECTED_BG: &str = BG_GRAY_256;
