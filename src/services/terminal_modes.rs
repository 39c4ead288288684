//! Terminal mode management
//!
//! This module handles enabling and disabling the terminal modes the script
//! picker needs:
//! - Raw mode
//! - Alternate screen
//! - SGR mouse tracking
//!
//! `TerminalModes` tracks which modes were enabled and restores the terminal
//! to its original state via `undo()`, which also runs on drop.

use crate::primitives::ansi;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::tty::IsTty;
use std::io::{self, stdin, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Size reported when the terminal cannot be queried.
pub const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Set while a `TerminalModes` guard holds the terminal.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Tracks which terminal modes have been enabled and provides cleanup.
#[derive(Debug, Default)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
    mouse_tracking: bool,
}

impl TerminalModes {
    /// Put the terminal into raw mode and optionally enter the alternate
    /// screen and enable mouse tracking.
    ///
    /// Fails when stdin is not a terminal. On error, anything partially
    /// enabled is undone before returning.
    pub fn enable(mouse: bool, alternate_screen: bool) -> io::Result<Self> {
        if !stdin().is_tty() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdin is not a terminal",
            ));
        }

        let mut modes = Self::default();

        if let Err(e) = enable_raw_mode() {
            tracing::error!("Failed to enable raw mode: {}", e);
            return Err(e);
        }
        modes.raw_mode = true;
        ACTIVE.store(true, Ordering::SeqCst);
        tracing::debug!("Enabled raw mode");

        let mut out = stdout();
        if alternate_screen {
            if let Err(e) = out.write_all(ansi::ENABLE_ALT_SCREEN.as_bytes()) {
                tracing::error!("Failed to enter alternate screen: {}", e);
                modes.undo();
                return Err(e);
            }
            modes.alternate_screen = true;
            tracing::debug!("Entered alternate screen");
        }

        if mouse {
            if let Err(e) = out.write_all(ansi::ENABLE_MOUSE.as_bytes()) {
                // Non-fatal, the picker works from the keyboard alone
                tracing::warn!("Failed to enable mouse tracking: {}", e);
            } else {
                modes.mouse_tracking = true;
                tracing::debug!("Enabled SGR mouse tracking");
            }
        }

        if let Err(e) = out.flush() {
            modes.undo();
            return Err(e);
        }
        Ok(modes)
    }

    /// Restore the terminal by disabling every mode this guard enabled.
    ///
    /// Safe to call more than once.
    pub fn undo(&mut self) {
        self.restore(&mut stdout());
    }

    /// Write the sequences that leave the enabled modes to `out`.
    fn restore<W: Write>(&mut self, out: &mut W) {
        if self.mouse_tracking {
            let _ = out.write_all(ansi::DISABLE_MOUSE.as_bytes());
            self.mouse_tracking = false;
            tracing::debug!("Disabled mouse tracking");
        }

        if self.raw_mode {
            let _ = out.write_all(ansi::RESET.as_bytes());
            let _ = out.write_all(ansi::SHOW_CURSOR.as_bytes());
            let _ = out.flush();
            let _ = disable_raw_mode();
            self.raw_mode = false;
            tracing::debug!("Disabled raw mode");

            if self.alternate_screen {
                let _ = out.write_all(ansi::DISABLE_ALT_SCREEN.as_bytes());
                self.alternate_screen = false;
                tracing::debug!("Left alternate screen");
            } else {
                let _ = out.write_all(ansi::CURSOR_HOME.as_bytes());
                let _ = out.write_all(ansi::CLEAR_SCREEN.as_bytes());
            }
            ACTIVE.store(false, Ordering::SeqCst);
        }

        let _ = out.flush();
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Restore terminal state from a panic hook, where the guard is out of reach.
///
/// Does nothing unless a `TerminalModes` guard is currently active.
pub fn emergency_cleanup() {
    if !ACTIVE.swap(false, Ordering::SeqCst) {
        return;
    }
    let mut out = stdout();
    let _ = out.write_all(ansi::DISABLE_MOUSE.as_bytes());
    let _ = out.write_all(ansi::RESET.as_bytes());
    let _ = out.write_all(ansi::SHOW_CURSOR.as_bytes());
    let _ = disable_raw_mode();
    let _ = out.write_all(ansi::DISABLE_ALT_SCREEN.as_bytes());
    let _ = out.flush();
}

/// Current terminal size as `(columns, rows)`, or `DEFAULT_SIZE` if unknown.
pub fn terminal_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (cols, rows),
        Ok(_) => DEFAULT_SIZE,
        Err(e) => {
            tracing::debug!("Terminal size unavailable: {}", e);
            DEFAULT_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_cleanup_without_guard_is_noop() {
        ACTIVE.store(false, Ordering::SeqCst);
        emergency_cleanup();
        assert!(!ACTIVE.load(Ordering::SeqCst));
    }

    #[test]
    fn test_restore_on_empty_guard_writes_nothing() {
        let mut modes = TerminalModes::default();
        let mut out = Vec::new();
        modes.restore(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_restore_leaves_every_enabled_mode() {
        // raw mode was never really entered, so disabling it is a no-op
        let mut modes = TerminalModes {
            raw_mode: true,
            alternate_screen: true,
            mouse_tracking: true,
        };
        let mut out = Vec::new();
        modes.restore(&mut out);

        let written = String::from_utf8(out).unwrap();
        let mouse_off = written.find(ansi::DISABLE_MOUSE).unwrap();
        let cursor_on = written.find(ansi::SHOW_CURSOR).unwrap();
        let alt_off = written.find(ansi::DISABLE_ALT_SCREEN).unwrap();
        assert!(mouse_off < cursor_on && cursor_on < alt_off);
        assert!(!written.contains(ansi::CLEAR_SCREEN));

        assert!(!modes.raw_mode);
        assert!(!modes.alternate_screen);
        assert!(!modes.mouse_tracking);

        let mut again = Vec::new();
        modes.restore(&mut again);
        assert!(again.is_empty());
    }

    #[test]
    fn test_restore_without_alternate_screen_clears() {
        let mut modes = TerminalModes {
            raw_mode: true,
            alternate_screen: false,
            mouse_tracking: false,
        };
        let mut out = Vec::new();
        modes.restore(&mut out);

        let written = String::from_utf8(out).unwrap();
        assert!(!written.contains(ansi::DISABLE_MOUSE));
        assert!(!written.contains(ansi::DISABLE_ALT_SCREEN));
        assert!(written.ends_with(&format!("{}{}", ansi::CURSOR_HOME, ansi::CLEAR_SCREEN)));
        assert!(!modes.raw_mode);
    }

    #[test]
    fn test_terminal_size_is_never_zero() {
        let (cols, rows) = terminal_size();
        assert!(cols > 0);
        assert!(rows > 0);
    }
}
