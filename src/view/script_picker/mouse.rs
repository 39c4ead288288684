//! Mouse handling for the script picker.

use super::state::{Click, ListLayout, ScriptPicker};
use crate::input::{MouseEvent, MouseEventKind};
use std::time::Duration;

/// Two clicks on the same row within this window run the script.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

impl ScriptPicker {
    /// Apply a mouse event. Returns true on a double-click that confirms the selection.
    pub fn handle_mouse(&mut self, event: &MouseEvent, layout: &ListLayout) -> bool {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_up();
                false
            }
            MouseEventKind::ScrollDown => {
                self.scroll_down();
                false
            }
            MouseEventKind::Click => self.click(event.y, layout),
        }
    }

    fn click(&mut self, row: u16, layout: &ListLayout) -> bool {
        let Some(offset) = row.checked_sub(layout.first_row) else {
            return false;
        };
        let index = layout.start + usize::from(offset);
        if index >= layout.end || index >= self.filtered_len() {
            return false;
        }

        let now = self.time_source.now();
        let double = self.last_click.is_some_and(|last| {
            last.row == row && self.time_source.elapsed_since(last.at) < DOUBLE_CLICK_WINDOW
        });

        self.selected = index;
        if double {
            tracing::debug!(index, "double-click");
            self.last_click = None;
            return true;
        }

        self.last_click = Some(Click { row, at: now });
        false
    }
}
