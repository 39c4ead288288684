//! Script picker state
//!
//! Owns the candidate scripts, the query, the filtered ranking, the
//! selection cursor and the scroll offset. Nothing here touches the
//! terminal; the controller feeds events in and renders what comes out.

use crate::input::fuzzy::{fuzzy_match, fuzzy_score};
use crate::input::InputEvent;
use crate::model::Script;
use crate::services::time_source::SharedTimeSource;
use std::time::Instant;

/// Rows kept between the cursor and the viewport edge while scrolling
pub const SCROLL_THRESHOLD: usize = 3;

/// What the controller should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed, draw a new frame
    Redraw,
    /// Nothing changed
    Idle,
    /// Run the selected script
    Confirm,
    Cancel,
}

/// Where the visible scripts ended up on screen in the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListLayout {
    /// 1-based terminal row of the first visible script
    pub first_row: u16,
    /// Visible range `[start, end)` of the filtered list
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Click {
    pub(super) row: u16,
    pub(super) at: Instant,
}

#[derive(Debug)]
pub struct ScriptPicker {
    scripts: Vec<Script>,
    /// Indices into `scripts`, best match first
    filtered: Vec<usize>,
    pub(super) selected: usize,
    query: String,
    view_start: usize,
    pub(super) last_click: Option<Click>,
    pub(super) time_source: SharedTimeSource,
}

impl ScriptPicker {
    pub fn new(scripts: Vec<Script>, time_source: SharedTimeSource) -> Self {
        let filtered = (0..scripts.len()).collect();
        Self {
            scripts,
            filtered,
            selected: 0,
            query: String::new(),
            view_start: 0,
            last_click: None,
            time_source,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn view_start(&self) -> usize {
        self.view_start
    }

    pub fn total(&self) -> usize {
        self.scripts.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered_script(&self, index: usize) -> Option<&Script> {
        self.filtered.get(index).map(|&i| &self.scripts[i])
    }

    pub fn filtered_scripts(&self) -> impl Iterator<Item = &Script> + '_ {
        self.filtered.iter().map(|&i| &self.scripts[i])
    }

    /// The script under the cursor, `None` when nothing matches.
    pub fn selected_script(&self) -> Option<&Script> {
        self.filtered_script(self.selected)
    }

    /// Append typed text to the query. Returns false when nothing was appended.
    pub fn push_str(&mut self, text: &str) -> bool {
        let before = self.query.len();
        self.query
            .extend(text.chars().filter(|c| !c.is_control()));
        if self.query.len() == before {
            return false;
        }
        self.refilter();
        true
    }

    /// Remove the last character of the query. Returns false if it was empty.
    pub fn backspace(&mut self) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.refilter();
        true
    }

    fn refilter(&mut self) {
        if self.query.is_empty() {
            self.filtered = (0..self.scripts.len()).collect();
        } else {
            let query = self.query.as_str();
            let mut scored: Vec<(i32, usize)> = self
                .scripts
                .iter()
                .enumerate()
                .filter(|(_, s)| fuzzy_match(&s.name, query) || fuzzy_match(&s.command, query))
                .map(|(i, s)| {
                    let score = fuzzy_score(&s.name, query).min(fuzzy_score(&s.command, query));
                    (score, i)
                })
                .collect();
            // stable: equal scores keep manifest order
            scored.sort_by_key(|&(score, _)| score);
            self.filtered = scored.into_iter().map(|(_, i)| i).collect();
        }

        self.selected = self.selected.min(self.filtered.len().saturating_sub(1));
        self.view_start = 0;
        tracing::debug!(
            query = %self.query,
            matches = self.filtered.len(),
            "filtered scripts"
        );
    }

    pub fn move_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected = match self.selected {
            0 => self.filtered.len() - 1,
            n => n - 1,
        };
    }

    pub fn move_down(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected = if self.selected + 1 < self.filtered.len() {
            self.selected + 1
        } else {
            0
        };
    }

    /// Like [`move_up`](Self::move_up) but stops at the first entry.
    pub fn scroll_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Like [`move_down`](Self::move_down) but stops at the last entry.
    pub fn scroll_down(&mut self) {
        if self.selected + 1 < self.filtered.len() {
            self.selected += 1;
        }
    }

    /// Visible range `[start, end)` for a list area of `max_height` rows.
    ///
    /// Keeps the cursor at least [`SCROLL_THRESHOLD`] rows away from either
    /// edge when the list is taller than the area.
    pub fn viewport(&self, max_height: usize) -> (usize, usize) {
        let len = self.filtered.len();
        if len <= max_height {
            return (0, len);
        }

        let mut start = self.view_start;
        if self.selected < start + SCROLL_THRESHOLD {
            start = self.selected.saturating_sub(SCROLL_THRESHOLD);
        }
        if self.selected + SCROLL_THRESHOLD >= start + max_height {
            start = (self.selected + SCROLL_THRESHOLD + 1).saturating_sub(max_height);
        }
        start = start.min(self.selected).min(len - max_height);
        (start, start + max_height)
    }

    /// Remember the scroll offset a frame was drawn with.
    pub fn commit_layout(&mut self, layout: &ListLayout) {
        self.view_start = layout.start;
    }

    pub fn handle_event(&mut self, event: &InputEvent, layout: &ListLayout) -> Transition {
        match event {
            InputEvent::Escape | InputEvent::CtrlC => Transition::Cancel,
            InputEvent::Enter => {
                if self.selected_script().is_some() {
                    Transition::Confirm
                } else {
                    Transition::Idle
                }
            }
            InputEvent::ArrowUp => {
                self.move_up();
                Transition::Redraw
            }
            InputEvent::ArrowDown => {
                self.move_down();
                Transition::Redraw
            }
            InputEvent::Backspace => {
                if self.backspace() {
                    Transition::Redraw
                } else {
                    Transition::Idle
                }
            }
            InputEvent::Text(text) => {
                if self.push_str(text) {
                    Transition::Redraw
                } else {
                    Transition::Idle
                }
            }
            InputEvent::Mouse(mouse) => {
                if self.handle_mouse(mouse, layout) && self.selected_script().is_some() {
                    Transition::Confirm
                } else {
                    Transition::Redraw
                }
            }
        }
    }
}
