//! Incremental decoding of terminal input
//!
//! Reads from a raw-mode terminal return whatever bytes happen to be
//! available. One read may hold a single key, several mouse reports from a
//! fast wheel spin, a pasted string, or only the first half of an escape
//! sequence. [`InputDecoder`] turns that stream into [`InputEvent`]s:
//!
//! - a chunk that is exactly one control byte is a key (Enter, Escape, ...)
//! - CSI sequences (`ESC [ ... final`) are split out and classified on their own
//! - everything else is text; control characters inside it are dropped
//! - an unterminated CSI sequence or UTF-8 character at the end of a chunk is
//!   carried into the next one, up to [`MAX_SEQUENCE_LEN`] bytes

use super::key_classifier::{
    is_arrow_down, is_arrow_up, is_backspace, is_ctrl_c, is_enter, is_escape, parse_mouse_event,
    MouseEvent,
};

/// Longest partial sequence kept between reads. SGR mouse reports are the
/// longest sequences the picker understands.
pub const MAX_SEQUENCE_LEN: usize = 20;

const ESC: u8 = 0x1b;

/// A semantic input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Backspace,
    CtrlC,
    /// One or more printable characters to append to the query
    Text(String),
    Mouse(MouseEvent),
}

#[derive(Debug, Default)]
pub struct InputDecoder {
    pending: Vec<u8>,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back from previous chunks.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Decode one chunk as returned by a terminal read.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if chunk.is_empty() {
            return events;
        }

        if self.pending == [ESC] && chunk[0] != b'[' {
            // the held ESC did not start a CSI sequence, so it was a key press
            self.pending.clear();
            events.push(InputEvent::Escape);
        }

        if self.pending.is_empty() {
            if let Some(key) = classify_single_key(chunk) {
                events.push(key);
                return events;
            }
        }

        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(chunk);

        let mut text_start = 0;
        let mut i = 0;
        while i < buf.len() {
            if buf[i] != ESC {
                i += 1;
                continue;
            }

            self.flush_text(&buf[text_start..i], false, &mut events);

            if i + 1 == buf.len() {
                // lone ESC at the end of a longer chunk: wait for the rest
                self.pending.push(ESC);
                return events;
            }

            if buf[i + 1] != b'[' {
                // Alt-modified key or unsupported introducer
                i += 1;
                text_start = i;
                continue;
            }

            match find_csi_end(&buf[i + 2..]) {
                Some(offset) => {
                    let end = i + 2 + offset + 1;
                    if let Some(event) = classify_sequence(&buf[i..end]) {
                        events.push(event);
                    } else {
                        tracing::debug!(len = end - i, "ignoring unrecognised escape sequence");
                    }
                    i = end;
                    text_start = i;
                }
                None => {
                    let rest = &buf[i..];
                    if rest.len() <= MAX_SEQUENCE_LEN {
                        self.pending.extend_from_slice(rest);
                    } else {
                        tracing::debug!(len = rest.len(), "dropping oversized escape sequence");
                    }
                    return events;
                }
            }
        }

        self.flush_text(&buf[text_start..], true, &mut events);
        events
    }

    /// Decode `bytes` as text and push it as one event.
    ///
    /// Invalid UTF-8 is discarded. An incomplete character at the very end of
    /// the chunk is kept for the next read when `at_end` is set.
    fn flush_text(&mut self, bytes: &[u8], at_end: bool, events: &mut Vec<InputEvent>) {
        let mut text = String::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    push_printable(&mut text, valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // valid_up_to guarantees this prefix decodes
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        push_printable(&mut text, valid);
                    }
                    match err.error_len() {
                        Some(bad) => rest = &after[bad..],
                        None => {
                            if at_end {
                                self.pending.extend_from_slice(after);
                            }
                            break;
                        }
                    }
                }
            }
        }

        if !text.is_empty() {
            events.push(InputEvent::Text(text));
        }
    }
}

fn push_printable(out: &mut String, text: &str) {
    out.extend(text.chars().filter(|c| !c.is_control()));
}

fn classify_single_key(chunk: &[u8]) -> Option<InputEvent> {
    if is_enter(chunk) {
        Some(InputEvent::Enter)
    } else if is_escape(chunk) {
        Some(InputEvent::Escape)
    } else if is_backspace(chunk) {
        Some(InputEvent::Backspace)
    } else if is_ctrl_c(chunk) {
        Some(InputEvent::CtrlC)
    } else {
        None
    }
}

fn classify_sequence(seq: &[u8]) -> Option<InputEvent> {
    if let Some(mouse) = parse_mouse_event(seq) {
        Some(InputEvent::Mouse(mouse))
    } else if is_arrow_up(seq) {
        Some(InputEvent::ArrowUp)
    } else if is_arrow_down(seq) {
        Some(InputEvent::ArrowDown)
    } else {
        None
    }
}

/// Index of the CSI final byte (0x40..=0x7e) within the parameter bytes.
fn find_csi_end(params: &[u8]) -> Option<usize> {
    params.iter().position(|b| (0x40..=0x7e).contains(b))
}
