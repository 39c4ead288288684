//! Classification of raw terminal byte chunks
//!
//! Every function here looks at one chunk in isolation. Chunks that hold
//! several keys or partial sequences are first split by
//! [`InputDecoder`](super::decoder::InputDecoder).

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// What a recognised SGR mouse report means to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Click,
    ScrollUp,
    ScrollDown,
}

/// A decoded SGR mouse report. Coordinates are 1-based terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
}

pub fn is_arrow_up(key: &[u8]) -> bool {
    key == [ESC, b'[', b'A']
}

pub fn is_arrow_down(key: &[u8]) -> bool {
    key == [ESC, b'[', b'B']
}

pub fn is_enter(key: &[u8]) -> bool {
    matches!(key, [b'\r'] | [b'\n'])
}

/// A lone ESC byte. An ESC that starts a longer sequence is never a bare Escape.
pub fn is_escape(key: &[u8]) -> bool {
    key == [ESC]
}

pub fn is_backspace(key: &[u8]) -> bool {
    matches!(key, [DELETE] | [BACKSPACE])
}

pub fn is_ctrl_c(key: &[u8]) -> bool {
    key == [CTRL_C]
}

/// Parse an SGR mouse report `ESC [ < Cb ; Cx ; Cy (M|m)`.
///
/// Button codes 0-2 are clicks, 64 and 65 the wheel. Releases of buttons 0-2
/// and every other button code yield `None`.
pub fn parse_mouse_event(key: &[u8]) -> Option<MouseEvent> {
    let body = key.strip_prefix(&[ESC, b'[', b'<'])?;
    let (&final_byte, params) = body.split_last()?;
    let pressed = match final_byte {
        b'M' => true,
        b'm' => false,
        _ => return None,
    };

    let params = std::str::from_utf8(params).ok()?;
    let mut parts = params.split(';');
    let button: u16 = parts.next()?.parse().ok()?;
    let x: u16 = parts.next()?.parse().ok()?;
    let y: u16 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let kind = match button {
        0..=2 if pressed => MouseEventKind::Click,
        0..=2 => return None,
        64 => MouseEventKind::ScrollUp,
        65 => MouseEventKind::ScrollDown,
        _ => return None,
    };

    Some(MouseEvent { kind, x, y })
}
