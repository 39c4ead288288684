//! Interactive script picker
//!
//! [`ScriptPicker`] holds the state, [`render`] draws it. The event loop
//! that connects them to a terminal lives in `app::script_prompt`.

mod mouse;
pub mod render;
mod state;

pub use mouse::DOUBLE_CLICK_WINDOW;
pub use render::{render, Frame};
pub use state::{ListLayout, ScriptPicker, Transition, SCROLL_THRESHOLD};
