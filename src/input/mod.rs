//! Keyboard and mouse input for the script picker.

pub mod decoder;
pub mod fuzzy;
pub mod key_classifier;

pub use decoder::{InputDecoder, InputEvent};
pub use key_classifier::{MouseEvent, MouseEventKind};
