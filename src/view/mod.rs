//! Presentation layer.

pub mod script_picker;
