//! Low-level text and terminal primitives shared by the picker.

pub mod ansi;
pub mod display_width;
