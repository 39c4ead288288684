//! Interactive flows that own the terminal.

pub mod script_prompt;

pub use script_prompt::{show_script_prompt, PromptError, PromptOptions, PromptOutcome};
