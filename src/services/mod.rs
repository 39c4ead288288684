//! Services and external integrations
//!
//! This module contains the code that deals with the terminal, the
//! filesystem, external processes and the npm registry.

pub mod detector;
pub mod executor;
pub mod log_dirs;
pub mod registry;
pub mod signal_handler;
pub mod terminal_modes;
pub mod time_source;
pub mod tracing_setup;
