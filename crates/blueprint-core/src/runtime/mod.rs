//! External tool invocation and detection
//!
//! This module provides:
//! - The [`CommandRunner`] seam every backend spawns its tool through
//! - Version probes used by backend availability checks

pub mod check;
pub mod command;

pub use check::{probe_tool, ToolInfo};
pub use command::{CommandOutput, CommandRunner, Invocation, SystemRunner};
