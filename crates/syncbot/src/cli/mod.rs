//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the syncbot binary.

mod commands;
mod environment;
mod handlers;

pub use commands::{Cli, Commands};
pub use environment::Environment;
pub use handlers::{list_members, list_roles, plan_once, run_loop, run_once};
