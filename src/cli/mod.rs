//! Command-line interface for trackbridge.
//!
//! This module provides CLI commands for converting links between
//! streaming services, inspecting song identities, and persisting
//! credentials.

mod commands;

pub use commands::{Cli, Commands, run_command};
