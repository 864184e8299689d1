//! Subcommand implementations.

pub mod list;
pub mod verify;
