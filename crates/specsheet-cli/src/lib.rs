//! Specsheet CLI library.
//!
//! Configuration loading, command execution, terminal rendering and CSV
//! export for the `specsheet` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
