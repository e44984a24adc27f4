//! Init command implementation.

use crate::cli::InitArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the init command.
pub async fn execute_init(args: InitArgs, path: &Path, formatter: &Formatter) -> Result<()> {
    write_template(path, args.force)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote template configuration to {}", path.display()))
    );
    println!(
        "{}",
        formatter.info("Replace the placeholder prompts before running `specsheet analyze`")
    );
    Ok(())
}

/// Write the template configuration, refusing to replace an existing file
/// unless `force` is set.
pub fn write_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::template().save_to(path)
}
