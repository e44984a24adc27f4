//! Attributes command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the attributes command.
pub async fn execute_attributes(config: &Config, formatter: &Formatter) -> Result<()> {
    let roster = config.roster();
    println!("{}", formatter.format_roster(&roster)?);

    let invalid = roster.invalid().count();
    if invalid > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} attribute(s) will report ANALYSIS_ERROR until fixed",
                invalid
            ))
        );
    }

    Ok(())
}
