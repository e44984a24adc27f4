//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Specsheet - Extract technical attributes from connector datasheets.
#[derive(Debug, Parser)]
#[command(name = "specsheet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SPECSHEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (name=value lines)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one or more datasheets
    Analyze(AnalyzeArgs),

    /// List the configured attributes
    Attributes,

    /// Write a template configuration file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Datasheet files (PDF)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Also write the results to a CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Analyze only these attributes (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Run up to N attribute requests concurrently
    #[arg(long, value_name = "N")]
    pub parallel: Option<usize>,
}

/// Arguments for the init command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "specsheet",
            "analyze",
            "a.pdf",
            "b.pdf",
            "--csv",
            "out.csv",
            "--only",
            "colour",
            "--only",
            "gender",
            "--parallel",
            "4",
        ]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
                assert_eq!(args.csv, Some(PathBuf::from("out.csv")));
                assert_eq!(args.only, vec!["colour", "gender"]);
                assert_eq!(args.parallel, Some(4));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["specsheet", "analyze"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "specsheet",
            "attributes",
            "-vv",
            "--format",
            "json",
            "--no-color",
        ]);
        assert!(matches!(cli.command, Command::Attributes));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
    }

    #[test]
    fn test_init_force() {
        let cli = Cli::parse_from(["specsheet", "init", "--force"]);
        match cli.command {
            Command::Init(args) => assert!(args.force),
            _ => panic!("Expected Init command"),
        }
    }
}
