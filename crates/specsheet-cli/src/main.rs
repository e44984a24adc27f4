//! Specsheet CLI - Extract technical attributes from connector datasheets.

use clap::Parser;
use specsheet_cli::commands;
use specsheet_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> specsheet_cli::Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref())?;

    let command = match cli.command {
        // Init must work even when the existing file is broken
        Command::Init(args) => {
            let format = cli.format.map(Into::into).unwrap_or_default();
            let formatter = Formatter::new(format, !cli.no_color);
            return commands::execute_init(args, &config_path, &formatter).await;
        }
        command => command,
    };

    let config = Config::load_from(&config_path)?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match command {
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter).await,
        Command::Attributes => commands::execute_attributes(&config, &formatter).await,
        Command::Init(_) => Ok(()),
    }
}
