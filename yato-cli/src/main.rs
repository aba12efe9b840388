// ABOUTME: Main entry point for the yato-img application
// ABOUTME: Parses arguments, sets up logging and config, and dispatches subcommands

use anyhow::Result;
use clap::Parser;
use yato_cli::cli::{Cli, Commands};
use yato_cli::cli_output::CliOutput;
use yato_cli::commands::{self, ShowArgs};
use yato_cli::config::Config;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = CliOutput::from_flags(cli.no_color);
    if let Err(e) = run(cli, &output) {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli, output: &CliOutput) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    log::debug!("Effective config: {:?}", config);

    match cli.command {
        Commands::Show {
            category,
            id,
            url,
            size,
            title,
            width,
            height,
            protocol,
        } => commands::show(
            ShowArgs {
                category,
                id,
                url,
                size,
                title,
                width,
                height,
                protocol,
            },
            &config,
            output,
        ),
        Commands::Detect => commands::detect(&config, output),
        Commands::Cache { command } => commands::cache(command, &config, output),
    }
}
