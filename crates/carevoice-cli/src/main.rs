//! CLI entry point - the composition root.
//!
//! Settings are resolved once here; each handler builds its own voice
//! session through `bootstrap`.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use carevoice_cli::{Cli, CliConfig, CliError, Commands, handlers};

const DEFAULT_LOG_FILTER: &str = "carevoice_core=info,carevoice_voice=info,carevoice_cli=info";
const VERBOSE_LOG_FILTER: &str = "carevoice_core=debug,carevoice_voice=debug,carevoice_cli=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging (RUST_LOG wins over --verbose)
    let fallback = if cli.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command.as_ref() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(err) = run(&cli, command).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
    Ok(())
}

async fn run(cli: &Cli, command: &Commands) -> Result<(), CliError> {
    let config = CliConfig::from_cli(cli);

    match command {
        Commands::Listen { once, quiet } => {
            let settings = config.load_settings()?;
            handlers::listen::execute(settings, *once, *quiet).await
        }
        Commands::Say {
            text,
            style,
            priority,
        } => {
            let settings = config.load_settings()?;
            handlers::say::execute(settings, text, *style, *priority).await
        }
        Commands::Commands { json } => handlers::commands::execute(*json),
        Commands::Voices => {
            let settings = config.load_settings()?;
            handlers::voices::execute(settings)
        }
    }
}
