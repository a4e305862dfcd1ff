//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for carevoice voice navigation.
///
/// Speech runs through console engines: typed lines stand in for the
/// microphone and spoken output is printed.
#[derive(Parser)]
#[command(name = "carevoice")]
#[command(about = "Accessible voice navigation: spoken commands in, spoken feedback out")]
#[command(version)]
pub struct Cli {
    /// JSON voice settings file
    #[arg(long, global = true, env = "CAREVOICE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Override the locale from settings (e.g. "en-GB")
    #[arg(long, global = true, env = "CAREVOICE_LOCALE")]
    pub locale: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
