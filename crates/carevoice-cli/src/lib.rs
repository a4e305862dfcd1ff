#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings outside the tests that use them
#[cfg(test)]
use tempfile as _;

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod console;
pub mod error;
pub mod handlers;
pub mod navigation;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, SayStyle};
pub use error::CliError;
pub use parser::Cli;
