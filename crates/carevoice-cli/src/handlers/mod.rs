//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub fn execute(...) -> Result<(), CliError>` (async when a
//!   session driver runs)
//! - Thin wrappers that:
//!   1. Build what they need through [`bootstrap`](crate::bootstrap)
//!   2. Call the voice session
//!   3. Format output for the terminal

pub mod commands;
pub mod listen;
pub mod say;
pub mod voices;
