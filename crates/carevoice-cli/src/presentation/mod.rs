//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no voice logic.

pub mod tables;

pub use tables::{print_separator, truncate_string};
