//! Command-line support for pizza-compare: configuration file handling and
//! CLI error types.

pub mod config;
pub mod error;

pub use error::{CliError, Result};
