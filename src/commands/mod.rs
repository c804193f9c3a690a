//! Command handlers for the acmefmt CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod resolve;
pub mod run;
pub mod unindent;

use std::path::Path;

use colored::*;

use acmefmt::config::Config;
use acmefmt::exit_codes::exit;

/// Load the rule file, exiting with a tool error if it is unusable.
pub fn load_config_or_exit(path: Option<&Path>) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    }
}
