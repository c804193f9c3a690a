//! Handler for the `unindent` command.

use std::io::{self, BufReader};

use colored::*;

use acmefmt::config::{Config, SAMFILE_ENV_VAR, tabstop_from_env};
use acmefmt::exit_codes::exit;
use acmefmt::formatting::ExtensionTable;
use acmefmt::unindent::{IndentUnit, unindent};

/// Handle the unindent command: filter stdin to stdout, one indent level less.
///
/// The indent unit follows the spec of `$samfile`; an unconfigured width
/// falls back to `$tabstop`.
pub fn handle_unindent(config: &Config) {
    let table = ExtensionTable::from_config(config);
    let file = std::env::var(SAMFILE_ENV_VAR).unwrap_or_default();
    let spec = table.resolve(&file).spec;

    let unit = if spec.tab_expand {
        let width = if spec.is_configured() {
            spec.indent
        } else {
            tabstop_from_env().unwrap_or_else(|e| {
                eprintln!("{}: {}", "Error".red().bold(), e);
                exit::tool_error();
            })
        };
        IndentUnit::Spaces(width)
    } else {
        IndentUnit::Tab
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = unindent(BufReader::new(stdin.lock()), stdout.lock(), &unit) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        exit::tool_error();
    }
}
