//! Handler for the `run` command.

use std::path::Path;

use colored::*;

use acmefmt::acme;
use acmefmt::config::Config;
use acmefmt::exit_codes::exit;

/// Handle the run command: attach to acme and format until it goes away.
pub fn handle_run(config: &Config, acme_root: &Path) {
    if let Err(e) = acme::start_listener(config, acme_root) {
        log::error!("{e:#}");
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        exit::listener_lost();
    }
}
