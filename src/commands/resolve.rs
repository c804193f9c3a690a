//! Handler for the `resolve` command.

use colored::*;

use acmefmt::config::Config;
use acmefmt::formatting::ExtensionTable;

/// Handle the resolve command: show what a put would run for each file.
pub fn handle_resolve(config: &Config, files: &[String]) {
    let table = ExtensionTable::from_config(config);
    for file in files {
        let resolved = table.resolve(file);
        if !resolved.spec.is_configured() {
            println!("{}: {} {}", file, resolved.key.cyan(), "(not formatted)".dimmed());
            continue;
        }
        println!(
            "{}: {} indent={} tabexpand={}",
            file,
            resolved.key.cyan(),
            resolved.spec.indent,
            resolved.spec.tab_expand
        );
        for command in &resolved.spec.commands {
            let mode = match (command.prints_to_stdout, command.stdout_only) {
                (true, true) => "stdout only",
                (true, false) => "stdout",
                (false, _) => "in place",
            };
            let mut line = command.executable.clone();
            for arg in &command.args {
                line.push(' ');
                line.push_str(arg);
            }
            println!("    {} ({})", line, mode.dimmed());
        }
    }
}
