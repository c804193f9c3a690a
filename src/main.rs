use std::path::PathBuf;

use clap::{Parser, Subcommand};

use acmefmt::config::EnvSettings;

mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rule file path (defaults to $ACMEFMT_RULES, then the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory where acme's file tree is mounted
    #[arg(long, default_value = acmefmt::acme::DEFAULT_ROOT)]
    acme_root: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Command to run (defaults to `run`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach to acme and format windows on put
    Run,
    /// Remove one level of indentation from stdin (for use from an acme window)
    Unindent,
    /// Show the extension key and commands configured for files
    Resolve {
        /// File paths to resolve
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let settings = EnvSettings::from_env();

    // RUST_LOG still wins over the default filter
    let default_level = if settings.debug || cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = commands::load_config_or_exit(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::handle_run(&config, &cli.acme_root),
        Commands::Unindent => commands::unindent::handle_unindent(&config),
        Commands::Resolve { files } => commands::resolve::handle_resolve(&config, &files),
    }
}
