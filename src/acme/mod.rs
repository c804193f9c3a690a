//! Listener for the acme editor, driven through its file tree.
//!
//! acme serves its state as files: a global `log` of window operations, an
//! `index` of open windows, and per-window directories with `body`, `tag`,
//! `addr`, `data` and `event`. The listener expects that tree mounted at a
//! directory (`/mnt/acme` on Plan 9, or a `9pfuse` mount elsewhere).

pub mod codec;
pub mod listener;
pub mod shadow;
pub mod window;

pub use listener::{AcmeListener, WindowRegistry};
pub use window::AcmeWindow;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::event::Listener;
use crate::formatting::Formatter;

/// Where acme's file tree is mounted when nothing else is configured.
pub const DEFAULT_ROOT: &str = "/mnt/acme";

/// Attach the formatting hooks to acme at `root` and serve until acme goes away.
/// This is the main entry point for `acmefmt run`.
pub fn start_listener(config: &Config, root: &Path) -> Result<()> {
    let listener = AcmeListener::new(root);
    let formatter = Arc::new(Formatter::new(config, listener.windows()));

    log::info!(
        "Starting acmefmt on {} with {} extension rule(s)",
        root.display(),
        formatter.table().len()
    );
    formatter.attach(&listener);

    listener
        .listen()
        .with_context(|| format!("Lost acme at {}", root.display()))
}
