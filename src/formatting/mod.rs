//! Formatting hooks for acme windows.
//!
//! When a window is opened its tag gets the menu and, for configured
//! extensions, the indent width. When it is put, the extension's commands are
//! run against the body and the results are written back before acme saves.
//!
//! # Configuration
//!
//! ```toml
//! [[format]]
//! extensions = [".go"]
//! indent = 8
//! tabexpand = false
//!
//! [[format.commands]]
//! exec = "gofmt"
//! prints-to-stdout = true
//! ```
//!
//! Commands that rewrite a file in place take `$NAME` as an argument; it is
//! replaced by the path of a temp file holding the buffer snapshot.

pub mod error;
pub mod executor;
pub mod formatter;
pub mod keymap;
pub mod resolver;
pub mod writer;

pub use error::{FormatError, RunError};
pub use executor::CommandRunner;
pub use formatter::Formatter;
pub use keymap::{Keymap, KeymapPolicy};
pub use resolver::{Command, DEFAULT_EXTENSION, ExtensionTable, Resolved, Spec};
pub use writer::write_updates;
