//! # acmefmt
//!
//! Formatting hooks for the acme editor.
//!
//! acmefmt watches acme for windows being opened and put. On open it writes a
//! menu to the window tag and applies the configured indent width; on put it
//! runs the external formatters configured for the file's extension and
//! replaces the window body with their output before acme saves it. Typed
//! tabs are expanded to spaces for extensions that ask for it.
//!
//! ```text
//! acme ──events──► Listener ──► Formatter (open / put hooks) ──► CommandRunner
//!                     │                                            │
//!                     └────────► Keymap (tab hook)   write_updates ◄┘
//! ```

pub mod acme;
pub mod config;
pub mod event;
pub mod exit_codes;
pub mod formatting;
pub mod unindent;

pub use formatting::{ExtensionTable, Formatter, Spec};
