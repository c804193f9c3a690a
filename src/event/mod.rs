//! Editor-facing capabilities consumed by the formatting hooks.
//!
//! The formatter never talks to the editor directly. It sees a live buffer
//! through [`Window`], looks buffers up by id through [`WindowLookup`], and is
//! driven by a [`Listener`] that fires the registered hooks.

pub mod hooks;
pub mod window;

pub use hooks::{KeyHook, KeyOutcome, Listener, ListenerError, OpenHook, PutHook};
pub use window::{Window, WindowLookup};

/// Identifies which open buffer, and which file, triggered a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Editor window id.
    pub id: usize,
    /// Path of the file shown in the window.
    pub file: String,
}

impl Event {
    pub fn new(id: usize, file: impl Into<String>) -> Self {
        Self { id, file: file.into() }
    }
}

/// Which way an indentation keystroke goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    /// A tab was typed and has been inserted at `q0..q1`.
    Forward,
    /// One character was deleted from the keyboard; `q0` is the cursor afterwards.
    Backward,
}

/// A keyboard edit the listener routes to key hooks.
///
/// `q0` and `q1` are character (rune) offsets into the window body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystroke {
    pub event: Event,
    pub direction: KeyDirection,
    pub q0: usize,
    pub q1: usize,
    /// The text inserted, or the text deleted. Empty when a delete's text
    /// is not known.
    pub text: String,
}
