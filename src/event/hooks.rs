//! Hook capabilities and the listener that drives them.
//!
//! Hooks return no errors: a failure inside a hook belongs to that hook and
//! must be logged there. The listener only ever fails as a whole.

use std::path::PathBuf;
use std::sync::Arc;

use super::window::{Window, WindowLookup};
use super::{Event, Keystroke};

/// Fired once when a buffer is newly opened.
pub trait OpenHook: Send + Sync {
    fn on_open(&self, win: &dyn Window, event: &Event);
}

/// Fired when the buffer is about to be written out ("Put").
///
/// The returned event is handed back to the editor, which then performs the save.
pub trait PutHook: Send + Sync {
    fn on_put(&self, event: Event) -> Event;
}

/// What a key hook did with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The hook rewrote the buffer; later key hooks are skipped.
    Handled,
    /// Left for default handling.
    Passthrough,
}

/// Bound to one key; fired for keystrokes on that key.
pub trait KeyHook: Send + Sync {
    fn key(&self) -> char;
    fn on_key(&self, key: &Keystroke) -> KeyOutcome;
}

/// Failure of the event stream itself. There is no recovery from these.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Failed to attach to the editor event stream at {path}: {source}")]
    Attach {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Editor event stream closed")]
    Closed,
    #[error("Editor event stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The event-stream capability.
pub trait Listener: WindowLookup {
    fn register_open_hook(&self, hook: Arc<dyn OpenHook>);
    fn register_put_hook(&self, hook: Arc<dyn PutHook>);
    fn register_key_hook(&self, hook: Arc<dyn KeyHook>);

    /// A lookup that hooks can keep without holding the listener itself.
    fn windows(&self) -> Arc<dyn WindowLookup>;

    /// Block, dispatching events until the stream fails.
    fn listen(&self) -> Result<(), ListenerError>;
}
