use std::io;
use std::sync::Arc;

/// An addressable live buffer.
///
/// Implementations must be usable from the listener's per-window threads,
/// hence `Send + Sync`; methods take `&self` and synchronise internally.
pub trait Window: Send + Sync {
    /// Read the full body as bytes.
    fn read_body(&self) -> io::Result<Vec<u8>>;

    /// Append text to the window's tag (control region).
    fn write_to_tag(&self, text: &str) -> io::Result<()>;

    /// Execute a named control command with arguments against the tag.
    fn exec_in_tag(&self, cmd: &str, args: &[&str]) -> io::Result<()>;

    /// Set the body address used by the next [`Window::set_data`].
    fn set_addr(&self, addr: &str) -> io::Result<()>;

    /// Replace the text at the current address.
    fn set_data(&self, data: &[u8]) -> io::Result<()>;
}

/// Resolves a window id to its live handle.
///
/// Returns `None` once the buffer session is gone.
pub trait WindowLookup: Send + Sync {
    fn window(&self, id: usize) -> Option<Arc<dyn Window>>;
}
