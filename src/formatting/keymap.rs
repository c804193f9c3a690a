//! Tab handling for buffers whose extension asks for tab expansion.

use std::sync::Arc;

use crate::event::{Event, KeyDirection, KeyHook, KeyOutcome, Keystroke, Window};

/// Indent width used when a buffer has no configured spec.
pub const DEFAULT_INDENT: usize = 8;

/// Per-buffer decisions the keymap delegates to its owner.
pub trait KeymapPolicy: Send + Sync {
    /// Live handle for a window id, `None` once it is gone.
    fn resolve_window(&self, id: usize) -> Option<Arc<dyn Window>>;

    /// Indent width for the buffer that produced `event`.
    fn resolve_indent(&self, event: &Event) -> usize;

    /// Whether typed tabs should become spaces in that buffer.
    fn tab_expand_enabled(&self, event: &Event) -> bool;
}

/// Key hook bound to the tab key.
pub struct Keymap<P> {
    policy: P,
}

impl<P: KeymapPolicy> Keymap<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Replace the tab just inserted at `q0..q1` with `indent` spaces.
    fn expand(&self, win: &dyn Window, key: &Keystroke, indent: usize) -> std::io::Result<KeyOutcome> {
        win.set_addr(&format!("#{},#{}", key.q0, key.q1))?;
        win.set_data(" ".repeat(indent).as_bytes())?;
        Ok(KeyOutcome::Handled)
    }

    /// After a space is deleted from the keyboard inside leading spaces,
    /// remove the rest of that indent unit so the line lands back on an
    /// indent stop.
    ///
    /// The reverse of [`Keymap::expand`] deletes spaces instead of putting a
    /// tab back: with tab expansion on, the buffer never holds tabs typed
    /// here, and a lone tab would reintroduce one.
    fn collapse(&self, win: &dyn Window, key: &Keystroke, indent: usize) -> std::io::Result<KeyOutcome> {
        if key.text != " " {
            return Ok(KeyOutcome::Passthrough);
        }
        let body = win.read_body()?;
        let extra = partial_indent_before(&String::from_utf8_lossy(&body), key.q0, indent);
        if extra == 0 {
            return Ok(KeyOutcome::Passthrough);
        }
        win.set_addr(&format!("#{},#{}", key.q0 - extra, key.q0))?;
        win.set_data(b"")?;
        Ok(KeyOutcome::Handled)
    }
}

impl<P: KeymapPolicy> KeyHook for Keymap<P> {
    fn key(&self) -> char {
        '\t'
    }

    fn on_key(&self, key: &Keystroke) -> KeyOutcome {
        if !self.policy.tab_expand_enabled(&key.event) {
            return KeyOutcome::Passthrough;
        }
        let Some(win) = self.policy.resolve_window(key.event.id) else {
            log::debug!("Ignoring keystroke for closed window {}", key.event.id);
            return KeyOutcome::Passthrough;
        };
        let indent = self.policy.resolve_indent(&key.event);
        if indent == 0 {
            return KeyOutcome::Passthrough;
        }

        let result = match key.direction {
            KeyDirection::Forward => self.expand(win.as_ref(), key, indent),
            KeyDirection::Backward => self.collapse(win.as_ref(), key, indent),
        };
        result.unwrap_or_else(|e| {
            log::debug!("Tab handling failed for window {}: {e}", key.event.id);
            KeyOutcome::Passthrough
        })
    }
}

/// Number of spaces to delete before rune offset `q0` so that a line made only
/// of spaces up to `q0` ends on a multiple of `indent`.
fn partial_indent_before(body: &str, q0: usize, indent: usize) -> usize {
    let before: Vec<char> = body.chars().take(q0).collect();
    if before.len() < q0 {
        return 0;
    }
    let line_start = before.iter().rposition(|&c| c == '\n').map_or(0, |i| i + 1);
    let prefix = &before[line_start..];
    if prefix.is_empty() || prefix.iter().any(|&c| c != ' ') {
        return 0;
    }
    prefix.len() % indent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_indent_before() {
        // 7 spaces left after deleting one of 8
        assert_eq!(partial_indent_before("x\n       y", 9, 4), 3);
        assert_eq!(partial_indent_before("       y", 7, 4), 3);
        // already on a stop
        assert_eq!(partial_indent_before("    y", 4, 4), 0);
        // not leading whitespace
        assert_eq!(partial_indent_before("ab   c", 5, 4), 0);
        // start of line
        assert_eq!(partial_indent_before("a\nb", 2, 4), 0);
        // offset past the end
        assert_eq!(partial_indent_before("   ", 10, 4), 0);
    }

    #[test]
    fn test_partial_indent_counts_runes() {
        assert_eq!(partial_indent_before("é\n     x", 7, 4), 1);
    }
}
