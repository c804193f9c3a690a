//! A rune copy of a window body, kept current from the event stream.
//!
//! acme reports deletions by address only. Replaying every body insert and
//! delete against a local copy recovers the text a delete removed.

/// Local copy of a body, or nothing while it cannot be trusted.
#[derive(Debug, Default)]
pub struct BodyShadow {
    runes: Option<Vec<char>>,
}

impl BodyShadow {
    pub fn new(body: &[u8]) -> Self {
        let mut shadow = Self::default();
        shadow.reset(body);
        shadow
    }

    /// Replace the copy with a freshly read body.
    pub fn reset(&mut self, body: &[u8]) {
        self.runes = Some(String::from_utf8_lossy(body).chars().collect());
    }

    pub fn is_known(&self) -> bool {
        self.runes.is_some()
    }

    /// Apply an insert of `text` at `q0..q1`. Returns false when the copy
    /// could not follow, which happens when acme leaves out long texts.
    pub fn insert(&mut self, q0: usize, q1: usize, text: &str) -> bool {
        let Some(runes) = self.runes.as_mut() else {
            return false;
        };
        let inserted: Vec<char> = text.chars().collect();
        if inserted.len() != q1.saturating_sub(q0) || q0 > runes.len() {
            self.runes = None;
            return false;
        }
        let tail = runes.split_off(q0);
        runes.extend(inserted);
        runes.extend(tail);
        true
    }

    /// Apply a delete of `q0..q1` and return the removed text, if known.
    pub fn delete(&mut self, q0: usize, q1: usize) -> Option<String> {
        let runes = self.runes.as_mut()?;
        if q0 > q1 || q1 > runes.len() {
            self.runes = None;
            return None;
        }
        Some(runes.drain(q0..q1).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_returns_removed_text() {
        let mut shadow = BodyShadow::new("x\n   a\n".as_bytes());
        assert_eq!(shadow.delete(5, 6).as_deref(), Some("a"));
        assert_eq!(shadow.delete(4, 5).as_deref(), Some(" "));
    }

    #[test]
    fn test_insert_then_delete_counts_runes() {
        let mut shadow = BodyShadow::new("é\n".as_bytes());
        assert!(shadow.insert(2, 4, "  "));
        assert_eq!(shadow.delete(1, 3).as_deref(), Some("\n "));
    }

    #[test]
    fn test_omitted_insert_text_invalidates() {
        let mut shadow = BodyShadow::new(b"abc");
        // acme sends no text for long inserts
        assert!(!shadow.insert(0, 300, ""));
        assert!(!shadow.is_known());
        assert_eq!(shadow.delete(0, 1), None);
    }

    #[test]
    fn test_out_of_range_delete_invalidates() {
        let mut shadow = BodyShadow::new(b"ab");
        assert_eq!(shadow.delete(1, 5), None);
        assert!(!shadow.is_known());

        shadow.reset(b"ab");
        assert_eq!(shadow.delete(0, 1).as_deref(), Some("a"));
    }
}
