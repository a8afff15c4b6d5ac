//! Bounded typed-text buffer shown above the keyboard.
//!
//! The stored content itself is trimmed to the last `max_len` characters after
//! every edit, so older text is discarded for good rather than scrolled out of
//! view.

/// Number of characters kept when no other bound is configured.
pub const DEFAULT_MAX_DISPLAY_CHARS: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    max_len: usize,
}

impl Default for TextBuffer {
    fn default() -> Self { TextBuffer::new(DEFAULT_MAX_DISPLAY_CHARS) }
}

impl TextBuffer {
    pub fn new(max_len: usize) -> Self {
        TextBuffer { content: String::new(), max_len }
    }

    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
        self.truncate_front();
    }

    /// Remove the last character.  Does nothing on an empty buffer.
    pub fn backspace(&mut self) {
        self.content.pop();
        self.truncate_front();
    }

    /// The stored text; already bounded, so it can be drawn as-is.
    pub fn renderable_text(&self) -> &str { &self.content }

    /// Length in characters (not bytes).
    pub fn len(&self) -> usize { self.content.chars().count() }

    pub fn is_empty(&self) -> bool { self.content.is_empty() }

    pub fn max_len(&self) -> usize { self.max_len }

    fn truncate_front(&mut self) {
        let excess = self.len().saturating_sub(self.max_len);
        if excess == 0 {
            return;
        }
        let cut = self.content
            .char_indices()
            .nth(excess)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len());
        self.content.drain(..cut);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_backspace() {
        let mut b = TextBuffer::default();
        b.append("H");
        b.append("I");
        b.append(" ");
        assert_eq!(b.renderable_text(), "HI ");
        b.backspace();
        assert_eq!(b.renderable_text(), "HI");
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut b = TextBuffer::new(5);
        b.backspace();
        b.backspace();
        assert!(b.is_empty());
        assert_eq!(b.renderable_text(), "");
    }

    #[test]
    fn keeps_only_the_tail() {
        let mut b = TextBuffer::new(40);
        let typed: String = (0..100).map(|i| char::from(b'A' + (i % 26) as u8)).collect();
        for ch in typed.chars() {
            b.append(&ch.to_string());
        }
        assert_eq!(b.len(), 40);
        assert_eq!(b.renderable_text(), &typed[60..]);
    }

    #[test]
    fn long_single_append_is_trimmed() {
        let mut b = TextBuffer::new(3);
        b.append("abcdef");
        assert_eq!(b.renderable_text(), "def");
    }

    #[test]
    fn trimmed_text_is_gone_for_good() {
        let mut b = TextBuffer::new(3);
        b.append("abcd");
        b.backspace();
        b.backspace();
        assert_eq!(b.renderable_text(), "b");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut b = TextBuffer::new(2);
        b.append("é\nü");
        assert_eq!(b.renderable_text(), "\nü");
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut b = TextBuffer::new(0);
        b.append("x");
        assert!(b.is_empty());
    }
}
