//! Single-line text field state shared by the composer and the form fields.

/// Maximum accepted input length in characters.
const MAX_INPUT_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInputState {
    text: String,
    /// Cursor position as a character index.
    cursor: usize,
}

impl TextInputState {
    pub fn with_text(text: &str) -> Self {
        let mut state = Self::default();
        state.insert_str(text);
        state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the text holds something other than whitespace.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Inserts a character at the cursor. Returns whether the text changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' || self.char_count() >= MAX_INPUT_LENGTH {
            return false;
        }
        let byte_idx = self.byte_index(self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
        true
    }

    /// Inserts as much of `value` as fits, flattening line breaks to spaces.
    pub fn insert_str(&mut self, value: &str) -> bool {
        let mut changed = false;
        for ch in value.chars() {
            let ch = if ch == '\n' || ch == '\r' { ' ' } else { ch };
            if !self.insert_char(ch) {
                break;
            }
            changed = true;
        }
        changed
    }

    pub fn delete_char_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
        true
    }

    pub fn delete_char_at(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.drain(start..end);
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_report_changes() {
        let mut state = TextInputState::default();

        assert!(state.insert_char('h'));
        assert!(state.insert_char('i'));
        assert_eq!(state.text(), "hi");

        assert!(state.delete_char_before());
        assert_eq!(state.text(), "h");

        state.move_cursor_home();
        assert!(!state.delete_char_before());
        assert!(state.delete_char_at());
        assert!(state.is_empty());
        assert!(!state.delete_char_at());
    }

    #[test]
    fn inserts_in_the_middle_of_unicode_text() {
        let mut state = TextInputState::with_text("Прт");
        state.move_cursor_left();
        state.insert_char('и');

        assert_eq!(state.text(), "Прит");
        assert_eq!(state.cursor_position(), 3);
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let mut state = TextInputState::with_text("ab");

        state.move_cursor_right();
        assert_eq!(state.cursor_position(), 2);

        state.move_cursor_home();
        state.move_cursor_left();
        assert_eq!(state.cursor_position(), 0);

        state.move_cursor_end();
        assert_eq!(state.cursor_position(), 2);
    }

    #[test]
    fn whitespace_only_text_has_no_content() {
        let state = TextInputState::with_text("   ");

        assert!(!state.is_empty());
        assert!(!state.has_content());
    }

    #[test]
    fn pasted_line_breaks_become_spaces() {
        let mut state = TextInputState::default();

        assert!(state.insert_str("one\ntwo"));
        assert_eq!(state.text(), "one two");
    }

    #[test]
    fn rejects_characters_past_max_length() {
        let mut state = TextInputState::default();
        for _ in 0..MAX_INPUT_LENGTH {
            assert!(state.insert_char('x'));
        }

        assert!(!state.insert_char('y'));
        assert!(!state.insert_str("more"));
        assert_eq!(state.text().chars().count(), MAX_INPUT_LENGTH);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut state = TextInputState::with_text("hello");
        state.clear();

        assert!(state.is_empty());
        assert_eq!(state.cursor_position(), 0);
    }
}
