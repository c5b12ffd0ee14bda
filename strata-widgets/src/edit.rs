use std::ops::Range;

/// A caret position plus an optional selection anchor, both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextCursor {
    /// Caret position.
    pub position: usize,
    /// Where the selection started, if there is one.
    pub anchor: Option<usize>,
}

impl TextCursor {
    /// A caret at `position` without selection.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            anchor: None,
        }
    }

    /// The selected range, ordered.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        let range = if anchor <= self.position {
            anchor..self.position
        } else {
            self.position..anchor
        };
        (!range.is_empty()).then_some(range)
    }

    /// Move the caret, dropping the selection.
    pub fn move_to(&mut self, position: usize) {
        self.position = position;
        self.anchor = None;
    }

    /// Move the caret and extend the selection from where it was.
    pub fn select_to(&mut self, position: usize) {
        if self.anchor.is_none() {
            self.anchor = Some(self.position);
        }
        self.position = position;
    }
}

/// Single line text with a character-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    cursor: TextCursor,
}

impl TextBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text`, caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            cursor: TextCursor::new(end),
        }
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The cursor.
    pub fn cursor(&self) -> TextCursor {
        self.cursor
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    fn byte_range(&self, range: Range<usize>) -> Range<usize> {
        self.byte_index(range.start)..self.byte_index(range.end)
    }

    /// Remove the selection. Returns whether there was one.
    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.cursor.selection() else {
            return false;
        };
        let bytes = self.byte_range(range.clone());
        self.text.replace_range(bytes, "");
        self.cursor.move_to(range.start);
        true
    }

    /// Insert `text` at the caret, replacing the selection. Line breaks are dropped.
    pub fn insert(&mut self, text: &str) {
        let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        self.delete_selection();
        let at = self.byte_index(self.cursor.position);
        self.text.insert_str(at, &text);
        self.cursor.move_to(self.cursor.position + text.chars().count());
    }

    /// Backspace.
    pub fn delete_backward(&mut self) {
        if self.delete_selection() || self.cursor.position == 0 {
            return;
        }
        let bytes = self.byte_range(self.cursor.position - 1..self.cursor.position);
        self.text.replace_range(bytes, "");
        self.cursor.move_to(self.cursor.position - 1);
    }

    /// Delete.
    pub fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor.position >= self.char_count() {
            return;
        }
        let bytes = self.byte_range(self.cursor.position..self.cursor.position + 1);
        self.text.replace_range(bytes, "");
        self.cursor.anchor = None;
    }

    /// Place the caret, optionally extending the selection.
    pub fn set_cursor(&mut self, position: usize, extend_selection: bool) {
        let position = position.min(self.char_count());
        if extend_selection {
            self.cursor.select_to(position);
        } else {
            self.cursor.move_to(position);
        }
    }

    /// Move one character left.
    pub fn move_left(&mut self, extend_selection: bool) {
        match self.cursor.selection() {
            Some(range) if !extend_selection => self.cursor.move_to(range.start),
            _ => self.set_cursor(self.cursor.position.saturating_sub(1), extend_selection),
        }
    }

    /// Move one character right.
    pub fn move_right(&mut self, extend_selection: bool) {
        match self.cursor.selection() {
            Some(range) if !extend_selection => self.cursor.move_to(range.end),
            _ => self.set_cursor(self.cursor.position + 1, extend_selection),
        }
    }

    /// Move to the start of the text.
    pub fn move_to_start(&mut self, extend_selection: bool) {
        self.set_cursor(0, extend_selection);
    }

    /// Move to the end of the text.
    pub fn move_to_end(&mut self, extend_selection: bool) {
        self.set_cursor(self.char_count(), extend_selection);
    }

    /// Select everything.
    pub fn select_all(&mut self) {
        self.cursor = TextCursor {
            position: self.char_count(),
            anchor: Some(0),
        };
    }

    /// The selected text.
    pub fn selected_text(&self) -> Option<&str> {
        let range = self.cursor.selection()?;
        Some(&self.text[self.byte_range(range)])
    }

    /// Replace the text. The caret is kept where it still fits.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let end = self.char_count();
        self.cursor.move_to(self.cursor.position.min(end));
    }

    /// Remove all text.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor.move_to(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_by_character_not_byte() {
        let mut buffer = TextBuffer::with_text("héllo");
        assert_eq!(buffer.cursor().position, 5);
        buffer.move_left(false);
        buffer.move_left(false);
        buffer.delete_backward();
        assert_eq!(buffer.text(), "hélo");
        buffer.move_to_start(false);
        buffer.move_right(false);
        buffer.delete_forward();
        assert_eq!(buffer.text(), "hlo");
        buffer.insert("ë\n");
        assert_eq!(buffer.text(), "hëlo");
        assert_eq!(buffer.cursor().position, 2);
    }

    #[test]
    fn selection_is_replaced_by_insert() {
        let mut buffer = TextBuffer::with_text("abcdef");
        buffer.set_cursor(1, false);
        buffer.set_cursor(4, true);
        assert_eq!(buffer.selected_text(), Some("bcd"));
        buffer.insert("X");
        assert_eq!(buffer.text(), "aXef");
        assert_eq!(buffer.cursor(), TextCursor::new(2));
    }

    #[test]
    fn arrows_collapse_selection() {
        let mut buffer = TextBuffer::with_text("abcdef");
        buffer.select_all();
        buffer.move_left(false);
        assert_eq!(buffer.cursor(), TextCursor::new(0));
        buffer.select_all();
        buffer.delete_backward();
        assert_eq!(buffer.text(), "");
        buffer.delete_backward();
        buffer.delete_forward();
        assert_eq!(buffer.cursor().position, 0);
    }

    #[test]
    fn set_text_clamps_cursor() {
        let mut buffer = TextBuffer::with_text("long text");
        buffer.set_text("ab");
        assert_eq!(buffer.cursor().position, 2);
        buffer.clear();
        assert_eq!(buffer.char_count(), 0);
    }
}
