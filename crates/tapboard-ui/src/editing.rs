use std::ops::Range;

/// The three edits a keyboard can make on the focused field.
///
/// Implemented by the host platform's input connection. A connection is only
/// ever borrowed for the duration of one edit.
pub trait EditingConnection {
    /// Delete `count` characters immediately before the cursor.
    fn delete_before(&mut self, count: usize);
    fn insert_text(&mut self, text: &str);
    /// Logical "enter/submit" key.
    fn send_enter(&mut self);
}

/// Supplies the connection of whichever field is focused right now.
pub trait EditingHost {
    fn active_connection(&mut self) -> Option<&mut dyn EditingConnection>;
}

/// `None` means no field is focused.
impl<C: EditingConnection> EditingHost for Option<C> {
    fn active_connection(&mut self) -> Option<&mut dyn EditingConnection> {
        self.as_mut().map(|c| c as &mut dyn EditingConnection)
    }
}

/// In-memory text field: byte-indexed selection, caret at its end.
///
/// `text` may be rewritten directly; the selection is re-snapped to char
/// boundaries inside it before every edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub text: String,
    selection: Range<usize>,
    /// Multi-line fields take enter as a newline; single-line fields submit.
    pub multiline: bool,
    /// Field contents at each submit, oldest first.
    pub submissions: Vec<String>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field holding `text` with the caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
            ..Self::default()
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Selected byte range, ordered and on char boundaries.
    pub fn selection(&self) -> Range<usize> {
        let s = clamp_to_char_boundary(&self.text, self.selection.start);
        let e = clamp_to_char_boundary(&self.text, self.selection.end);
        s.min(e)..s.max(e)
    }

    pub fn cursor(&self) -> usize {
        self.selection().end
    }

    /// Collapse the selection at `byte`, snapped back to a char boundary.
    pub fn set_cursor(&mut self, byte: usize) {
        let pos = clamp_to_char_boundary(&self.text, byte);
        self.selection = pos..pos;
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.selection = range;
        self.selection = self.selection();
    }

    /// Text with `|` at the caret, e.g. `"ab|"`.
    pub fn with_caret(&self) -> String {
        let mut out = self.text.clone();
        out.insert(self.cursor(), '|');
        out
    }

    fn replace_selection(&mut self, text: &str) {
        let Range { start, end } = self.selection();
        self.text.replace_range(start..end, text);
        let pos = start + text.len();
        self.selection = pos..pos;
    }
}

impl EditingConnection for TextBuffer {
    fn delete_before(&mut self, count: usize) {
        if !self.selection().is_empty() {
            self.replace_selection("");
            return;
        }
        let caret = self.cursor();
        let start = self.text[..caret]
            .char_indices()
            .rev()
            .take(count)
            .last()
            .map_or(caret, |(i, _)| i);
        if start < caret {
            self.text.replace_range(start..caret, "");
            self.selection = start..start;
        }
    }

    fn insert_text(&mut self, text: &str) {
        self.replace_selection(text);
    }

    fn send_enter(&mut self) {
        if self.multiline {
            self.replace_selection("\n");
        } else {
            self.submissions.push(self.text.clone());
        }
    }
}

fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
