//! Math editing surface contract and an in-memory reference surface.
//!
//! The sync controller in `core-state` drives a surface only through
//! [`MathSurface`]: full-content writes, command insertion, reads, and an edit
//! notice subscription. Anything richer (rendering, caret geometry, keystroke
//! parsing) stays behind the trait.
//!
//! Notice contract:
//! - `write` is programmatic and MUST NOT emit an edit notice.
//! - `insert_command` and user-driven mutations emit exactly one notice per
//!   discrete change, and none when the content is left unchanged.

use core_events::{EditNotice, EditSender};
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

/// The narrow capability set the controller depends on.
pub trait MathSurface {
    /// Replace the full content and take input focus.
    fn write(&mut self, content: &str);
    /// Insert one command token at the caret (replacing any selection) and refocus.
    fn insert_command(&mut self, token: &str);
    /// Current content in the same markup used for the canonical value.
    fn read(&self) -> String;
    /// Register the edit notice listener. A later call replaces the earlier one.
    fn on_edit(&mut self, listener: EditSender);
}

impl<T: MathSurface + ?Sized> MathSurface for Box<T> {
    fn write(&mut self, content: &str) {
        (**self).write(content)
    }
    fn insert_command(&mut self, token: &str) {
        (**self).insert_command(token)
    }
    fn read(&self) -> String {
        (**self).read()
    }
    fn on_edit(&mut self, listener: EditSender) {
        (**self).on_edit(listener)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Typing a space jumps the caret to the end instead of inserting.
    pub space_behaves_like_tab: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            space_behaves_like_tab: true,
        }
    }
}

/// Plain-text surface: a markup buffer with a grapheme-aware caret.
#[derive(Debug, Default)]
pub struct BufferSurface {
    content: String,
    /// Byte offset, always on a grapheme boundary.
    caret: usize,
    focused: bool,
    options: SurfaceOptions,
    listener: Option<EditSender>,
    seq: u64,
    writes: u64,
}

impl BufferSurface {
    pub fn new(options: SurfaceOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Number of programmatic `write` calls received.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Number of edit notices emitted so far.
    pub fn edit_count(&self) -> u64 {
        self.seq
    }

    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    // ---------------------------------------------------------------------------------------------
    // User-driven mutations. Each returns whether the content changed (and a notice was sent).
    // ---------------------------------------------------------------------------------------------

    pub fn type_char(&mut self, c: char) -> bool {
        self.focused = true;
        if c == ' ' && self.options.space_behaves_like_tab {
            self.caret = self.content.len();
            return false;
        }
        let mut text = String::new();
        if c.is_ascii_alphabetic() && ends_with_control_word(&self.content[..self.caret]) {
            // `\alpha` followed by `x` must not fuse into `\alphax`.
            text.push(' ');
        }
        text.push(c);
        self.splice_at_caret(&text);
        self.emit("type_char")
    }

    /// Insert a run of text as a single edit (paste).
    pub fn type_str(&mut self, s: &str) -> bool {
        self.focused = true;
        if s.is_empty() {
            return false;
        }
        self.splice_at_caret(s);
        self.emit("type_str")
    }

    pub fn backspace(&mut self) -> bool {
        self.focused = true;
        let Some(prev) = self.prev_boundary() else {
            return false;
        };
        self.content.replace_range(prev..self.caret, "");
        self.caret = prev;
        self.emit("backspace")
    }

    pub fn delete_forward(&mut self) -> bool {
        self.focused = true;
        let Some(next) = self.next_boundary() else {
            return false;
        };
        self.content.replace_range(self.caret..next, "");
        self.emit("delete_forward")
    }

    /// Select-all + delete.
    pub fn clear(&mut self) -> bool {
        self.focused = true;
        if self.content.is_empty() {
            return false;
        }
        self.content.clear();
        self.caret = 0;
        self.emit("clear")
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.caret = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.caret = next;
        }
    }

    pub fn move_home(&mut self) {
        self.caret = 0;
    }

    pub fn move_end(&mut self) {
        self.caret = self.content.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.caret]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.caret..]
            .graphemes(true)
            .next()
            .map(|g| self.caret + g.len())
    }

    fn splice_at_caret(&mut self, text: &str) {
        self.content.insert_str(self.caret, text);
        self.caret += text.len();
    }

    fn emit(&mut self, op: &'static str) -> bool {
        self.seq += 1;
        trace!(target: "surface.edit", op, seq = self.seq, len = self.content.len(), caret = self.caret, "edit");
        if let Some(listener) = &self.listener {
            listener.notify(EditNotice { seq: self.seq });
        }
        true
    }
}

impl MathSurface for BufferSurface {
    fn write(&mut self, content: &str) {
        self.writes += 1;
        if self.content != content {
            self.content.clear();
            self.content.push_str(content);
        }
        self.caret = self.content.len();
        self.focused = true;
        trace!(target: "surface.write", len = content.len(), writes = self.writes, "write");
    }

    fn insert_command(&mut self, token: &str) {
        self.focused = true;
        if token.is_empty() {
            return;
        }
        self.splice_at_caret(token);
        self.emit("insert_command");
    }

    fn read(&self) -> String {
        self.content.clone()
    }

    fn on_edit(&mut self, listener: EditSender) {
        self.listener = Some(listener);
    }
}

/// True when `s` ends in a backslash control word such as `\alpha`.
fn ends_with_control_word(s: &str) -> bool {
    let letters = s
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    letters > 0 && s[..s.len() - letters].ends_with('\\')
}
