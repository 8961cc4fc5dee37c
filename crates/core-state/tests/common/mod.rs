#![allow(dead_code)] // Shared across test binaries; each uses a subset.

use core_events::{EditNotice, EditSender};
use core_state::{MathInput, MathInputOptions};
use core_surface::{BufferSurface, MathSurface, SurfaceOptions};

pub fn buffer_input() -> MathInput<BufferSurface> {
    MathInput::new(BufferSurface::new(SurfaceOptions::default()))
}

pub fn buffer_input_with(options: MathInputOptions) -> MathInput<BufferSurface> {
    MathInput::with_options(BufferSurface::new(SurfaceOptions::default()), options)
}

/// Test double that journals every call and can misbehave on demand.
#[derive(Default)]
pub struct RecordingSurface {
    pub content: String,
    pub writes: Vec<String>,
    pub inserts: Vec<String>,
    /// Emit an edit notice on programmatic writes (a surface violating its contract).
    pub echo_on_write: bool,
    /// Content the surface cannot render; writing it leaves the surface empty.
    pub unrenderable: Vec<String>,
    listener: Option<EditSender>,
    seq: u64,
}

impl RecordingSurface {
    pub fn echoing() -> Self {
        Self {
            echo_on_write: true,
            ..Self::default()
        }
    }

    pub fn rejecting(values: &[&str]) -> Self {
        Self {
            unrenderable: values.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Simulate a user edit that leaves `content` on the surface.
    pub fn user_sets(&mut self, content: &str) {
        self.content = content.to_string();
        self.notify();
    }

    fn notify(&mut self) {
        self.seq += 1;
        if let Some(l) = &self.listener {
            l.notify(EditNotice { seq: self.seq });
        }
    }
}

impl MathSurface for RecordingSurface {
    fn write(&mut self, content: &str) {
        self.writes.push(content.to_string());
        self.content = if self.unrenderable.iter().any(|v| v == content) {
            String::new()
        } else {
            content.to_string()
        };
        if self.echo_on_write {
            self.notify();
        }
    }

    fn insert_command(&mut self, token: &str) {
        self.inserts.push(token.to_string());
        self.content.push_str(token);
        self.notify();
    }

    fn read(&self) -> String {
        self.content.clone()
    }

    fn on_edit(&mut self, listener: EditSender) {
        self.listener = Some(listener);
    }
}

pub fn history_of<S: MathSurface>(input: &MathInput<S>) -> Vec<String> {
    input.history().iter().map(str::to_string).collect()
}
