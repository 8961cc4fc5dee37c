//! Terminal backend abstraction and crossterm implementation.
//!
//! The demo host paints a handful of full-width lines per frame, so the
//! backend exposes whole-frame presentation only; there is no diffing.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    style::Print,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
        disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Stdout, Write, stdout};
use tracing::trace;

/// Lines to paint from the top of the screen plus an optional caret cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
    /// (column, row) of the visible caret; `None` hides it.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn push(&mut self, line: impl Into<String>) -> u16 {
        self.lines.push(line.into());
        (self.lines.len() - 1) as u16
    }
}

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, W: Write = Stdout> {
    backend: &'a mut CrosstermBackend<W>,
    active: bool,
}

impl Default for CrosstermBackend<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            entered: false,
        }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_, W>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<'a, W: Write> TerminalGuard<'a, W> {
    pub fn backend(&mut self) -> &mut CrosstermBackend<W> {
        self.backend
    }
}

impl<W: Write> TerminalBackend for CrosstermBackend<W> {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(self.out, EnterAlternateScreen, EnableBracketedPaste)?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(self.out, DisableBracketedPaste, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        queue!(self.out, Hide, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in frame.lines.iter().enumerate() {
            queue!(self.out, MoveTo(0, row as u16), Print(line))?;
        }
        if let Some((col, row)) = frame.cursor {
            queue!(self.out, MoveTo(col, row), Show)?;
        }
        self.out.flush()?;
        trace!(target: "render", lines = frame.lines.len(), cursor = ?frame.cursor, "present");
        Ok(())
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a, W: Write> Drop for TerminalGuard<'a, W> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
