//! Core event types shared by the surface, the sync controller and the host.
//!
//! Two kinds of traffic live here:
//! - host input (`InputEvent`/`KeyEvent`) translated from the terminal, and the
//!   `HostAction`s it maps to (undo shortcut, palette insert, value assignment);
//! - edit notices sent by a math surface whenever a user-driven change alters
//!   its content. The controller owns the receiving end and drains it
//!   synchronously; the channel is an in-thread queue, not a thread boundary.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters, inspected by tests and logged at shutdown by the binary.
// -------------------------------------------------------------------------------------------------
pub static EDIT_NOTICES_SENT: AtomicU64 = AtomicU64::new(0);
pub static EDIT_NOTICE_SEND_FAILURES: AtomicU64 = AtomicU64::new(0); // receiver dropped
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Top-level event consumed by the host loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    CtrlC,
    Paste(String),
    FocusGained,
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Home,
    End,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Operations a host can invoke on the math input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// Assign the canonical value from outside.
    SetValue(String),
    /// Replace the active palette groups (comma-separated names).
    ShowSymbols(String),
    /// Insert a command token at the caret (palette button).
    Insert(String),
    Undo,
}

/// Keyboard shortcuts owned by the component rather than the surface.
///
/// Only Ctrl+Z is bound; shift state is ignored so Ctrl+Shift+Z still undoes.
pub fn shortcut_action(key: &KeyEvent) -> Option<HostAction> {
    KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
    match key.code {
        KeyCode::Char('z' | 'Z') if key.mods.contains(KeyModifiers::CTRL) => {
            tracing::trace!(target: "input.shortcut", key = %key, "undo_shortcut");
            Some(HostAction::Undo)
        }
        _ => None,
    }
}

// -------------------------------------------------------------------------------------------------
// Edit notices
// -------------------------------------------------------------------------------------------------

/// One discrete user-driven content change on a math surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditNotice {
    /// Monotonic per-surface sequence number.
    pub seq: u64,
}

/// Sending half held by the surface.
#[derive(Debug, Clone)]
pub struct EditSender {
    tx: Sender<EditNotice>,
}

/// Receiving half held by the controller.
#[derive(Debug)]
pub struct EditReceiver {
    rx: Receiver<EditNotice>,
}

pub fn edit_channel() -> (EditSender, EditReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (EditSender { tx }, EditReceiver { rx })
}

impl EditSender {
    /// Returns false when the controller side has gone away.
    pub fn notify(&self, notice: EditNotice) -> bool {
        match self.tx.send(notice) {
            Ok(()) => {
                EDIT_NOTICES_SENT.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                EDIT_NOTICE_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(target: "surface.edit", seq = notice.seq, "edit_notice_receiver_gone");
                false
            }
        }
    }
}

impl EditReceiver {
    /// Next queued notice without blocking.
    pub fn try_next(&self) -> Option<EditNotice> {
        match self.rx.try_recv() {
            Ok(n) => Some(n),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drop every queued notice, returning how many were discarded.
    pub fn discard_pending(&self) -> usize {
        let mut n = 0;
        while self.try_next().is_some() {
            n += 1;
        }
        n
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
