//! Terminal input: crossterm events translated into `core_events` types.
//!
//! The host loop is synchronous; `next_event` polls crossterm with a timeout
//! and hands back at most one translated event.

use std::time::Duration;

use anyhow::Result;
use core_events::{Event, InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind,
    KeyModifiers as CMods,
};
use tracing::trace;

#[inline]
pub(crate) fn log_paste(data: &str) {
    trace!(target: "input.paste", len = data.len(), "paste_event");
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

pub(crate) fn map_code(code: CKeyCode) -> Option<KeyCode> {
    Some(match code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => KeyCode::BackTab,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    })
}

fn translate_key(key: CKeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if matches!(key.code, CKeyCode::Char('c')) && key.modifiers.contains(CMods::CONTROL) {
        return Some(InputEvent::CtrlC);
    }
    let code = map_code(key.code)?;
    Some(InputEvent::Key(KeyEvent::new(code, map_mods(key.modifiers))))
}

/// Translate one crossterm event. Events the host has no use for map to `None`.
pub fn translate(event: CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => translate_key(key),
        CEvent::Resize(w, h) => {
            trace!(target: "input.event", w, h, "resize");
            Some(InputEvent::Resize(w, h))
        }
        CEvent::Paste(data) => {
            log_paste(&data);
            Some(InputEvent::Paste(data))
        }
        CEvent::FocusGained => Some(InputEvent::FocusGained),
        CEvent::FocusLost => Some(InputEvent::FocusLost),
        _ => None,
    }
}

/// Wait up to `timeout` for the next terminal event.
pub fn next_event(timeout: Duration) -> Result<Option<Event>> {
    if !crossterm::event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(crossterm::event::read()?).map(Event::Input))
}
