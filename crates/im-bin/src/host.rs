//! Routes host events to the math input: component shortcuts first, then
//! palette navigation, then surface editing.

use core_events::{Event, InputEvent, KeyCode, KeyModifiers};
use core_state::MathInput;
use core_surface::BufferSurface;
use tracing::{debug, trace};

use crate::palette::PaletteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Host {
    pub input: MathInput<BufferSurface>,
    pub cursor: PaletteCursor,
}

impl Host {
    pub fn new(input: MathInput<BufferSurface>) -> Self {
        let mut cursor = PaletteCursor::default();
        cursor.clamp(input.groups());
        Self { input, cursor }
    }

    pub fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::Shutdown | Event::Input(InputEvent::CtrlC) => Flow::Quit,
            Event::Input(InputEvent::Key(key)) => {
                if self.input.handle_key(&key) {
                    return Flow::Continue;
                }
                match key.code {
                    KeyCode::Esc => return Flow::Quit,
                    KeyCode::Tab => self.cursor.next(self.input.groups()),
                    KeyCode::BackTab => self.cursor.prev(self.input.groups()),
                    KeyCode::Enter => {
                        let pressed = self.input.press(self.cursor.group, self.cursor.index);
                        debug!(target: "runtime", command = pressed.map(|d| d.command), "palette_press");
                    }
                    KeyCode::Backspace => {
                        self.input.edit_surface(|s| s.backspace());
                    }
                    KeyCode::Delete => {
                        self.input.edit_surface(|s| s.delete_forward());
                    }
                    KeyCode::Left => self.input.edit_surface(|s| s.move_left()),
                    KeyCode::Right => self.input.edit_surface(|s| s.move_right()),
                    KeyCode::Home => self.input.edit_surface(|s| s.move_home()),
                    KeyCode::End => self.input.edit_surface(|s| s.move_end()),
                    KeyCode::Char(c)
                        if !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) =>
                    {
                        self.input.edit_surface(|s| s.type_char(c));
                    }
                    KeyCode::Char(_) => {
                        trace!(target: "runtime", key = %key, "unbound_chord");
                    }
                }
                Flow::Continue
            }
            Event::Input(InputEvent::Paste(text)) => {
                self.input.edit_surface(|s| s.type_str(&text));
                Flow::Continue
            }
            Event::Input(InputEvent::FocusLost) => {
                self.input.edit_surface(|s| s.blur());
                Flow::Continue
            }
            Event::Input(InputEvent::FocusGained | InputEvent::Resize(..)) => Flow::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyEvent;
    use core_state::MathInputOptions;
    use core_surface::SurfaceOptions;

    fn host() -> Host {
        Host::new(MathInput::with_options(
            BufferSurface::new(SurfaceOptions::default()),
            MathInputOptions::default(),
        ))
    }

    fn key(code: KeyCode) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::plain(code)))
    }

    #[test]
    fn typing_then_ctrl_z_restores_previous_value() {
        let mut h = host();
        for c in "x2".chars() {
            assert_eq!(h.handle(key(KeyCode::Char(c))), Flow::Continue);
        }
        assert_eq!(h.input.value(), "x2");
        h.handle(Event::Input(InputEvent::Key(KeyEvent::ctrl('z'))));
        assert_eq!(h.input.value(), "x");
        assert_eq!(h.input.surface().content(), "x");
    }

    #[test]
    fn tab_then_enter_inserts_selected_command() {
        let mut h = host();
        h.handle(key(KeyCode::Tab));
        h.handle(key(KeyCode::Enter));
        assert_eq!(h.input.value(), "\\nthroot");
    }

    #[test]
    fn paste_is_one_edit() {
        let mut h = host();
        h.handle(Event::Input(InputEvent::Paste("a+b".into())));
        assert_eq!(h.input.value(), "a+b");
        assert_eq!(h.input.history().len(), 1);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut h = host();
        assert_eq!(h.handle(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(h.handle(Event::Input(InputEvent::CtrlC)), Flow::Quit);
        assert_eq!(h.handle(Event::Shutdown), Flow::Quit);
    }

    #[test]
    fn alt_chords_do_not_type() {
        let mut h = host();
        let alt = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT);
        h.handle(Event::Input(InputEvent::Key(alt)));
        assert_eq!(h.input.value(), "");
    }
}
