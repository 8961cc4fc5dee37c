//! Frame composition for the terminal host.

use core_state::MathInput;
use core_surface::BufferSurface;
use core_terminal::Frame;
use unicode_width::UnicodeWidthStr;

use crate::palette::PaletteCursor;

const PROMPT: &str = "> ";
const HELP: &str = "tab/shift-tab select  enter insert  ctrl+z undo  esc quit";

fn palette_row(
    label: &str,
    glyphs: impl Iterator<Item = (usize, &'static str)>,
    selected: Option<usize>,
) -> String {
    let mut line = format!("{label:<8}");
    let mut any = false;
    for (i, glyph) in glyphs {
        any = true;
        if selected == Some(i) {
            line.push_str(&format!("[{glyph}]"));
        } else {
            line.push_str(&format!(" {glyph} "));
        }
    }
    if !any {
        line.push_str("(no symbols)");
    }
    line
}

pub fn compose(input: &MathInput<BufferSurface>, cursor: &PaletteCursor) -> Frame {
    let mut frame = Frame::default();
    for (g, group) in input.groups().iter().enumerate() {
        let label = group
            .id
            .map(|id| id.name().to_string())
            .unwrap_or_else(|| group.requested.clone());
        let selected = (g == cursor.group).then_some(cursor.index);
        let glyphs = group.commands.iter().map(|c| c.display_name).enumerate();
        frame.push(palette_row(&label, glyphs, selected));
    }
    frame.push("");

    let surface = input.surface();
    let row = frame.push(format!("{PROMPT}{}", surface.content()));
    let caret_col = PROMPT.width() + surface.content()[..surface.caret()].width();
    if surface.is_focused() {
        frame.cursor = Some((u16::try_from(caret_col).unwrap_or(u16::MAX), row));
    }

    frame.push("");
    frame.push(format!("value:   {}", input.value()));
    frame.push(format!(
        "history: {}/{}",
        input.history().len(),
        input.history().capacity()
    ));
    frame.push(HELP);
    frame
}
