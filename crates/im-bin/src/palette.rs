//! Keyboard selection over the resolved palette rows.

use core_symbols::ResolvedGroup;

/// Selected button, as (row, index within row). Empty rows are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteCursor {
    pub group: usize,
    pub index: usize,
}

impl PaletteCursor {
    fn flatten(groups: &[ResolvedGroup]) -> Vec<(usize, usize)> {
        groups
            .iter()
            .enumerate()
            .flat_map(|(g, row)| (0..row.len()).map(move |i| (g, i)))
            .collect()
    }

    fn step(&mut self, groups: &[ResolvedGroup], forward: bool) {
        let slots = Self::flatten(groups);
        if slots.is_empty() {
            *self = Self::default();
            return;
        }
        let at = slots
            .iter()
            .position(|&(g, i)| g == self.group && i == self.index);
        let next = match (at, forward) {
            (None, _) => 0,
            (Some(p), true) => (p + 1) % slots.len(),
            (Some(p), false) => (p + slots.len() - 1) % slots.len(),
        };
        (self.group, self.index) = slots[next];
    }

    pub fn next(&mut self, groups: &[ResolvedGroup]) {
        self.step(groups, true);
    }

    pub fn prev(&mut self, groups: &[ResolvedGroup]) {
        self.step(groups, false);
    }

    /// Snap onto a valid button after the rows were replaced.
    pub fn clamp(&mut self, groups: &[ResolvedGroup]) {
        let valid = groups
            .get(self.group)
            .is_some_and(|row| self.index < row.len());
        if !valid {
            *self = Self::default();
            self.step(groups, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_symbols::resolve_groups;

    #[test]
    fn next_wraps_and_skips_empty_rows() {
        let groups = resolve_groups("physics,bogus,physics");
        let mut c = PaletteCursor::default();
        c.next(&groups);
        assert_eq!(c, PaletteCursor { group: 0, index: 1 });
        c.next(&groups);
        assert_eq!(c, PaletteCursor { group: 2, index: 0 });
        c.next(&groups);
        c.next(&groups);
        assert_eq!(c, PaletteCursor { group: 0, index: 0 });
    }

    #[test]
    fn prev_wraps_backwards() {
        let groups = resolve_groups("physics");
        let mut c = PaletteCursor::default();
        c.prev(&groups);
        assert_eq!(c, PaletteCursor { group: 0, index: 1 });
    }

    #[test]
    fn clamp_moves_onto_first_button() {
        let groups = resolve_groups("bogus,greek");
        let mut c = PaletteCursor { group: 0, index: 3 };
        c.clamp(&groups);
        assert_eq!(c, PaletteCursor { group: 1, index: 0 });

        let none = resolve_groups("bogus");
        c.clamp(&none);
        assert_eq!(c, PaletteCursor::default());
    }
}
