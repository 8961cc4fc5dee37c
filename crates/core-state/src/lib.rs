//! Math input state: canonical value, bounded history, and the sync controller
//! that keeps both consistent with an embedded editing surface.
//!
//! Propagation directions:
//! - Value → surface: an external `set_value` (or an undo) records the prior
//!   value, then writes the new value into the surface while the phase is
//!   `ToSurface`. Any edit notice the write provokes is discarded.
//! - Surface → value: an edit notice moves the phase to `FromSurface`, reads the
//!   surface and assigns the canonical value. The history push still happens;
//!   the write back into the surface is skipped because the surface already
//!   holds that content.
//!
//! History recording always precedes the surface write of the same transition.
//!
//! Empty rollback: after a controller-initiated write, a surface that reads back
//! empty triggers exactly one undo step, restoring the most recent prior value.
//! User-driven clears through the surface are not rolled back.
//!
//! Assigning a value equal to the current one is not a change: nothing is
//! recorded and nothing is written. The first assignment at construction has
//! no prior value and is never recorded.

pub mod history;

use core_events::{EditReceiver, HostAction, KeyEvent, edit_channel, shortcut_action};
use core_surface::MathSurface;
use core_symbols::{CommandDescriptor, ResolvedGroup, default_groups, resolve_groups};
use tracing::{debug, trace};

pub use history::{HISTORY_SIZE, HistoryStack};

/// Which direction, if any, a propagation is currently flowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    /// The controller is writing the canonical value into the surface.
    ToSurface,
    /// The controller is assigning the canonical value from surface content.
    FromSurface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathInputOptions {
    pub initial_value: String,
    pub history_capacity: usize,
    /// Comma-separated group names; empty keeps the default groups.
    pub show_symbols: String,
}

impl Default for MathInputOptions {
    fn default() -> Self {
        Self {
            initial_value: String::new(),
            history_capacity: HISTORY_SIZE,
            show_symbols: String::new(),
        }
    }
}

/// Counters describing sync activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub value_changes: u64,
    pub surface_writes: u64,
    pub surface_edits: u64,
    pub echoes_suppressed: u64,
    pub empty_rollbacks: u64,
    pub undos: u64,
}

pub struct MathInput<S: MathSurface> {
    value: String,
    initialized: bool,
    history: HistoryStack,
    phase: SyncPhase,
    surface: S,
    edits: EditReceiver,
    show_symbols: String,
    groups: Vec<ResolvedGroup>,
    stats: SyncStats,
}

impl<S: MathSurface> MathInput<S> {
    pub fn new(surface: S) -> Self {
        Self::with_options(surface, MathInputOptions::default())
    }

    pub fn with_options(mut surface: S, options: MathInputOptions) -> Self {
        let (tx, rx) = edit_channel();
        surface.on_edit(tx);
        let mut input = Self {
            value: String::new(),
            initialized: false,
            history: HistoryStack::with_capacity(options.history_capacity),
            phase: SyncPhase::Idle,
            surface,
            edits: rx,
            show_symbols: String::new(),
            groups: default_groups(),
            stats: SyncStats::default(),
        };
        input.set_show_symbols(&options.show_symbols);
        input.change_value(options.initial_value);
        debug!(
            target: "state.sync",
            capacity = input.history.capacity(),
            groups = input.groups.len(),
            "math_input_ready"
        );
        input
    }

    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }
    pub fn surface(&self) -> &S {
        &self.surface
    }
    pub fn stats(&self) -> SyncStats {
        self.stats
    }
    pub fn groups(&self) -> &[ResolvedGroup] {
        &self.groups
    }
    pub fn show_symbols(&self) -> &str {
        &self.show_symbols
    }

    /// Assign the canonical value from the host.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.change_value(value.into());
        self.pump_edits();
    }

    /// Restore the most recent prior value. Returns false when history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.pop() else {
            trace!(target: "state.sync", "undo_empty_noop");
            return false;
        };
        self.stats.undos += 1;
        let was_frozen = self.history.freeze();
        debug!(target: "state.sync", depth = self.history.len(), "undo");
        self.change_value(prev);
        self.history.restore_freeze(was_frozen);
        true
    }

    /// Insert a command token at the surface caret (palette activation).
    pub fn insert_command(&mut self, token: &str) {
        self.surface.insert_command(token);
        self.pump_edits();
    }

    /// Activate the palette button at `index` within resolved group `group`.
    pub fn press(&mut self, group: usize, index: usize) -> Option<&'static CommandDescriptor> {
        let descriptor = self.groups.get(group)?.get(index)?;
        self.insert_command(descriptor.command);
        Some(descriptor)
    }

    /// Replace the active palette groups. An empty list keeps the current ones.
    pub fn set_show_symbols(&mut self, list: &str) {
        if list.is_empty() {
            return;
        }
        self.show_symbols = list.to_string();
        self.groups = resolve_groups(list);
    }

    /// Run a user-driven mutation against the surface, then process the edit
    /// notices it produced. Call once per discrete user action.
    pub fn edit_surface<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        let out = f(&mut self.surface);
        self.pump_edits();
        out
    }

    /// Handle component-level keyboard shortcuts. Returns true when consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match shortcut_action(key) {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, action: HostAction) {
        trace!(target: "state.sync", ?action, "apply");
        match action {
            HostAction::SetValue(v) => self.set_value(v),
            HostAction::ShowSymbols(list) => self.set_show_symbols(&list),
            HostAction::Insert(token) => self.insert_command(&token),
            HostAction::Undo => {
                self.undo();
            }
        }
    }

    /// Drain queued edit notices, syncing the value from the surface for each.
    /// Returns how many notices were handled.
    pub fn pump_edits(&mut self) -> usize {
        let mut handled = 0;
        while let Some(notice) = self.edits.try_next() {
            trace!(target: "state.sync", seq = notice.seq, "edit_notice");
            self.handle_surface_edit();
            handled += 1;
        }
        handled
    }

    fn handle_surface_edit(&mut self) {
        self.stats.surface_edits += 1;
        let outer = std::mem::replace(&mut self.phase, SyncPhase::FromSurface);
        let content = self.surface.read();
        self.change_value(content);
        self.phase = outer;
    }

    /// The value-change transition: record, then propagate unless the change
    /// came from the surface.
    fn change_value(&mut self, next: String) {
        if self.initialized && next == self.value {
            return;
        }
        let prev = std::mem::replace(&mut self.value, next);
        let prior = self.initialized.then_some(prev.as_str());
        self.initialized = true;
        self.stats.value_changes += 1;
        self.history.push(prior);

        if self.phase == SyncPhase::FromSurface {
            trace!(target: "state.sync", len = self.value.len(), "write_back_skipped");
            return;
        }
        self.write_through();

        if self.surface.read().is_empty() {
            debug!(target: "state.sync", depth = self.history.len(), "surface_empty_rollback");
            if self.undo() {
                self.stats.empty_rollbacks += 1;
            }
        }
    }

    fn write_through(&mut self) {
        let outer = std::mem::replace(&mut self.phase, SyncPhase::ToSurface);
        self.surface.write(&self.value);
        self.stats.surface_writes += 1;
        trace!(target: "state.sync", len = self.value.len(), "write_through");
        let echoed = self.edits.discard_pending();
        if echoed > 0 {
            self.stats.echoes_suppressed += echoed as u64;
            debug!(target: "state.sync", echoed, "echo_suppressed");
        }
        self.phase = outer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_surface::{BufferSurface, SurfaceOptions};

    fn input() -> MathInput<BufferSurface> {
        MathInput::new(BufferSurface::new(SurfaceOptions::default()))
    }

    #[test]
    fn construction_writes_initial_value_without_history() {
        let m = MathInput::with_options(
            BufferSurface::new(SurfaceOptions::default()),
            MathInputOptions {
                initial_value: "x+1".into(),
                ..MathInputOptions::default()
            },
        );
        assert_eq!(m.value(), "x+1");
        assert_eq!(m.surface().content(), "x+1");
        assert!(m.history().is_empty());
        assert_eq!(m.phase(), SyncPhase::Idle);
    }

    #[test]
    fn same_value_is_not_a_change() {
        let mut m = input();
        m.set_value("a");
        let writes = m.surface().write_count();
        m.set_value("a");
        assert_eq!(m.surface().write_count(), writes);
        assert_eq!(m.history().len(), 1);
    }

    #[test]
    fn phase_returns_to_idle_after_each_direction() {
        let mut m = input();
        m.set_value("a");
        assert_eq!(m.phase(), SyncPhase::Idle);
        m.edit_surface(|s| s.type_char('b'));
        assert_eq!(m.phase(), SyncPhase::Idle);
        m.undo();
        assert_eq!(m.phase(), SyncPhase::Idle);
        assert!(!m.history().is_frozen());
    }

    #[test]
    fn empty_show_symbols_keeps_current_groups() {
        let mut m = input();
        m.set_show_symbols("physics");
        m.set_show_symbols("");
        assert_eq!(m.show_symbols(), "physics");
        assert_eq!(m.groups().len(), 1);
    }
}
