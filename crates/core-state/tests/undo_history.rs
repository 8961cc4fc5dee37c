mod common;

use common::{RecordingSurface, buffer_input, buffer_input_with, history_of};
use core_events::{KeyCode, KeyEvent};
use core_state::{HISTORY_SIZE, MathInput, MathInputOptions};
use pretty_assertions::assert_eq;

#[test]
fn history_is_bounded_to_the_most_recent_priors() {
    let mut m = buffer_input();
    let values: Vec<String> = (0..25).map(|i| format!("v{i}")).collect();
    for v in &values {
        m.set_value(v.clone());
    }

    // Priors are "" then v0..v23; only the last twenty survive.
    let expected: Vec<String> = values[4..24].to_vec();
    assert_eq!(m.history().len(), HISTORY_SIZE);
    assert_eq!(history_of(&m), expected);
    assert_eq!(m.history().evicted(), 5);
}

#[test]
fn configured_capacity_is_honoured() {
    let mut m = buffer_input_with(MathInputOptions {
        history_capacity: 2,
        ..MathInputOptions::default()
    });
    for v in ["a", "b", "c", "d"] {
        m.set_value(v);
    }
    assert_eq!(history_of(&m), vec!["b", "c"]);
}

#[test]
fn undo_walks_back_without_recording() {
    let mut m = buffer_input();
    for v in ["A", "B", "C"] {
        m.set_value(v);
    }
    assert_eq!(history_of(&m), vec!["", "A", "B"]);

    assert!(m.undo());
    assert_eq!(m.value(), "B");
    assert_eq!(m.surface().content(), "B");
    assert_eq!(history_of(&m), vec!["", "A"]);

    assert!(m.undo());
    assert_eq!(m.value(), "A");
    assert_eq!(history_of(&m), vec![""]);
    assert!(!m.history().is_frozen());
}

#[test]
fn undo_with_empty_history_is_a_noop() {
    let mut m = buffer_input();
    assert!(!m.undo());
    assert_eq!(m.value(), "");
    assert_eq!(m.stats().undos, 0);

    let mut seeded = buffer_input_with(MathInputOptions {
        initial_value: "y".into(),
        ..MathInputOptions::default()
    });
    assert!(!seeded.undo());
    assert_eq!(seeded.value(), "y");
}

#[test]
fn undoing_back_to_empty_chains_one_more_step() {
    let mut m = buffer_input();
    m.set_value("A");
    m.set_value("B");

    assert!(m.undo());
    assert!(m.undo());

    // Restoring "" empties the surface, which pulls one more step; history is
    // exhausted so the value stays empty.
    assert_eq!(m.value(), "");
    assert!(m.history().is_empty());
    assert_eq!(m.stats().empty_rollbacks, 0);
    assert_eq!(m.stats().undos, 2);
}

// Empty rollback couples "the surface ended up empty" with "undo once". The
// tests below pin that coupling explicitly for both directions.

#[test]
fn external_empty_value_rolls_back_one_step() {
    let mut m = buffer_input();
    m.set_value("A");
    m.set_value("B");

    m.set_value("");

    assert_eq!(m.value(), "B");
    assert_eq!(m.surface().content(), "B");
    assert_eq!(history_of(&m), vec!["", "A"]);
    assert_eq!(m.stats().empty_rollbacks, 1);
}

#[test]
fn unrenderable_value_rolls_back_one_step() {
    let mut m = MathInput::new(RecordingSurface::rejecting(&["\\frac{"]));
    m.set_value("A");
    m.set_value("B");

    m.set_value("\\frac{");

    assert_eq!(m.value(), "B");
    assert_eq!(m.surface().content, "B");
    assert_eq!(history_of(&m), vec!["", "A"]);
}

#[test]
fn surface_rejecting_the_new_value_rolls_back_to_the_one_before() {
    let mut m = MathInput::new(RecordingSurface::rejecting(&["B"]));
    m.set_value("A");
    m.set_value("B");

    assert_eq!(m.value(), "A");
    assert_eq!(m.surface().content, "A");
    assert_eq!(history_of(&m), vec![""]);
    assert_eq!(m.stats().empty_rollbacks, 1);
}

#[test]
fn user_clearing_the_surface_is_not_rolled_back() {
    let mut m = buffer_input();
    m.set_value("A");
    m.set_value("B");

    m.edit_surface(|s| s.clear());

    assert_eq!(m.value(), "");
    assert_eq!(history_of(&m), vec!["", "A", "B"]);
    assert_eq!(m.stats().empty_rollbacks, 0);

    assert!(m.undo());
    assert_eq!(m.value(), "B");
}

#[test]
fn ctrl_z_undoes() {
    let mut m = buffer_input();
    m.set_value("A");
    m.set_value("B");

    assert!(m.handle_key(&KeyEvent::ctrl('z')));
    assert_eq!(m.value(), "A");

    assert!(!m.handle_key(&KeyEvent::plain(KeyCode::Char('z'))));
    assert_eq!(m.value(), "A");
}
