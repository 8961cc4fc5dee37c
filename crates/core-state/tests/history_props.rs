mod common;

use common::{buffer_input, history_of};
use core_state::HISTORY_SIZE;
use proptest::prelude::*;

proptest! {
    #[test]
    fn history_holds_the_latest_priors_in_order(values in prop::collection::vec("[a-z]{1,3}", 0..60)) {
        let mut m = buffer_input();
        let mut current = String::new();
        let mut priors: Vec<String> = Vec::new();
        for v in &values {
            m.set_value(v.clone());
            if *v != current {
                priors.push(std::mem::replace(&mut current, v.clone()));
            }
        }

        let keep = priors.len().saturating_sub(HISTORY_SIZE);
        prop_assert!(m.history().len() <= HISTORY_SIZE);
        prop_assert_eq!(history_of(&m), priors[keep..].to_vec());
        prop_assert_eq!(m.value(), current.as_str());
    }

    #[test]
    fn undo_replays_priors_newest_first(values in prop::collection::vec("[a-z]{1,3}", 1..30)) {
        let mut m = buffer_input();
        for v in &values {
            m.set_value(v.clone());
        }
        let mut expected = history_of(&m);
        while let Some(prev) = expected.pop() {
            let before = m.history().len();
            prop_assert!(m.undo());
            if prev.is_empty() {
                // Restoring "" rolls one further step back.
                prop_assert!(m.history().len() < before);
                break;
            }
            prop_assert_eq!(m.value(), prev.as_str());
            prop_assert_eq!(m.history().len(), before - 1);
        }
    }
}
