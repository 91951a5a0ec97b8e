//! Property-based tests for multi-select toggling
//!
//! Tests invariants:
//! - Toggling the same value twice restores a duplicate-free list
//! - Membership flips on every toggle
//! - Untouched values keep their relative order

use proptest::prelude::*;

use crate::core::requests::catalog::TECHNOLOGY_OPTIONS;
use crate::core::wizard::multi_select::toggle;

// ============================================================================
// Strategies
// ============================================================================

fn arb_option() -> impl Strategy<Value = String> {
    prop::sample::select(TECHNOLOGY_OPTIONS).prop_map(str::to_string)
}

/// Duplicate-free selections, as the wizard produces them.
fn arb_selection() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(TECHNOLOGY_OPTIONS, 0..TECHNOLOGY_OPTIONS.len())
        .prop_shuffle()
        .prop_map(|items| items.into_iter().map(str::to_string).collect())
}

proptest! {
    /// Property: toggle is an involution on duplicate-free lists
    #[test]
    fn prop_toggle_twice_is_identity(
        selection in arb_selection(),
        value in arb_option(),
    ) {
        let once = toggle(&selection, &value);
        let twice = toggle(&once, &value);

        if selection.contains(&value) {
            // Removed then appended: same members, value moved to the end
            let mut expected: Vec<String> = selection.iter().filter(|v| **v != value).cloned().collect();
            expected.push(value.clone());
            prop_assert_eq!(twice, expected);
        } else {
            prop_assert_eq!(twice, selection);
        }
    }

    /// Property: membership flips
    #[test]
    fn prop_toggle_flips_membership(
        selection in arb_selection(),
        value in arb_option(),
    ) {
        let was_present = selection.contains(&value);
        let next = toggle(&selection, &value);

        prop_assert_eq!(next.contains(&value), !was_present);
        prop_assert_eq!(
            next.len(),
            if was_present { selection.len() - 1 } else { selection.len() + 1 }
        );
    }

    /// Property: other values keep their order
    #[test]
    fn prop_toggle_preserves_order(
        selection in arb_selection(),
        value in arb_option(),
    ) {
        let next = toggle(&selection, &value);
        let others_before: Vec<&String> = selection.iter().filter(|v| **v != value).collect();
        let others_after: Vec<&String> = next.iter().filter(|v| **v != value).collect();

        prop_assert_eq!(others_before, others_after);
    }
}
