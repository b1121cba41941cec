use proptest::prelude::*;
use revdiff_overview::{ComparisonRequest, ComparisonSelector, SelectionError};
use revdiff_types::{EntityId, RevisionId};

fn rid(id: u64) -> RevisionId {
    RevisionId::new(id)
}

fn select(left: Option<u64>, right: Option<u64>) -> Result<ComparisonRequest, SelectionError> {
    ComparisonSelector::select(
        left.map(RevisionId::new),
        right.map(RevisionId::new),
        &EntityId::new("42"),
        "node",
        Some("split_fields"),
    )
}

// ── validation order ─────────────────────────────────────────────

#[test]
fn missing_pick_is_incomplete() {
    assert_eq!(select(None, Some(3)), Err(SelectionError::SelectionIncomplete));
    assert_eq!(select(Some(3), None), Err(SelectionError::SelectionIncomplete));
    assert_eq!(select(None, None), Err(SelectionError::SelectionIncomplete));
}

#[test]
fn same_pick_is_identical() {
    assert_eq!(select(Some(7), Some(7)), Err(SelectionError::SelectionIdentical));
}

#[test]
fn insufficient_revisions_wins_over_other_failures() {
    assert_eq!(
        ComparisonSelector::validate(1, None, None),
        Err(SelectionError::InsufficientRevisions)
    );
    assert_eq!(
        ComparisonSelector::validate(0, Some(rid(1)), Some(rid(1))),
        Err(SelectionError::InsufficientRevisions)
    );
    assert_eq!(
        ComparisonSelector::validate(2, Some(rid(1)), None),
        Err(SelectionError::SelectionIncomplete)
    );
    assert_eq!(
        ComparisonSelector::validate(2, Some(rid(2)), Some(rid(1))),
        Ok((rid(1), rid(2)))
    );
}

#[test]
fn messages_are_user_facing() {
    assert_eq!(
        SelectionError::InsufficientRevisions.to_string(),
        "Multiple revisions are needed for comparison."
    );
    assert_eq!(
        SelectionError::SelectionIncomplete.to_string(),
        "Select two revisions to compare."
    );
    assert_eq!(
        SelectionError::SelectionIdentical.to_string(),
        "Select different revisions to compare."
    );
}

// ── normalization and target ─────────────────────────────────────

#[test]
fn newer_left_pick_is_swapped() {
    let request = select(Some(10), Some(3)).unwrap();
    assert_eq!(request.left, rid(3));
    assert_eq!(request.right, rid(10));
    assert_eq!(request.entity_type, "node");
}

#[test]
fn target_contains_ordered_pair_and_layout() {
    let request = select(Some(10), Some(3)).unwrap();
    assert_eq!(
        request.target(),
        "compare/node/42?left=3&right=10&layout=split_fields"
    );
}

#[test]
fn target_without_layout_omits_parameter() {
    let request = ComparisonSelector::select(
        Some(rid(1)),
        Some(rid(2)),
        &EntityId::new("7"),
        "media",
        None,
    )
    .unwrap();
    assert_eq!(request.target(), "compare/media/7?left=1&right=2");
}

#[test]
fn reversed_compares_newer_to_older() {
    let request = select(Some(3), Some(10)).unwrap();
    let reversed = request.reversed();
    assert_eq!(reversed.left, rid(10));
    assert_eq!(reversed.right, rid(3));
    assert_eq!(reversed.reversed(), request);
}

// ── properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn select_orders_and_is_symmetric(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        let ab = select(Some(a), Some(b)).unwrap();
        let ba = select(Some(b), Some(a)).unwrap();

        prop_assert!(ab.left < ab.right);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn identical_picks_always_rejected(a in any::<u64>()) {
        prop_assert_eq!(select(Some(a), Some(a)), Err(SelectionError::SelectionIdentical));
    }

    #[test]
    fn one_sided_picks_always_incomplete(a in any::<u64>()) {
        prop_assert_eq!(select(None, Some(a)), Err(SelectionError::SelectionIncomplete));
        prop_assert_eq!(select(Some(a), None), Err(SelectionError::SelectionIncomplete));
    }
}
