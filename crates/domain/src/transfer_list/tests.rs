use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::permission::{Keyed, PermissionId, PermissionRecord};

use super::{SelectAllState, TransferList, TransferSide, difference, intersection, union};

fn permission(id: i64) -> PermissionRecord {
    PermissionRecord::new(id, format!("P{id}"), None)
}

fn ids(items: &[PermissionRecord]) -> Vec<i64> {
    items.iter().map(|item| item.id.as_i64()).collect()
}

fn list(available: &[i64], assigned: &[i64]) -> TransferList<PermissionRecord> {
    let assigned_ids: BTreeSet<i64> = assigned.iter().copied().collect();
    let catalog = available
        .iter()
        .chain(assigned.iter())
        .copied()
        .map(permission)
        .collect();
    TransferList::partition(catalog, |item| assigned_ids.contains(&item.id.as_i64()))
}

#[test]
fn set_helpers_compare_by_id_and_keep_left_order() {
    let a = vec![permission(3), permission(1), permission(2)];
    let b = vec![
        PermissionRecord::new(2, "renamed", None),
        permission(4),
        permission(3),
    ];

    assert_eq!(ids(&difference(&a, &b)), vec![1]);
    assert_eq!(ids(&intersection(&a, &b)), vec![3, 2]);
    assert_eq!(ids(&union(&a, &b)), vec![3, 1, 2, 4]);
}

#[test]
fn partition_splits_catalog_and_drops_duplicate_ids() {
    let catalog = vec![permission(1), permission(2), permission(1), permission(3)];
    let transfer = TransferList::partition(catalog, |item| item.id == PermissionId::new(2));

    assert_eq!(ids(transfer.available()), vec![1, 3]);
    assert_eq!(ids(transfer.assigned()), vec![2]);
    assert!(transfer.checked().is_empty());
}

#[test]
fn moving_checked_item_to_assigned() {
    let mut transfer = list(&[1, 2, 3], &[]);
    assert!(transfer.toggle(PermissionId::new(2)));

    let moved = transfer.move_checked_to_assigned();

    assert_eq!(moved, 1);
    assert_eq!(ids(transfer.assigned()), vec![2]);
    assert_eq!(ids(transfer.available()), vec![1, 3]);
    assert!(transfer.checked().is_empty());
}

#[test]
fn moving_only_affects_checked_items_of_the_source_pane() {
    let mut transfer = list(&[1, 2], &[3]);
    transfer.toggle(PermissionId::new(1));
    transfer.toggle(PermissionId::new(3));

    transfer.move_checked_to_assigned();

    assert_eq!(ids(transfer.assigned()), vec![3, 1]);
    assert_eq!(ids(transfer.available()), vec![2]);
    assert_eq!(ids(transfer.checked()), vec![3]);
}

#[test]
fn moved_block_keeps_check_order_into_assigned() {
    let mut transfer = list(&[1, 2, 3], &[]);
    transfer.toggle(PermissionId::new(3));
    transfer.toggle(PermissionId::new(1));

    assert_eq!(transfer.move_checked_to_assigned(), 2);

    assert_eq!(ids(transfer.assigned()), vec![3, 1]);
    assert_eq!(ids(transfer.available()), vec![2]);
    assert!(transfer.checked().is_empty());
}

#[test]
fn moved_block_keeps_check_order_into_available() {
    let mut transfer = list(&[9], &[4, 5, 6]);
    transfer.toggle(PermissionId::new(6));
    transfer.toggle(PermissionId::new(9));
    transfer.toggle(PermissionId::new(4));

    assert_eq!(transfer.move_checked_to_available(), 2);

    assert_eq!(ids(transfer.available()), vec![9, 6, 4]);
    assert_eq!(ids(transfer.assigned()), vec![5]);
    assert_eq!(ids(transfer.checked()), vec![9]);
}

#[test]
fn toggle_twice_unchecks_and_unknown_id_is_ignored() {
    let mut transfer = list(&[1, 2], &[]);

    assert!(transfer.toggle(PermissionId::new(1)));
    assert!(transfer.is_checked(PermissionId::new(1)));
    assert!(transfer.toggle(PermissionId::new(1)));
    assert!(!transfer.is_checked(PermissionId::new(1)));
    assert!(!transfer.toggle(PermissionId::new(99)));
    assert!(transfer.checked().is_empty());
}

#[test]
fn select_all_goes_partial_to_full_to_empty() {
    let mut transfer = list(&[1, 2], &[]);
    transfer.toggle(PermissionId::new(1));
    assert_eq!(
        transfer.selection(TransferSide::Available).state(),
        SelectAllState::Indeterminate
    );

    transfer.toggle_all(TransferSide::Available);
    assert_eq!(ids(transfer.checked()), vec![1, 2]);
    assert_eq!(
        transfer.selection(TransferSide::Available).state(),
        SelectAllState::Checked
    );

    transfer.toggle_all(TransferSide::Available);
    assert!(transfer.checked().is_empty());
    assert_eq!(
        transfer.selection(TransferSide::Available).state(),
        SelectAllState::Unchecked
    );
}

#[test]
fn select_all_on_empty_pane_is_disabled_and_inert() {
    let mut transfer = list(&[1], &[]);
    transfer.toggle(PermissionId::new(1));

    assert_eq!(
        transfer.selection(TransferSide::Assigned).state(),
        SelectAllState::Disabled
    );
    transfer.toggle_all(TransferSide::Assigned);
    assert_eq!(ids(transfer.checked()), vec![1]);
}

#[test]
fn select_all_leaves_other_pane_selection_alone() {
    let mut transfer = list(&[1, 2], &[3]);
    transfer.toggle(PermissionId::new(3));

    transfer.toggle_all(TransferSide::Available);
    transfer.toggle_all(TransferSide::Available);

    assert_eq!(ids(transfer.checked()), vec![3]);
}

#[test]
fn round_trip_restores_partition() {
    let mut transfer = list(&[1, 2, 3], &[4]);
    let original = transfer.clone();
    transfer.toggle(PermissionId::new(3));
    transfer.toggle(PermissionId::new(2));
    transfer.move_checked_to_assigned();
    assert_eq!(ids(transfer.assigned()), vec![4, 3, 2]);

    transfer.toggle(PermissionId::new(2));
    transfer.toggle(PermissionId::new(3));
    transfer.move_checked_to_available();

    assert_eq!(transfer, original);
}

#[test]
fn pane_counts_report_checked_over_total() {
    let mut transfer = list(&[1, 2, 3], &[4]);
    transfer.toggle(PermissionId::new(1));
    transfer.toggle(PermissionId::new(4));

    let available = transfer.selection(TransferSide::Available);
    assert_eq!((available.checked, available.total), (1, 3));
    assert_eq!(
        transfer.selection(TransferSide::Assigned).state(),
        SelectAllState::Checked
    );
    assert_eq!(transfer.assigned_keys(), vec![PermissionId::new(4)]);
}

#[derive(Debug, Clone)]
enum Step {
    Toggle(i64),
    ToggleAll(bool),
    ToAssigned,
    ToAvailable,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0_i64..12).prop_map(Step::Toggle),
        any::<bool>().prop_map(Step::ToggleAll),
        Just(Step::ToAssigned),
        Just(Step::ToAvailable),
    ]
}

fn side(available: bool) -> TransferSide {
    if available {
        TransferSide::Available
    } else {
        TransferSide::Assigned
    }
}

fn key_set(items: &[PermissionRecord]) -> BTreeSet<PermissionId> {
    items.iter().map(Keyed::key).collect()
}

fn transfer_from_mask(size: i64, mask: &[bool]) -> TransferList<PermissionRecord> {
    let catalog = (0..size).map(permission).collect();
    TransferList::partition(catalog, |item| {
        usize::try_from(item.id.as_i64())
            .ok()
            .and_then(|index| mask.get(index).copied())
            .unwrap_or(false)
    })
}

proptest! {
    #[test]
    fn panes_stay_disjoint_and_complete(
        mask in proptest::collection::vec(any::<bool>(), 10),
        steps in proptest::collection::vec(step(), 0..40),
    ) {
        let mut transfer = transfer_from_mask(10, &mask);
        let catalog: BTreeSet<PermissionId> = (0..10).map(PermissionId::new).collect();

        for step in steps {
            match step {
                Step::Toggle(id) => {
                    transfer.toggle(PermissionId::new(id));
                }
                Step::ToggleAll(available) => transfer.toggle_all(side(available)),
                Step::ToAssigned => {
                    transfer.move_checked_to_assigned();
                }
                Step::ToAvailable => {
                    transfer.move_checked_to_available();
                }
            }

            let available = key_set(transfer.available());
            let assigned = key_set(transfer.assigned());
            prop_assert!(available.is_disjoint(&assigned));
            prop_assert_eq!(available.len() + assigned.len(), 10);
            let all: BTreeSet<PermissionId> = available.union(&assigned).copied().collect();
            prop_assert_eq!(&all, &catalog);
            prop_assert!(key_set(transfer.checked()).is_subset(&catalog));
        }
    }

    #[test]
    fn select_all_twice_restores_a_full_or_empty_pane(
        mask in proptest::collection::vec(any::<bool>(), 8),
        full in any::<bool>(),
        available in any::<bool>(),
    ) {
        let mut transfer = transfer_from_mask(8, &mask);
        let side = side(available);
        if full {
            transfer.toggle_all(side);
        }
        let before = key_set(&transfer.checked_in(side));

        transfer.toggle_all(side);
        transfer.toggle_all(side);

        prop_assert_eq!(key_set(&transfer.checked_in(side)), before);
    }

    #[test]
    fn moving_checked_items_preserves_relative_order(
        mask in proptest::collection::vec(any::<bool>(), 10),
        checks in proptest::collection::btree_set(0_i64..10, 0..10),
    ) {
        let mut transfer = transfer_from_mask(10, &[false; 10]);
        for (index, checked) in mask.iter().enumerate() {
            if *checked {
                transfer.toggle(PermissionId::new(i64::try_from(index).unwrap_or_default()));
            }
        }
        transfer.move_checked_to_assigned();
        let before_available = ids(transfer.available());
        let before_assigned = ids(transfer.assigned());

        for id in &checks {
            if before_available.contains(id) {
                transfer.toggle(PermissionId::new(*id));
            }
        }
        transfer.move_checked_to_assigned();

        let kept: Vec<i64> = before_available
            .iter()
            .copied()
            .filter(|id| !checks.contains(id))
            .collect();
        prop_assert_eq!(ids(transfer.available()), kept);
        prop_assert!(ids(transfer.assigned()).starts_with(&before_assigned));
        prop_assert!(transfer.checked().is_empty());
    }
}
