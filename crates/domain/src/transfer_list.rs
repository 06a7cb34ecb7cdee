//! Order-preserving set algebra behind two-pane "transfer list" screens.
//!
//! Every function compares items by [`Keyed::key`] only, so two values with the
//! same key are the same item even if their other fields differ.

use std::collections::HashSet;

use crate::permission::Keyed;

/// Items of `a` whose key is not present in `b`, in `a`'s order.
#[must_use]
pub fn difference<T: Keyed + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let keys = key_set(b);
    a.iter()
        .filter(|item| !keys.contains(&item.key()))
        .cloned()
        .collect()
}

/// Items of `a` whose key is present in `b`, in `a`'s order.
#[must_use]
pub fn intersection<T: Keyed + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let keys = key_set(b);
    a.iter()
        .filter(|item| keys.contains(&item.key()))
        .cloned()
        .collect()
}

/// `a` followed by the items of `b` not already in `a`.
#[must_use]
pub fn union<T: Keyed + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut merged = a.to_vec();
    merged.extend(difference(b, a));
    merged
}

fn key_set<T: Keyed>(items: &[T]) -> HashSet<T::Key> {
    items.iter().map(Keyed::key).collect()
}

/// One of the two panes of a transfer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    /// Items not yet granted.
    Available,
    /// Items currently granted.
    Assigned,
}

impl TransferSide {
    /// Returns the pane title used by list renderings.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
        }
    }
}

/// State of a pane's "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// Pane is empty, the checkbox is disabled.
    Disabled,
    /// No item of the pane is checked.
    Unchecked,
    /// Some but not all items are checked.
    Indeterminate,
    /// Every item of the pane is checked.
    Checked,
}

/// Counts shown in a pane header, e.g. `2/5 selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSelection {
    /// Checked items in the pane.
    pub checked: usize,
    /// Items in the pane.
    pub total: usize,
}

impl PaneSelection {
    /// Returns the tri-state checkbox value.
    #[must_use]
    pub fn state(&self) -> SelectAllState {
        if self.total == 0 {
            SelectAllState::Disabled
        } else if self.checked == 0 {
            SelectAllState::Unchecked
        } else if self.checked == self.total {
            SelectAllState::Checked
        } else {
            SelectAllState::Indeterminate
        }
    }
}

/// Working state of a transfer-list screen.
///
/// `available` and `assigned` are disjoint by key and together hold exactly the
/// items the list was built from. `checked` only ever holds items of either pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferList<T> {
    available: Vec<T>,
    assigned: Vec<T>,
    checked: Vec<T>,
}

impl<T: Keyed + Clone> TransferList<T> {
    /// Splits `catalog` into panes, assigning every item `is_assigned` accepts.
    #[must_use]
    pub fn partition(catalog: Vec<T>, is_assigned: impl Fn(&T) -> bool) -> Self {
        let mut seen = HashSet::new();
        let (assigned, available): (Vec<T>, Vec<T>) = catalog
            .into_iter()
            .filter(|item| seen.insert(item.key()))
            .partition(&is_assigned);

        Self {
            available,
            assigned,
            checked: Vec::new(),
        }
    }

    /// Returns the available pane.
    #[must_use]
    pub fn available(&self) -> &[T] {
        &self.available
    }

    /// Returns the assigned pane.
    #[must_use]
    pub fn assigned(&self) -> &[T] {
        &self.assigned
    }

    /// Returns the current multi-selection across both panes.
    #[must_use]
    pub fn checked(&self) -> &[T] {
        &self.checked
    }

    /// Returns the items of one pane.
    #[must_use]
    pub fn pane(&self, side: TransferSide) -> &[T] {
        match side {
            TransferSide::Available => &self.available,
            TransferSide::Assigned => &self.assigned,
        }
    }

    /// Returns whether the item with `key` is checked.
    #[must_use]
    pub fn is_checked(&self, key: T::Key) -> bool {
        self.checked.iter().any(|item| item.key() == key)
    }

    /// Returns the checked items of one pane, in pane order.
    #[must_use]
    pub fn checked_in(&self, side: TransferSide) -> Vec<T> {
        intersection(self.pane(side), &self.checked)
    }

    /// Returns header counts for one pane.
    #[must_use]
    pub fn selection(&self, side: TransferSide) -> PaneSelection {
        PaneSelection {
            checked: self.checked_in(side).len(),
            total: self.pane(side).len(),
        }
    }

    /// Finds an item of either pane by key.
    #[must_use]
    pub fn find(&self, key: T::Key) -> Option<&T> {
        self.available
            .iter()
            .chain(self.assigned.iter())
            .find(|item| item.key() == key)
    }

    /// Flips the checked state of the item with `key`.
    ///
    /// Returns `false` when no pane holds such an item.
    pub fn toggle(&mut self, key: T::Key) -> bool {
        if let Some(position) = self.checked.iter().position(|item| item.key() == key) {
            self.checked.remove(position);
            return true;
        }

        match self.find(key).cloned() {
            Some(item) => {
                self.checked.push(item);
                true
            }
            None => false,
        }
    }

    /// "Select all" for one pane: clears it when fully checked, fills it otherwise.
    pub fn toggle_all(&mut self, side: TransferSide) {
        let pane = self.pane(side).to_vec();
        if self.selection(side).state() == SelectAllState::Checked {
            self.checked = difference(&self.checked, &pane);
        } else {
            self.checked = union(&self.checked, &pane);
        }
    }

    /// Moves the checked available items to the end of the assigned pane,
    /// in the order they were checked.
    ///
    /// Returns how many items moved.
    pub fn move_checked_to_assigned(&mut self) -> usize {
        let moved = intersection(&self.checked, &self.available);
        self.assigned = union(&self.assigned, &moved);
        self.available = difference(&self.available, &moved);
        self.checked = difference(&self.checked, &moved);
        moved.len()
    }

    /// Moves the checked assigned items to the end of the available pane,
    /// in the order they were checked.
    ///
    /// Returns how many items moved.
    pub fn move_checked_to_available(&mut self) -> usize {
        let moved = intersection(&self.checked, &self.assigned);
        self.available = union(&self.available, &moved);
        self.assigned = difference(&self.assigned, &moved);
        self.checked = difference(&self.checked, &moved);
        moved.len()
    }

    /// Returns the keys of the assigned pane, in pane order.
    #[must_use]
    pub fn assigned_keys(&self) -> Vec<T::Key> {
        self.assigned.iter().map(Keyed::key).collect()
    }
}

#[cfg(test)]
mod tests;
