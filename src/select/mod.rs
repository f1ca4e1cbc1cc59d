//! Page selection: pattern parsing, reconciliation of typed and clicked
//! pages, and the slice request payload derived from them.

pub mod pattern;
pub mod request;

use std::collections::BTreeSet;

/// Union of the parsed set and the clicked set, deduplicated and sorted
/// ascending. A page is selected if it appears in either source.
pub fn reconcile(parsed: &[u32], clicked: &[u32]) -> Vec<u32> {
    let set: BTreeSet<u32> = parsed.iter().chain(clicked).copied().collect();
    set.into_iter().collect()
}

/// Contiguous-range approximation of a page set: `(min, max)` when the set
/// is non-empty. This is a superset hint for range-only backends, not a
/// promise that every page in between is selected.
pub fn range_hint(pages: &[u32]) -> Option<(u32, u32)> {
    match (pages.first(), pages.last()) {
        (Some(&first), Some(&last)) => Some((first.min(last), first.max(last))),
        _ => None,
    }
}

/// Session-scoped selection for the active document: the last successfully
/// parsed pattern plus the pages toggled by direct interaction.
///
/// The reconciled set is recomputed in full whenever either source changes,
/// never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    parsed: Vec<u32>,
    clicked: BTreeSet<u32>,
    reconciled: Vec<u32>,
}

impl SelectionState {
    /// Replace the pattern-derived set with a freshly parsed one.
    pub fn set_parsed(&mut self, pages: Vec<u32>) {
        self.parsed = pages;
        self.recompute();
    }

    /// Toggle a single page on or off. Returns true if the page is now in
    /// the clicked set.
    pub fn toggle(&mut self, page: u32) -> bool {
        let now_selected = if self.clicked.remove(&page) {
            false
        } else {
            self.clicked.insert(page);
            true
        };
        self.recompute();
        now_selected
    }

    fn recompute(&mut self) {
        let clicked: Vec<u32> = self.clicked.iter().copied().collect();
        self.reconciled = reconcile(&self.parsed, &clicked);
    }

    /// The reconciled page set, sorted ascending.
    pub fn pages(&self) -> &[u32] {
        &self.reconciled
    }

    pub fn hint(&self) -> Option<(u32, u32)> {
        range_hint(&self.reconciled)
    }

    pub fn is_empty(&self) -> bool {
        self.reconciled.is_empty()
    }

    /// Full reset, used when the active document changes or a slice
    /// succeeds.
    pub fn clear(&mut self) {
        *self = SelectionState::default();
    }
}
