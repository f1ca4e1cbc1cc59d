//! Windowed, resumable fetching of page previews for the active document.
//!
//! The controller is a pure state machine: `begin_fetch` hands out a ticket
//! describing the next window, the caller performs the fetch however it
//! likes, and `apply`/`fail` feed the outcome back. A ticket carries the
//! document id and offset it was issued for, so responses that arrive after
//! a document switch (or out of order) are discarded instead of corrupting
//! the new window.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One page preview. The payload is opaque to everything in this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPage {
    pub index: u32,
    pub preview: String,
}

/// One fetched window of the preview stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewBatch {
    pub pages: Vec<PreviewPage>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Exhausted,
}

/// Handed out by [`PaginationController::begin_fetch`]; must be presented
/// back with the fetch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub doc_id: String,
    pub offset: u32,
    pub batch_size: u32,
}

#[derive(Debug)]
pub struct PaginationController {
    doc_id: String,
    state: FetchState,
    offset: u32,
    batch_size: u32,
    total_pages: Option<u32>,
    pages: Vec<PreviewPage>,
}

impl PaginationController {
    /// Start a fresh window for `doc_id`. `known_total` seeds the total
    /// page count when the document's metadata already carries one.
    pub fn new(doc_id: &str, known_total: Option<u32>, batch_size: u32) -> Self {
        debug_assert!(batch_size > 0);
        PaginationController {
            doc_id: doc_id.to_string(),
            state: FetchState::Idle,
            offset: 0,
            batch_size,
            total_pages: known_total,
            pages: Vec::new(),
        }
    }

    /// Hard reset onto a different document: sequence cleared, offset
    /// zeroed, exhaustion cleared, total re-seeded. Any ticket issued
    /// before the reset becomes stale and will be rejected by `apply`.
    pub fn reset_for(&mut self, doc_id: &str, known_total: Option<u32>) {
        *self = PaginationController::new(doc_id, known_total, self.batch_size);
    }

    /// Request the next window. Returns `None` while a fetch is in flight
    /// (the in-flight guard), once the stream is exhausted, or when the
    /// known total tells us there is nothing left.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.state != FetchState::Idle {
            return None;
        }
        if let Some(total) = self.total_pages {
            if self.offset >= total {
                self.state = FetchState::Exhausted;
                return None;
            }
        }

        self.state = FetchState::Loading;
        Some(FetchTicket {
            doc_id: self.doc_id.clone(),
            offset: self.offset,
            batch_size: self.batch_size,
        })
    }

    /// Apply a successful fetch. Returns false (and changes nothing) when
    /// the ticket is stale: issued for another document, or for an offset
    /// other than the one we are waiting on.
    pub fn apply(&mut self, ticket: &FetchTicket, batch: PreviewBatch) -> bool {
        if !self.accepts(ticket) {
            debug!(
                doc = %ticket.doc_id,
                offset = ticket.offset,
                "discarding stale preview batch"
            );
            return false;
        }

        let returned = batch.pages.len() as u32;
        self.pages.extend(batch.pages);
        self.offset += returned;
        // A total reported by the source supersedes anything seeded earlier.
        if batch.total_pages.is_some() {
            self.total_pages = batch.total_pages;
        }

        let short_batch = returned < self.batch_size;
        let reached_total = self
            .total_pages
            .is_some_and(|total| self.offset >= total);

        self.state = if returned == 0 || short_batch || reached_total {
            debug!(doc = %self.doc_id, pages = self.pages.len(), "preview stream exhausted");
            FetchState::Exhausted
        } else {
            FetchState::Idle
        };
        true
    }

    /// Record a failed fetch: back to Idle with offset and sequence
    /// untouched, so the next "load more" retries the same window. Stale
    /// tickets are ignored here too.
    pub fn fail(&mut self, ticket: &FetchTicket) {
        if self.accepts(ticket) {
            self.state = FetchState::Idle;
        }
    }

    fn accepts(&self, ticket: &FetchTicket) -> bool {
        self.state == FetchState::Loading
            && ticket.doc_id == self.doc_id
            && ticket.offset == self.offset
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == FetchState::Exhausted
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// All previews fetched so far, in increasing-offset order.
    pub fn pages(&self) -> &[PreviewPage] {
        &self.pages
    }

    /// Best-known total page count. Provisional until the source reports
    /// one: falls back to the accumulated count.
    pub fn total_pages(&self) -> u32 {
        self.total_pages.unwrap_or(self.pages.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn batch(indices: std::ops::RangeInclusive<u32>, total: Option<u32>) -> PreviewBatch {
        PreviewBatch {
            pages: indices
                .map(|i| PreviewPage {
                    index: i,
                    preview: format!("page {i}"),
                })
                .collect(),
            total_pages: total,
        }
    }

    #[test]
    fn test_short_batch_exhausts() {
        // 8, 8, then 3 pages with no reported total: exhausted after the
        // third fetch with 19 pages accumulated and offset 19.
        let mut ctl = PaginationController::new("doc", None, 8);

        let t1 = ctl.begin_fetch().unwrap();
        assert_eq!(t1.offset, 0);
        assert!(ctl.apply(&t1, batch(1..=8, None)));
        assert_eq!(ctl.state(), FetchState::Idle);

        let t2 = ctl.begin_fetch().unwrap();
        assert_eq!(t2.offset, 8);
        assert!(ctl.apply(&t2, batch(9..=16, None)));

        let t3 = ctl.begin_fetch().unwrap();
        assert_eq!(t3.offset, 16);
        assert!(ctl.apply(&t3, batch(17..=19, None)));

        assert_eq!(ctl.state(), FetchState::Exhausted);
        assert_eq!(ctl.pages().len(), 19);
        assert_eq!(ctl.offset(), 19);
        assert_eq!(ctl.total_pages(), 19);
        assert!(ctl.begin_fetch().is_none());
    }

    #[test]
    fn test_empty_batch_exhausts() {
        let mut ctl = PaginationController::new("doc", None, 4);
        let t = ctl.begin_fetch().unwrap();
        assert!(ctl.apply(&t, PreviewBatch::default()));
        assert!(ctl.is_exhausted());
        assert!(ctl.pages().is_empty());
    }

    #[test]
    fn test_reported_total_exhausts_full_batch() {
        let mut ctl = PaginationController::new("doc", None, 4);
        let t = ctl.begin_fetch().unwrap();
        assert!(ctl.apply(&t, batch(1..=4, Some(4))));
        assert!(ctl.is_exhausted());
        assert_eq!(ctl.total_pages(), 4);
    }

    #[test]
    fn test_known_total_prevents_over_fetch() {
        let mut ctl = PaginationController::new("doc", Some(0), 4);
        assert!(ctl.begin_fetch().is_none());
        assert!(ctl.is_exhausted());
    }

    #[test]
    fn test_in_flight_guard() {
        let mut ctl = PaginationController::new("doc", None, 4);
        let ticket = ctl.begin_fetch().unwrap();
        // Rapid repeat triggers while loading get nothing.
        assert!(ctl.begin_fetch().is_none());
        assert!(ctl.begin_fetch().is_none());
        assert!(ctl.apply(&ticket, batch(1..=4, None)));
        assert!(ctl.begin_fetch().is_some());
    }

    #[test]
    fn test_failure_leaves_window_untouched() {
        let mut ctl = PaginationController::new("doc", None, 4);
        let t1 = ctl.begin_fetch().unwrap();
        assert!(ctl.apply(&t1, batch(1..=4, None)));

        let before_pages = ctl.pages().to_vec();
        let t2 = ctl.begin_fetch().unwrap();
        ctl.fail(&t2);

        assert_eq!(ctl.state(), FetchState::Idle);
        assert_eq!(ctl.offset(), 4);
        assert_eq!(ctl.pages(), &before_pages[..]);

        // Retry re-attempts the same window.
        let retry = ctl.begin_fetch().unwrap();
        assert_eq!(retry.offset, 4);
    }

    #[test]
    fn test_stale_response_after_document_switch() {
        let mut ctl = PaginationController::new("old", None, 4);
        let stale = ctl.begin_fetch().unwrap();

        ctl.reset_for("new", Some(12));
        let fresh = ctl.begin_fetch().unwrap();
        assert_eq!(fresh.doc_id, "new");

        // Late arrival for the superseded document must not be appended.
        assert!(!ctl.apply(&stale, batch(1..=4, None)));
        assert!(ctl.pages().is_empty());
        assert_eq!(ctl.state(), FetchState::Loading);

        assert!(ctl.apply(&fresh, batch(1..=4, Some(12))));
        assert_eq!(ctl.pages().len(), 4);
    }

    #[test]
    fn test_mismatched_offset_discarded() {
        let mut ctl = PaginationController::new("doc", None, 4);
        let t1 = ctl.begin_fetch().unwrap();
        assert!(ctl.apply(&t1, batch(1..=4, None)));

        // Replay of the first window after it already applied.
        assert!(!ctl.apply(&t1, batch(1..=4, None)));
        assert_eq!(ctl.pages().len(), 4);
        assert_eq!(ctl.offset(), 4);
    }

    #[test]
    fn test_reset_reseeds_total() {
        let mut ctl = PaginationController::new("a", Some(30), 8);
        let t = ctl.begin_fetch().unwrap();
        assert!(ctl.apply(&t, batch(1..=8, None)));
        assert_eq!(ctl.total_pages(), 30);

        ctl.reset_for("b", Some(5));
        assert_eq!(ctl.offset(), 0);
        assert_eq!(ctl.total_pages(), 5);
        assert!(ctl.pages().is_empty());
        assert_eq!(ctl.state(), FetchState::Idle);
    }
}
