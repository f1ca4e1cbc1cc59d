//! Per-session state for the interactive picking flow: the active document
//! with its selection and pagination window. Selecting a different document
//! replaces everything; nothing carries across documents.

use crate::pagination::PaginationController;
use crate::select::SelectionState;
use crate::store::DocumentMeta;

pub const DEFAULT_BATCH_SIZE: u32 = 8;

#[derive(Debug, Default)]
pub struct Session {
    active: Option<ActiveDocument>,
}

#[derive(Debug)]
pub struct ActiveDocument {
    pub meta: DocumentMeta,
    pub selection: SelectionState,
    pub pagination: PaginationController,
}

impl ActiveDocument {
    /// Reset after a successful slice: selection and pagination window both
    /// start over for the (unchanged) active document.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.pagination.reset_for(&self.meta.id, Some(self.meta.pages));
    }
}

impl Session {
    /// Make `meta` the active document, discarding any previous selection
    /// and pagination window.
    pub fn select(&mut self, meta: DocumentMeta, batch_size: u32) {
        let pagination = PaginationController::new(&meta.id, Some(meta.pages), batch_size);
        self.active = Some(ActiveDocument {
            meta,
            selection: SelectionState::default(),
            pagination,
        });
    }

    pub fn active(&self) -> Option<&ActiveDocument> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveDocument> {
        self.active.as_mut()
    }

    /// Drop the session state if `id` is the active document (it was
    /// deleted out from under us).
    pub fn clear_if(&mut self, id: &str) {
        if self.active.as_ref().is_some_and(|a| a.meta.id == id) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn meta(id: &str, pages: u32) -> DocumentMeta {
        DocumentMeta {
            id: id.to_string(),
            name: format!("{id}.pdf"),
            path: PathBuf::from(format!("{id}.pdf")),
            pages,
        }
    }

    #[test]
    fn test_select_replaces_state() {
        let mut session = Session::default();
        session.select(meta("a", 10), 4);
        let active = session.active_mut().unwrap();
        active.selection.toggle(3);
        let ticket = active.pagination.begin_fetch().unwrap();
        assert_eq!(ticket.doc_id, "a");

        session.select(meta("b", 6), 4);
        let active = session.active().unwrap();
        assert!(active.selection.is_empty());
        assert_eq!(active.pagination.offset(), 0);
        assert_eq!(active.pagination.total_pages(), 6);
    }

    #[test]
    fn test_reset_after_slice() {
        let mut session = Session::default();
        session.select(meta("a", 10), 4);
        let active = session.active_mut().unwrap();
        active.selection.set_parsed(vec![1, 2]);
        active.reset();
        assert!(active.selection.is_empty());
        assert_eq!(active.pagination.offset(), 0);
    }

    #[test]
    fn test_clear_if() {
        let mut session = Session::default();
        session.select(meta("a", 10), 4);
        session.clear_if("other");
        assert!(session.active().is_some());
        session.clear_if("a");
        assert!(session.active().is_none());
    }
}
