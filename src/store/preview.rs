//! Windowed preview batches served from the store.
//!
//! A preview is a short text snippet of the page. The payload is opaque to
//! the pagination layer, which only cares about window bounds and counts.

use tracing::warn;

use super::{DocumentStore, StoreError};
use crate::pagination::{PreviewBatch, PreviewPage};

/// Longest snippet returned per page, in characters.
const SNIPPET_CHARS: usize = 200;

impl DocumentStore {
    /// Fetch one window of page previews: pages `offset+1 ..= offset+batch_size`,
    /// clamped to the document's page count. An offset at or past the end
    /// yields an empty batch. The response always reports the total.
    pub fn fetch_preview_batch(
        &self,
        id: &str,
        offset: u32,
        batch_size: u32,
    ) -> Result<PreviewBatch, StoreError> {
        let meta = self.get(id)?;
        let total = meta.pages;

        let start = offset.min(total);
        let end = offset.saturating_add(batch_size).min(total);
        if start >= end {
            return Ok(PreviewBatch {
                pages: Vec::new(),
                total_pages: Some(total),
            });
        }

        let bytes = std::fs::read(&meta.path)?;
        // Previews are best-effort: a PDF we cannot extract text from still
        // pages through the UI, just with blank snippets.
        let text = match pdf_extract::extract_text_from_mem(&bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(doc = %id, error = %err, "text extraction failed, serving blank previews");
                String::new()
            }
        };
        let page_texts: Vec<&str> = text.split('\x0C').collect();

        let pages = (start..end)
            .map(|i| PreviewPage {
                index: i + 1,
                preview: snippet(page_texts.get(i as usize).copied().unwrap_or("")),
            })
            .collect();

        Ok(PreviewBatch {
            pages,
            total_pages: Some(total),
        })
    }
}

fn snippet(text: &str) -> String {
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    let collapsed = collapsed.join(" ");
    if collapsed.chars().count() > SNIPPET_CHARS {
        collapsed.chars().take(SNIPPET_CHARS).collect()
    } else {
        collapsed
    }
}
