//! Document storage: a directory of PDFs with in-memory metadata, plus the
//! page-level operations (slice, merge, rotate) exposed to the session.

pub mod preview;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::select::request::SliceRequest;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document {0} not found")]
    NotFound(String),
    #[error("Invalid page range {start}-{end} for document with {pages} page(s)")]
    InvalidSliceRange { start: u32, end: u32, pages: u32 },
    #[error("Page {page} is out of range (1-{pages})")]
    PageOutOfRange { page: u32, pages: u32 },
    #[error("No documents provided for merging")]
    EmptyMerge,
    #[error("No pages supplied for rotation")]
    EmptyRotation,
    #[error("Rotation angle {0} is not a multiple of 90")]
    InvalidAngle(i32),
    #[error("Malformed PDF: {0}")]
    Malformed(String),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Metadata for one stored PDF.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub pages: u32,
}

pub struct DocumentStore {
    root: PathBuf,
    documents: BTreeMap<String, DocumentMeta>,
}

impl DocumentStore {
    /// Open (creating if needed) the storage directory and register every
    /// PDF already in it. Unreadable files are skipped with a warning.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let mut store = DocumentStore {
            root,
            documents: BTreeMap::new(),
        };

        for entry in WalkDir::new(&store.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            {
                continue;
            }
            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let name = format!("{id}.pdf");
            if let Err(err) = store.register(id.clone(), name, path.to_path_buf()) {
                warn!(doc = %id, error = %err, "skipping unreadable PDF during bootstrap");
            }
        }

        Ok(store)
    }

    fn register(
        &mut self,
        id: String,
        name: String,
        path: PathBuf,
    ) -> Result<DocumentMeta, StoreError> {
        let doc = Document::load(&path)?;
        let meta = DocumentMeta {
            id: id.clone(),
            name,
            path,
            pages: doc.get_pages().len() as u32,
        };
        self.documents.insert(id, meta.clone());
        Ok(meta)
    }

    /// All documents, ordered by id.
    pub fn list(&self) -> impl Iterator<Item = &DocumentMeta> {
        self.documents.values()
    }

    pub fn get(&self, id: &str) -> Result<&DocumentMeta, StoreError> {
        self.documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Copy an external PDF into the store under a fresh id.
    pub fn add(&mut self, source: &Path, name: Option<&str>) -> Result<DocumentMeta, StoreError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let id = self.unique_id(&sanitize(stem));
        let dest = self.root.join(format!("{id}.pdf"));
        std::fs::copy(source, &dest)?;

        let display = match name {
            Some(n) => sanitize(n),
            None => format!("{id}.pdf"),
        };
        let meta = self.register(id, display, dest)?;
        info!(doc = %meta.id, pages = meta.pages, "added document");
        Ok(meta)
    }

    /// Create a new document containing the requested pages. The explicit
    /// page list in the request is authoritative; the range bounds are
    /// only used when the list is empty.
    pub fn slice(&mut self, id: &str, request: &SliceRequest) -> Result<DocumentMeta, StoreError> {
        let meta = self.get(id)?.clone();

        let pages: Vec<u32> = if !request.pages.is_empty() {
            let mut pages = request.pages.clone();
            pages.sort_unstable();
            pages.dedup();
            pages
        } else {
            if request.start_page < 1
                || request.start_page > request.end_page
                || request.end_page > meta.pages
            {
                return Err(StoreError::InvalidSliceRange {
                    start: request.start_page,
                    end: request.end_page,
                    pages: meta.pages,
                });
            }
            (request.start_page..=request.end_page).collect()
        };

        for &page in &pages {
            if page < 1 || page > meta.pages {
                return Err(StoreError::PageOutOfRange {
                    page,
                    pages: meta.pages,
                });
            }
        }

        let doc = Document::load(&meta.path)?;
        let mut sliced = extract_pages(&doc, &pages);

        let out_id = self.unique_id(&format!("{}-slice", meta.id));
        let out_path = self.root.join(format!("{out_id}.pdf"));
        sliced.save(&out_path)?;

        let new_meta = self.register(out_id, format!("{}-slice.pdf", meta.id), out_path)?;
        info!(doc = %id, new = %new_meta.id, pages = new_meta.pages, "sliced document");
        Ok(new_meta)
    }

    /// Combine the given documents, in order, into a new one.
    pub fn merge(
        &mut self,
        ids: &[String],
        name: Option<&str>,
    ) -> Result<DocumentMeta, StoreError> {
        let first = match ids.first() {
            Some(id) => self.get(id)?.clone(),
            None => return Err(StoreError::EmptyMerge),
        };

        let mut merged = Document::load(&first.path)?;
        for id in &ids[1..] {
            let meta = self.get(id)?.clone();
            let doc = Document::load(&meta.path)?;
            append_pages(&mut merged, &doc)?;
        }

        let out_id = self.unique_id(&format!("{}-merged", first.id));
        let out_path = self.root.join(format!("{out_id}.pdf"));
        merged.save(&out_path)?;

        let display = match name {
            Some(n) => sanitize(n),
            None => format!("{out_id}.pdf"),
        };
        let new_meta = self.register(out_id, display, out_path)?;
        info!(count = ids.len(), new = %new_meta.id, pages = new_meta.pages, "merged documents");
        Ok(new_meta)
    }

    /// Rotate the given pages by `angle` degrees (a multiple of 90) and
    /// store the result as a new document.
    pub fn rotate(
        &mut self,
        id: &str,
        pages: &[u32],
        angle: i32,
    ) -> Result<DocumentMeta, StoreError> {
        if pages.is_empty() {
            return Err(StoreError::EmptyRotation);
        }
        if angle % 90 != 0 {
            return Err(StoreError::InvalidAngle(angle));
        }

        let meta = self.get(id)?.clone();
        let mut doc = Document::load(&meta.path)?;
        let page_ids = doc.get_pages();

        for &page in pages {
            let Some(&object_id) = page_ids.get(&page) else {
                return Err(StoreError::PageOutOfRange {
                    page,
                    pages: meta.pages,
                });
            };
            let dict = doc.get_dictionary_mut(object_id)?;
            let current = dict
                .get(b"Rotate")
                .and_then(|obj| obj.as_i64())
                .unwrap_or(0);
            dict.set("Rotate", (current + angle as i64).rem_euclid(360));
        }

        let out_id = self.unique_id(&format!("{}-rotated", meta.id));
        let out_path = self.root.join(format!("{out_id}.pdf"));
        doc.save(&out_path)?;

        let out_name = format!("{out_id}.pdf");
        let new_meta = self.register(out_id, out_name, out_path)?;
        info!(doc = %id, new = %new_meta.id, angle, "rotated pages");
        Ok(new_meta)
    }

    /// Remove a document's metadata and its file.
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let meta = self
            .documents
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        std::fs::remove_file(&meta.path)?;
        info!(doc = %id, "deleted document");
        Ok(())
    }

    fn unique_id(&self, base: &str) -> String {
        if !self.documents.contains_key(base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.documents.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn sanitize(name: &str) -> String {
    name.replace(char::is_whitespace, "_")
}

/// New document containing only `keep` (1-based, sorted), by deleting the
/// complement from a clone of the source.
fn extract_pages(doc: &Document, keep: &[u32]) -> Document {
    let mut new_doc = doc.clone();
    let to_delete: Vec<u32> = doc
        .get_pages()
        .keys()
        .copied()
        .filter(|page| !keep.contains(page))
        .collect();
    if !to_delete.is_empty() {
        new_doc.delete_pages(&to_delete);
    }
    new_doc
}

/// Append every page of `other` to `merged`'s page tree. Objects referenced
/// by the copied pages are cloned shallowly; complex PDFs with shared
/// resources may need a deep copy.
fn append_pages(merged: &mut Document, other: &Document) -> Result<(), StoreError> {
    let pages_id = {
        let catalog = merged.catalog()?;
        match catalog.get(b"Pages")? {
            Object::Reference(id) => *id,
            _ => return Err(StoreError::Malformed("catalog has no page tree".to_string())),
        }
    };

    for (_, page_id) in other.get_pages() {
        let mut page_obj = other.get_object(page_id)?.clone();
        if let Object::Dictionary(dict) = &mut page_obj {
            dict.set("Parent", Object::Reference(pages_id));
        }
        let new_id = merged.add_object(page_obj);

        let pages_dict = merged.get_dictionary_mut(pages_id)?;
        if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
            kids.push(Object::Reference(new_id));
        }
        if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
            *count += 1;
        }
    }

    Ok(())
}
