use crate::select::{self, pattern, request};
use crate::store::DocumentStore;
use anyhow::Result;

/// Slice a document: pages come from the typed pattern, the explicitly
/// listed extra pages, or both. The two sources are reconciled into one
/// sorted set before the request is built.
pub fn run(
    store: &mut DocumentStore,
    id: &str,
    pattern: Option<&str>,
    extra_pages: &[u32],
) -> Result<()> {
    let meta = store.get(id)?.clone();

    let parsed = match pattern {
        Some(input) => pattern::parse(input, meta.pages)?,
        None => Vec::new(),
    };

    for &page in extra_pages {
        if page < 1 || page > meta.pages {
            anyhow::bail!("Page {} is out of range (1-{})", page, meta.pages);
        }
    }

    let selected = select::reconcile(&parsed, extra_pages);
    let slice_request = request::build(&selected, select::range_hint(&selected))?;
    let new_meta = store.slice(id, &slice_request)?;

    println!(
        "Sliced {} page(s) from {} into {}",
        selected.len(),
        id,
        new_meta.id
    );

    Ok(())
}
