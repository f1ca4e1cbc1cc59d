use crate::select::pattern;
use crate::store::DocumentStore;
use anyhow::Result;

pub fn run(store: &mut DocumentStore, id: &str, pages: &str, angle: i32) -> Result<()> {
    let meta = store.get(id)?.clone();
    let page_list = pattern::parse(pages, meta.pages)?;

    let new_meta = store.rotate(id, &page_list, angle)?;

    println!(
        "Rotated {} page(s) of {} by {}°, stored as {}",
        page_list.len(),
        id,
        angle,
        new_meta.id
    );

    Ok(())
}
