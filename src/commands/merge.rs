use crate::store::DocumentStore;
use anyhow::Result;

pub fn run(store: &mut DocumentStore, ids: &[String], name: Option<&str>) -> Result<()> {
    let meta = store.merge(ids, name)?;

    println!(
        "Merged {} document(s) ({} pages) into {}",
        ids.len(),
        meta.pages,
        meta.id
    );

    Ok(())
}
