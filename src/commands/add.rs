use crate::store::DocumentStore;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(store: &mut DocumentStore, path: P, name: Option<&str>) -> Result<()> {
    let meta = store.add(path.as_ref(), name)?;

    println!(
        "Added {} as {} ({} page(s))",
        path.as_ref().display(),
        meta.id,
        meta.pages
    );

    Ok(())
}
