use crate::store::DocumentStore;
use anyhow::Result;

pub fn run(store: &mut DocumentStore, id: &str) -> Result<()> {
    store.delete(id)?;
    println!("Deleted {}", id);
    Ok(())
}
