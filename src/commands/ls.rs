use crate::store::DocumentStore;

pub fn run(store: &DocumentStore) {
    let mut count = 0;
    for meta in store.list() {
        println!("{}  {} ({} page(s))", meta.id, meta.name, meta.pages);
        count += 1;
    }

    if count == 0 {
        println!("No documents in store.");
    } else {
        println!("\n{} document(s).", count);
    }
}
