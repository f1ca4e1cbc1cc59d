use crate::pagination::PaginationController;
use crate::store::DocumentStore;
use anyhow::Result;

/// Stream all previews for a document through the pagination controller,
/// one batch at a time, until the stream is exhausted.
pub fn run(store: &DocumentStore, id: &str, batch_size: u32) -> Result<()> {
    let meta = store.get(id)?.clone();
    let mut controller = PaginationController::new(&meta.id, Some(meta.pages), batch_size);

    let mut printed = 0;
    while let Some(ticket) = controller.begin_fetch() {
        match store.fetch_preview_batch(&ticket.doc_id, ticket.offset, ticket.batch_size) {
            Ok(batch) => {
                controller.apply(&ticket, batch);
            }
            Err(err) => {
                controller.fail(&ticket);
                return Err(err.into());
            }
        }

        for page in &controller.pages()[printed..] {
            println!("--- Page {} ---", page.index);
            if page.preview.is_empty() {
                println!("(no text)");
            } else {
                println!("{}", page.preview);
            }
            println!();
        }
        printed = controller.pages().len();
    }

    println!(
        "{} of {} page(s) loaded.",
        controller.pages().len(),
        controller.total_pages()
    );

    Ok(())
}
