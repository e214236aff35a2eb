//! Book listing command

use anyhow::Result;

use selah_core::ScriptureStore;

use crate::output::Output;

/// List all books in canonical order
pub async fn list(store: &ScriptureStore, output: &Output) -> Result<()> {
    let books = store.list_books().await;

    if books.is_empty() {
        anyhow::bail!("Scripture data unavailable (snapshot not downloaded yet?)");
    }

    output.print_books(&books);
    Ok(())
}
