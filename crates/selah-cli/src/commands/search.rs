//! Verse search command

use anyhow::Result;

use selah_core::ScriptureStore;

use crate::output::Output;

/// Search verse text for a substring
pub async fn run(
    store: &ScriptureStore,
    query: &str,
    limit: Option<usize>,
    output: &Output,
) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Search query is empty");
    }

    let hits = store.search_verses(query, limit).await;
    output.print_hits(query, &hits);
    Ok(())
}
