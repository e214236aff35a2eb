//! Chapter and verse reading commands

use anyhow::Result;

use selah_core::ScriptureStore;

use crate::output::Output;

/// Print a full chapter
pub async fn chapter(
    store: &ScriptureStore,
    book: &str,
    chapter: u32,
    output: &Output,
) -> Result<()> {
    match store.get_chapter(book, chapter).await {
        Some(view) => {
            output.print_chapter(&view);
            Ok(())
        }
        None => anyhow::bail!("Chapter not found: {} {}", book, chapter),
    }
}

/// Print a single verse
pub async fn verse(
    store: &ScriptureStore,
    book: &str,
    chapter: u32,
    verse: u32,
    output: &Output,
) -> Result<()> {
    match store.get_verse(book, chapter, verse).await {
        Some(text) => {
            output.print_verse(book, chapter, verse, &text);
            Ok(())
        }
        None => anyhow::bail!("Verse not found: {} {}:{}", book, chapter, verse),
    }
}
