//! Daily verse command
//!
//! Fetches today's verse from the backend API through the resilient fetch
//! client. When the backend is unreachable the verse is resolved locally
//! from the scripture snapshot instead.

use anyhow::Result;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use selah_core::{Config, FetchClient, RequestOptions, ScriptureStore};

use crate::output::Output;

/// Backend route for the daily verse
const DAILY_VERSE_ROUTE: &str = "/api/daily-verse";

/// References used when the backend is unreachable, rotated by day of year
const FALLBACK_REFS: &[(&str, u32, u32)] = &[
    ("jo", 3, 16),
    ("sl", 23, 1),
    ("gn", 1, 1),
    ("jo", 1, 1),
];

/// Daily verse payload returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyVerse {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// Show today's verse, falling back to the local snapshot
pub async fn run(
    store: &ScriptureStore,
    client: &FetchClient,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let url = config.api_url(DAILY_VERSE_ROUTE);

    let fetched = client
        .request_with_fallback::<DailyVerse, _, _>(&url, &RequestOptions::default(), || {
            local_daily_verse(store)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Could not resolve daily verse: {}", e))?;

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "daily": fetched.data,
            "from_cache": fetched.from_cache,
        }));
    } else {
        let verse = &fetched.data;
        output.print_verse(&verse.book, verse.chapter, verse.verse, &verse.text);
        if fetched.from_cache {
            println!("(offline - served from local snapshot)");
        }
    }

    Ok(())
}

/// Pick today's fallback reference and resolve it from the snapshot
async fn local_daily_verse(store: &ScriptureStore) -> Result<DailyVerse> {
    let index = Utc::now().ordinal() as usize % FALLBACK_REFS.len();
    let (book, chapter, verse) = FALLBACK_REFS[index];
    debug!("Resolving daily verse locally: {} {}:{}", book, chapter, verse);

    let text = store
        .get_verse(book, chapter, verse)
        .await
        .ok_or_else(|| anyhow::anyhow!("Local snapshot unavailable"))?;

    Ok(DailyVerse {
        book: book.to_string(),
        chapter,
        verse,
        text,
    })
}
