//! Read-only scripture store
//!
//! `ScriptureStore` is an explicit handle with a controlled lifecycle:
//! construct, `initialize`, query, `dispose`. Initialization is lazy and
//! single-flight; concurrent callers share one snapshot load. After a
//! successful load every query is served from the local snapshot.
//!
//! The store exists to degrade gracefully when the backend is unreachable,
//! so no public operation returns an error: a failed load or a failed query
//! is logged and surfaces to callers as an empty or `None` result.

use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{Book, ChapterView, SearchHit, Testament, Verse};
use crate::scripture::abbrev;
use crate::scripture::snapshot::{self, HttpSnapshotSource, SnapshotSource};

/// Default cap on search results
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Lifecycle state of the store
enum State {
    /// Not loaded; `initialize` will attempt a load
    Idle,
    /// Snapshot open and ready for queries
    Ready(Connection),
    /// Load failed; queries degrade to empty until `dispose`
    Failed,
}

/// Offline scripture store backed by the local snapshot
pub struct ScriptureStore {
    state: Mutex<State>,
    source: Box<dyn SnapshotSource>,
    config: Config,
}

impl ScriptureStore {
    /// Create a store that downloads the snapshot from the configured backend
    pub fn new(config: Config) -> Self {
        let source = HttpSnapshotSource::new(config.snapshot_url());
        Self::with_source(config, Box::new(source))
    }

    /// Create a store with a custom snapshot source
    pub fn with_source(config: Config, source: Box<dyn SnapshotSource>) -> Self {
        Self {
            state: Mutex::new(State::Idle),
            source,
            config,
        }
    }

    /// Load the snapshot if not already loaded
    ///
    /// Idempotent and single-flight: callers arriving during a load wait for
    /// that same load and proceed uniformly. A failed load leaves the store
    /// in a degraded state (all queries empty) until `dispose` resets it.
    pub async fn initialize(&self) {
        let mut state = self.state.lock().await;

        match *state {
            State::Ready(_) | State::Failed => {}
            State::Idle => {
                info!("Initializing scripture store");
                match snapshot::load(&self.config, self.source.as_ref()).await {
                    Ok(conn) => {
                        info!("Scripture store ready");
                        *state = State::Ready(conn);
                    }
                    Err(e) => {
                        warn!("Scripture store unavailable: {:#}", e);
                        *state = State::Failed;
                    }
                }
            }
        }
    }

    /// Whether the snapshot is loaded and queryable
    ///
    /// Synchronous probe with no side effects; reports `false` while a load
    /// is in flight.
    pub fn is_ready(&self) -> bool {
        self.state
            .try_lock()
            .map(|state| matches!(*state, State::Ready(_)))
            .unwrap_or(false)
    }

    /// Release the snapshot
    ///
    /// The store returns to its unloaded state; a later `initialize` may
    /// load again (from cache or network).
    pub async fn dispose(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, State::Ready(_)) {
            debug!("Disposing scripture store");
        }
        *state = State::Idle;
    }

    /// All books in canonical order
    ///
    /// Empty when the store is not ready.
    pub async fn list_books(&self) -> Vec<Book> {
        self.read("list_books", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, abbrev, name, chapters, testament, book_order
                 FROM books ORDER BY book_order",
            )?;
            let rows = stmt.query_map([], book_from_row)?;
            rows.collect()
        })
        .await
        .unwrap_or_default()
    }

    /// Look up a book by abbreviation
    ///
    /// The key is normalized first (lowercasing plus the alias table), so
    /// `"GN"`, `"gn"`, and `"Gên"` all resolve to the same book.
    pub async fn get_book(&self, abbrev: &str) -> Option<Book> {
        let key = abbrev::normalize(abbrev);

        self.read("get_book", |conn| get_book_by_key(conn, &key))
            .await
            .flatten()
    }

    /// A full chapter with its verses, plus the book's chapter count
    ///
    /// `None` for an unknown book or a chapter with no verses (out of range).
    pub async fn get_chapter(&self, abbrev: &str, chapter: u32) -> Option<ChapterView> {
        let key = abbrev::normalize(abbrev);

        self.read("get_chapter", |conn| {
            let Some(book) = get_book_by_key(conn, &key)? else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT id, book_id, chapter, verse, text
                 FROM verses WHERE book_id = ?1 AND chapter = ?2
                 ORDER BY verse",
            )?;
            let verses: Vec<Verse> = stmt
                .query_map(params![book.id, chapter], verse_from_row)?
                .collect::<rusqlite::Result<_>>()?;

            if verses.is_empty() {
                return Ok(None);
            }

            let total_chapters = book.chapters;
            Ok(Some(ChapterView {
                book,
                number: chapter,
                verses,
                total_chapters,
            }))
        })
        .await
        .flatten()
    }

    /// The text of a single verse, or `None` if it does not exist
    pub async fn get_verse(&self, abbrev: &str, chapter: u32, verse: u32) -> Option<String> {
        let key = abbrev::normalize(abbrev);

        self.read("get_verse", |conn| {
            conn.query_row(
                "SELECT v.text FROM verses v
                 JOIN books b ON b.id = v.book_id
                 WHERE b.abbrev = ?1 AND v.chapter = ?2 AND v.verse = ?3",
                params![key, chapter, verse],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .flatten()
    }

    /// Case-insensitive substring search over all verse text
    ///
    /// Results are ordered by (canonical book order, chapter, verse) and
    /// capped at `limit` (default `DEFAULT_SEARCH_LIMIT`). A blank query
    /// yields nothing. `%` and `_` in the query are matched literally.
    pub async fn search_verses(&self, query: &str, limit: Option<usize>) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let pattern = format!("%{}%", escape_like(&needle));

        self.read("search_verses", move |conn| {
            let mut stmt = conn.prepare(
                r#"SELECT b.abbrev, b.name, b.book_order, v.chapter, v.verse, v.text
                   FROM verses v
                   JOIN books b ON b.id = v.book_id
                   WHERE LOWER(v.text) LIKE ?1 ESCAPE '\'
                   ORDER BY b.book_order, v.chapter, v.verse
                   LIMIT ?2"#,
            )?;
            let rows = stmt.query_map(params![pattern, limit as i64], |row| {
                Ok(SearchHit {
                    book_abbrev: row.get(0)?,
                    book_name: row.get(1)?,
                    book_order: row.get(2)?,
                    chapter: row.get(3)?,
                    verse: row.get(4)?,
                    text: row.get(5)?,
                })
            })?;
            rows.collect()
        })
        .await
        .unwrap_or_default()
    }

    /// Run a query against the snapshot, degrading on any failure
    ///
    /// Returns `None` when the store is not ready or the query errors;
    /// errors are logged, never propagated.
    async fn read<T>(
        &self,
        op: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Option<T> {
        let state = self.state.lock().await;

        let State::Ready(conn) = &*state else {
            debug!("Scripture store not ready, {} returns empty", op);
            return None;
        };

        match f(conn) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Scripture query {} failed: {}", op, e);
                None
            }
        }
    }
}

/// Look up a book by its already-normalized key
fn get_book_by_key(conn: &Connection, key: &str) -> rusqlite::Result<Option<Book>> {
    conn.query_row(
        "SELECT id, abbrev, name, chapters, testament, book_order
         FROM books WHERE abbrev = ?1",
        params![key],
        book_from_row,
    )
    .optional()
}

fn book_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
    let testament_text: String = row.get(4)?;
    let testament = Testament::from_db(&testament_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown testament value {:?}", testament_text).into(),
        )
    })?;

    Ok(Book {
        id: row.get(0)?,
        abbrev: row.get(1)?,
        name: row.get(2)?,
        chapters: row.get(3)?,
        testament,
        order: row.get(5)?,
    })
}

fn verse_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Verse> {
    Ok(Verse {
        id: row.get(0)?,
        book_id: row.get(1)?,
        chapter: row.get(2)?,
        verse: row.get(3)?,
        text: row.get(4)?,
    })
}

/// Escape `LIKE` metacharacters so queries match them literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
