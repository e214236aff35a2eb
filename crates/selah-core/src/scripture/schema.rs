//! Snapshot table layout
//!
//! The snapshot is produced offline by the ingestion tooling; at runtime it
//! is opened read-only and never mutated. This module defines the expected
//! layout for validation, and creates it for the tooling and for test
//! fixtures.

use rusqlite::Connection;

/// Tables a usable snapshot must contain
const REQUIRED_TABLES: &[&str] = &["books", "verses"];

/// Create the snapshot schema on an empty database
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- One row per canonical book
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY,
            abbrev TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            chapters INTEGER NOT NULL,
            testament TEXT NOT NULL CHECK (testament IN ('OT', 'NT')),
            book_order INTEGER NOT NULL
        );

        -- One row per verse; at most one per (book, chapter, verse)
        CREATE TABLE IF NOT EXISTS verses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL REFERENCES books(id),
            chapter INTEGER NOT NULL,
            verse INTEGER NOT NULL,
            text TEXT NOT NULL,
            UNIQUE (book_id, chapter, verse)
        );

        -- Chapter reads
        CREATE INDEX IF NOT EXISTS idx_verses_book_chapter ON verses(book_id, chapter);

        -- Abbreviation lookups
        CREATE INDEX IF NOT EXISTS idx_books_abbrev ON books(abbrev);
        "#,
    )
}

/// Check that all required tables are present
pub fn snapshot_tables_present(conn: &Connection) -> rusqlite::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;

    for table in REQUIRED_TABLES {
        if !stmt.exists([table])? {
            return Ok(false);
        }
    }

    Ok(true)
}
