//! Data models for Selah
//!
//! Defines the read-only scripture types served from the local snapshot:
//! books, verses, and the bundled query results handed to consumers.

use serde::{Deserialize, Serialize};

/// Which testament a book belongs to
///
/// Stored in the snapshot as the text values `OT` / `NT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Testament {
    #[serde(rename = "OT")]
    Old,
    #[serde(rename = "NT")]
    New,
}

impl Testament {
    /// Parse the snapshot's text representation
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "OT" => Some(Testament::Old),
            "NT" => Some(Testament::New),
            _ => None,
        }
    }

    /// Text representation as stored in the snapshot
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Testament::Old => "OT",
            Testament::New => "NT",
        }
    }
}

/// A canonical book of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Snapshot row ID
    pub id: i64,
    /// Unique lowercase abbreviation (lookup key)
    pub abbrev: String,
    /// Display name
    pub name: String,
    /// Number of chapters in the book
    pub chapters: u32,
    /// Old or New Testament
    pub testament: Testament,
    /// Canonical position (1-based)
    pub order: u32,
}

/// A single verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Snapshot row ID
    pub id: i64,
    /// Book this verse belongs to
    pub book_id: i64,
    /// Chapter number (1-based)
    pub chapter: u32,
    /// Verse number within the chapter (1-based)
    pub verse: u32,
    /// Verse text
    pub text: String,
}

/// A chapter query result, bundled for pagination by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterView {
    /// The resolved book
    pub book: Book,
    /// Chapter number (1-based)
    pub number: u32,
    /// Verses ordered by verse number
    pub verses: Vec<Verse>,
    /// Total chapters in the book (for previous/next navigation)
    pub total_chapters: u32,
}

/// A single search result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Abbreviation of the containing book
    pub book_abbrev: String,
    /// Display name of the containing book
    pub book_name: String,
    /// Canonical position of the containing book
    pub book_order: u32,
    /// Chapter number
    pub chapter: u32,
    /// Verse number
    pub verse: u32,
    /// Verse text
    pub text: String,
}
