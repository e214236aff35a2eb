//! Selah Core Library
//!
//! This crate provides the offline-first data layer for Selah, a scripture
//! reading application.
//!
//! # Architecture
//!
//! Two independent components:
//!
//! - **Scripture store**: a pre-built SQLite snapshot of the full scripture
//!   corpus, downloaded once and opened read-only. All book/chapter/verse
//!   queries are served locally, with no network round-trip.
//! - **Fetch client**: a resilient wrapper for backend API calls with
//!   per-attempt timeouts, exponential-backoff retry, and optional fallback
//!   resolution when every attempt fails.
//!
//! # Quick Start
//!
//! ```text
//! let store = ScriptureStore::new(Config::load()?);
//! store.initialize().await;
//!
//! let chapter = store.get_chapter("jo", 3).await;
//! let hits = store.search_verses("amor", None).await;
//! ```
//!
//! # Modules
//!
//! - `scripture`: snapshot loading and read-only scripture queries
//! - `net`: resilient HTTP fetch client
//! - `models`: book, verse, and query-result types
//! - `config`: application configuration

pub mod config;
pub mod models;
pub mod net;
pub mod scripture;

pub use config::Config;
pub use models::{Book, ChapterView, SearchHit, Testament, Verse};
pub use net::{FetchClient, FetchError, Fetched, RequestOptions};
pub use scripture::{ScriptureStore, SnapshotSource};
