//! Offline scripture store
//!
//! Serves the full scripture corpus from a pre-built SQLite snapshot so
//! reading and search work without a network connection:
//!
//! - `store`: the `ScriptureStore` handle (initialize, query, dispose)
//! - `snapshot`: snapshot download, disk cache, and read-only open
//! - `schema`: snapshot table layout and validation
//! - `abbrev`: book abbreviation normalization

pub mod abbrev;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use snapshot::{HttpSnapshotSource, SnapshotSource};
pub use store::ScriptureStore;
