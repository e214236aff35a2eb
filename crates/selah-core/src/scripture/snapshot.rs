//! Snapshot download and read-only open
//!
//! The snapshot is a single SQLite file published at a fixed route on the
//! backend. On first use it is downloaded as opaque bytes, written to the
//! data directory with an atomic write (temp file, then rename), and opened
//! read-only. Later loads open the cached file without touching the network.
//!
//! A snapshot that fails validation is deleted from the cache so the next
//! load attempt re-downloads it.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::config::Config;
use crate::scripture::schema::snapshot_tables_present;

/// Download timeout for the snapshot fetch
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Magic bytes at the start of every SQLite file
const SQLITE_MAGIC: &[u8] = b"SQLite format 3\0";

/// Source of snapshot bytes
///
/// The store fetches through this seam so tests can substitute a local
/// source and count fetches.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the complete snapshot as opaque bytes
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Downloads the snapshot from the backend over HTTP
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    /// Create a source for the given snapshot URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Downloading scripture snapshot from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Failed to request snapshot from {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Snapshot download from {} was rejected", self.url))?;

        let bytes = response
            .bytes()
            .await
            .context("Failed to read snapshot body")?;

        Ok(bytes.to_vec())
    }
}

/// Load the snapshot, downloading it if not cached
///
/// Returns a read-only connection to a validated snapshot.
pub(crate) async fn load(config: &Config, source: &dyn SnapshotSource) -> Result<Connection> {
    let path = config.snapshot_path();

    if !path.exists() {
        let bytes = source.fetch().await.context("Snapshot fetch failed")?;

        if !bytes.starts_with(SQLITE_MAGIC) {
            bail!("Downloaded snapshot is not a SQLite database");
        }

        atomic_write(&path, &bytes)
            .with_context(|| format!("Failed to cache snapshot at {:?}", path))?;
        info!("Cached scripture snapshot at {:?} ({} bytes)", path, bytes.len());
    } else {
        debug!("Opening cached scripture snapshot at {:?}", path);
    }

    open_validated(&path)
}

/// Open a cached snapshot read-only and validate its layout
fn open_validated(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open snapshot at {:?}", path))?;

    let valid = snapshot_tables_present(&conn)
        .with_context(|| format!("Failed to inspect snapshot at {:?}", path))?;

    if !valid {
        drop(conn);
        // Evict so the next load re-downloads
        fs::remove_file(path).ok();
        bail!("Snapshot at {:?} is missing required tables", path);
    }

    Ok(conn)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;

    file.write_all(data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;

    // Sync to disk before rename
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    // Atomic rename
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripture::schema::init_schema;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            api_base_url: "http://localhost:0".to_string(),
        }
    }

    /// Build a valid snapshot file and return its bytes
    fn snapshot_bytes() -> Vec<u8> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixture.db");
        let conn = Connection::open(&path).unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO books (id, abbrev, name, chapters, testament, book_order)
             VALUES (1, 'gn', 'Gênesis', 50, 'OT', 1)",
            [],
        )
        .unwrap();
        drop(conn);
        fs::read(&path).unwrap()
    }

    /// Source that always fails
    struct FailingSource;

    #[async_trait]
    impl SnapshotSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            bail!("network unreachable")
        }
    }

    /// Source serving fixed bytes
    struct BytesSource(Vec<u8>);

    #[async_trait]
    impl SnapshotSource for BytesSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    /// Source that must never be consulted
    struct PanicSource;

    #[async_trait]
    impl SnapshotSource for PanicSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            panic!("cache should have been used");
        }
    }

    #[tokio::test]
    async fn test_load_downloads_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let conn = load(&config, &BytesSource(snapshot_bytes())).await.unwrap();
        assert!(config.snapshot_path().exists());

        let name: String = conn
            .query_row("SELECT name FROM books WHERE abbrev = 'gn'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(name, "Gênesis");
    }

    #[tokio::test]
    async fn test_load_prefers_cache() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        atomic_write(&config.snapshot_path(), &snapshot_bytes()).unwrap();

        // PanicSource proves no fetch happens
        let conn = load(&config, &PanicSource).await.unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_load_fails_without_network_or_cache() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let result = load(&config, &FailingSource).await;
        assert!(result.is_err());
        assert!(!config.snapshot_path().exists());
    }

    #[tokio::test]
    async fn test_load_rejects_non_sqlite_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let result = load(&config, &BytesSource(b"<html>404</html>".to_vec())).await;
        assert!(result.is_err());
        // Nothing was cached
        assert!(!config.snapshot_path().exists());
    }

    #[tokio::test]
    async fn test_invalid_cached_snapshot_is_evicted() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        // A real SQLite file, but with none of the expected tables
        let empty_db = {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("empty.db");
            let conn = Connection::open(&path).unwrap();
            conn.execute("CREATE TABLE unrelated (x INTEGER)", []).unwrap();
            drop(conn);
            fs::read(&path).unwrap()
        };
        atomic_write(&config.snapshot_path(), &empty_db).unwrap();

        let result = load(&config, &PanicSource).await;
        assert!(result.is_err());
        // Evicted so a later load can re-download
        assert!(!config.snapshot_path().exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path: PathBuf = temp_dir.path().join("a").join("b").join("file.bin");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        assert_eq!(fs::read(&nested_path).unwrap(), b"test data");
    }
}
