//! # File I/O Module
//!
//! Reads and writes rate tables and issued quotes with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Keep a price refresher and an operator from writing
//!   the same rate table at once
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Formats
//!
//! Rate tables are JSON (`.json`) or TOML (`.toml`), chosen by extension.
//! Quotes are saved as JSON [`QuoteRecord`]s. Lock files append `.lock` to
//! the locked file's name and carry metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::file_io::{save_rate_table, load_rate_table, FileLock};
//! use quote_core::rates::RateTable;
//! use std::path::Path;
//!
//! let path = Path::new("rates.toml");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "pricing@example.com").unwrap();
//! save_rate_table(&RateTable::standard(), path).unwrap();
//! drop(lock);
//!
//! let table = load_rate_table(path).unwrap();
//! assert_eq!(table.source, "standard");
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::Quote;
use crate::errors::{QuoteError, QuoteResult};
use crate::rates::{RateTable, RATE_SCHEMA_VERSION};

/// Schema version written into saved quote records
pub const QUOTE_RECORD_VERSION: &str = "0.1.0";

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or service name)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Holds an OS-level lock (via fs2) on the `.lock` file and writes
/// [`LockInfo`] into it so other users can see who holds it.
#[derive(Debug)]
pub struct FileLock {
    target_path: PathBuf,
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a file.
    ///
    /// Fails with [`QuoteError::FileLocked`] if a live process holds it.
    /// Locks left behind by dead processes, or older than 24 hours, are
    /// taken over.
    ///
    /// ```rust,no_run
    /// use quote_core::file_io::FileLock;
    /// use std::path::Path;
    ///
    /// let lock = FileLock::acquire(Path::new("rates.json"), "price-refresher")?;
    /// // ... write the table ...
    /// drop(lock);
    /// # Ok::<(), quote_core::errors::QuoteError>(())
    /// ```
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> QuoteResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(QuoteError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                debug!(path = %path.display(), holder = %existing.user_id, "Taking over stale lock");
            }
        }

        // Truncate only once the OS lock is ours so a live holder keeps its metadata
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| QuoteError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            QuoteError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        lock_file
            .set_len(0)
            .map_err(|e| QuoteError::file_error("truncate lock", lock_path.display().to_string(), e.to_string()))?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| QuoteError::serialization(e.to_string()))?;

        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| QuoteError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file
            .sync_all()
            .map_err(|e| QuoteError::file_error("sync lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(FileLock {
            target_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// The locked file
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock goes with _lock_file
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `rates.json` -> `rates.json.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    with_suffix(path, "lock")
}

/// `rates.json` -> `rates.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    with_suffix(path, "tmp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    let extension = out
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    out.set_extension(extension);
    out
}

fn read_lock_info(lock_path: &Path) -> QuoteResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| QuoteError::serialization(e.to_string()))
}

/// A lock is stale if its process is gone (same machine) or it is over a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

fn read_to_string(path: &Path, operation: &str) -> QuoteResult<String> {
    let mut file = File::open(path).map_err(|e| QuoteError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| QuoteError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `contents` to `path` atomically: temp file, fsync, rename.
fn write_atomic(path: &Path, contents: &str) -> QuoteResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| QuoteError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| QuoteError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| QuoteError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        QuoteError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

// ============================================================================
// Rate tables
// ============================================================================

/// On-disk encoding of a rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateFileFormat {
    Json,
    Toml,
}

impl RateFileFormat {
    /// `.toml` files are TOML, anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => RateFileFormat::Toml,
            _ => RateFileFormat::Json,
        }
    }
}

/// Save a rate table atomically. The table is validated first, so a bad
/// table never replaces a good file.
pub fn save_rate_table(table: &RateTable, path: &Path) -> QuoteResult<()> {
    table.validate()?;

    let contents = match RateFileFormat::from_path(path) {
        RateFileFormat::Json => serde_json::to_string_pretty(table).map_err(|e| QuoteError::serialization(e.to_string()))?,
        RateFileFormat::Toml => toml::to_string_pretty(table).map_err(|e| QuoteError::serialization(e.to_string()))?,
    };

    write_atomic(path, &contents)?;
    info!(path = %path.display(), source = %table.source, "Saved rate table");
    Ok(())
}

/// Load a rate table from a file.
///
/// # Returns
///
/// * `Ok(RateTable)` - Parsed, version-checked and validated table
/// * `Err(QuoteError::VersionMismatch)` - File version is incompatible
/// * `Err(QuoteError::SerializationError)` - Invalid JSON or TOML
/// * `Err(QuoteError::InvalidRateTable)` - A rate is non-positive or non-finite
/// * `Err(QuoteError::FileError)` - I/O error
pub fn load_rate_table(path: &Path) -> QuoteResult<RateTable> {
    let contents = read_to_string(path, "open")?;

    let table: RateTable = match RateFileFormat::from_path(path) {
        RateFileFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| QuoteError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?,
        RateFileFormat::Toml => toml::from_str(&contents)
            .map_err(|e| QuoteError::serialization(format!("Invalid TOML in {}: {}", path.display(), e)))?,
    };

    validate_version(&table.version, RATE_SCHEMA_VERSION)?;
    table.validate()?;

    debug!(path = %path.display(), entries = table.base_price_count(), "Loaded rate table");
    Ok(table)
}

/// Load a rate table, also reporting who holds its lock, if anyone.
pub fn load_rate_table_with_lock_check(path: &Path) -> QuoteResult<(RateTable, Option<LockInfo>)> {
    let table = load_rate_table(path)?;
    let lock_info = FileLock::check(path);
    Ok((table, lock_info))
}

// ============================================================================
// Quote records
// ============================================================================

/// Lifecycle of an issued quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

/// A quote as persisted: the quote itself plus its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub version: String,
    pub quote: Quote,
    #[serde(default)]
    pub status: QuoteStatus,
    pub saved_at: DateTime<Utc>,
}

impl QuoteRecord {
    /// Wrap a freshly issued quote with status `Pending`.
    pub fn new(quote: Quote) -> Self {
        QuoteRecord {
            version: QUOTE_RECORD_VERSION.to_string(),
            quote,
            status: QuoteStatus::default(),
            saved_at: Utc::now(),
        }
    }
}

/// Save a quote record as JSON with atomic write semantics.
pub fn save_quote(record: &QuoteRecord, path: &Path) -> QuoteResult<()> {
    let json = serde_json::to_string_pretty(record).map_err(|e| QuoteError::serialization(e.to_string()))?;
    write_atomic(path, &json)?;
    info!(path = %path.display(), quote_id = %record.quote.id, "Saved quote");
    Ok(())
}

/// Load a quote record.
pub fn load_quote(path: &Path) -> QuoteResult<QuoteRecord> {
    let contents = read_to_string(path, "open")?;
    let record: QuoteRecord = serde_json::from_str(&contents)
        .map_err(|e| QuoteError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;
    validate_version(&record.version, QUOTE_RECORD_VERSION)?;
    Ok(record)
}

/// Check a file version against the version this build writes.
///
/// Major versions must match. Under 0.x a newer minor version is rejected.
fn validate_version(file_version: &str, expected: &str) -> QuoteResult<()> {
    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = expected.split('.').filter_map(|p| p.parse().ok()).collect();

    let mismatch = || QuoteError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: expected.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
