//! Completed-session counter
//!
//! Persistence sits behind a trait so the engine and CLI never touch the
//! storage directly. The file-backed implementation keeps a single
//! decimal count in a text file and tolerates a missing or unreadable
//! file by starting over from zero.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts completed grading sessions.
pub trait UsageCounter {
    /// Record one completed session and return the new total.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the new total cannot be persisted.
    fn record_completion(&self) -> io::Result<u64>;

    /// Total completed sessions recorded so far.
    fn total(&self) -> u64;
}

/// File-backed counter. The count is read once at construction and kept
/// in memory; every completion rewrites the file.
#[derive(Debug)]
pub struct FileUsageCounter {
    path: PathBuf,
    count: AtomicU64,
}

impl FileUsageCounter {
    /// Open a counter at `path`, reading the existing total if the file
    /// is present and well-formed and starting from zero otherwise.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let count = fs::read_to_string(&path)
            .ok()
            .and_then(|contents| contents.trim().parse().ok())
            .unwrap_or(0);
        Self {
            path,
            count: AtomicU64::new(count),
        }
    }
}

impl UsageCounter for FileUsageCounter {
    fn record_completion(&self) -> io::Result<u64> {
        let total = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{total}\n"))?;
        Ok(total)
    }

    fn total(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

/// In-memory counter for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryUsageCounter {
    count: AtomicU64,
}

impl MemoryUsageCounter {
    /// A counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }
}

impl UsageCounter for MemoryUsageCounter {
    fn record_completion(&self) -> io::Result<u64> {
        Ok(self.count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn total(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}
