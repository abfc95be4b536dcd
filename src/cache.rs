//! Local snapshot store.
//!
//! Snapshots are written as gzip-compressed JSON, one file per date range,
//! so a dashboard can show the last computed state before a fresh fetch
//! completes or export it elsewhere.

use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config;
use crate::error::{AnalyticsError, Result};
use crate::models::AnalyticsSnapshot;
use crate::range::DateRange;

/// Stores the latest snapshot per [`DateRange`] under a cache directory.
pub struct SnapshotStore {
    /// Directory where snapshot files are stored.
    pub cache_dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { cache_dir: dir })
    }

    /// Path of the snapshot file for `range`.
    pub fn path_for(&self, range: DateRange) -> PathBuf {
        self.cache_dir.join(config::snapshot_file_name(range.tag()))
    }

    /// Write `snapshot` as the latest for `range`.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated snapshot behind.
    pub fn save(&self, range: DateRange, snapshot: &AnalyticsSnapshot) -> Result<PathBuf> {
        let dest = self.path_for(range);
        let mut tmp_name = dest.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_dest = PathBuf::from(tmp_name);

        let result = (|| -> Result<()> {
            let file = fs::File::create(&tmp_dest)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            serde_json::to_writer(&mut encoder, snapshot)?;
            encoder.finish()?.flush()?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result.map(|_| {
            log::debug!("Saved {} snapshot to {}", range, dest.display());
            dest
        })
    }

    /// Load the latest snapshot for `range`, or `None` if none was saved.
    ///
    /// If the file is corrupt it is deleted, so the next save starts clean.
    pub fn load(&self, range: DateRange) -> Result<Option<AnalyticsSnapshot>> {
        let path = self.path_for(range);
        if !path.exists() {
            return Ok(None);
        }

        match read_gz_json(&path) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                log::warn!("Corrupt snapshot file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Err(AnalyticsError::NotFound(format!(
                    "Snapshot '{}' was corrupt and has been removed. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Delete the stored snapshot for `range`, if any.
    pub fn remove(&self, range: DateRange) -> Result<()> {
        let path = self.path_for(range);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Remove all stored snapshots and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn read_gz_json(path: &Path) -> Result<AnalyticsSnapshot> {
    let file = fs::File::open(path)?;
    let mut contents = String::new();
    BufReader::new(GzDecoder::new(BufReader::new(file))).read_to_string(&mut contents)?;
    Ok(serde_json::from_str(&contents)?)
}
