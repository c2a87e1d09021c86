//! Snapshot persistence.
//!
//! Filenames follow `filter<YYYYMMDDTHHMMSS>.jpg` in local time (ISO-8601
//! basic format), so snapshots taken in different seconds never collide.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use crate::error::{Error, Result};
use crate::state::GridFrame;

/// Build the snapshot filename for a given local time.
pub fn snapshot_filename<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("filter{}.jpg", time.format("%Y%m%dT%H%M%S"))
}

/// Encodes grid frames to image files in a target directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer targeting `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encode `frame` to `filename` inside the output directory.
    ///
    /// The format is chosen from the filename extension.
    pub fn save(&self, frame: &GridFrame, filename: &str) -> Result<PathBuf> {
        let path = self.dir.join(filename);
        let image = frame.to_gray_image().ok_or_else(|| {
            let (w, h) = frame.dimensions();
            Error::Other(format!("Frame {}x{} cannot be encoded", w, h))
        })?;
        image.save(&path)?;
        Ok(path)
    }

    /// Encode `frame` under a filename derived from the current local time.
    pub fn save_now(&self, frame: &GridFrame) -> Result<PathBuf> {
        self.save(frame, &snapshot_filename(&Local::now()))
    }
}
