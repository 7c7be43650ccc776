//! Output file allocation.
//!
//! Maps are written as `map_0.png`, `map_1.png`, ... in the output directory.
//! Each name is claimed with create-new semantics, so concurrent or repeated
//! runs never overwrite one another.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use heatmap_common::{HeatmapError, HeatmapResult};
use tracing::{debug, info};

/// File name prefix of every rendered map.
pub const FILE_PREFIX: &str = "map_";

/// Directory that receives rendered maps.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create the directory (and parents) if needed.
    pub fn create(path: impl Into<PathBuf>) -> HeatmapResult<Self> {
        let root = path.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            HeatmapError::OutputError(format!("cannot create {}: {}", root.display(), e))
        })?;
        debug!(path = %root.display(), "Output directory ready");
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the `index`-th map.
    pub fn file_path(&self, index: u64) -> PathBuf {
        self.root.join(format!("{}{}.png", FILE_PREFIX, index))
    }

    /// First `map_N.png` that does not exist yet.
    ///
    /// Only a snapshot; [`persist`](Self::persist) claims names atomically.
    pub fn next_free_path(&self) -> PathBuf {
        (0..)
            .map(|i| self.file_path(i))
            .find(|p| !p.exists())
            .unwrap_or_else(|| self.file_path(u64::MAX))
    }

    /// Write `bytes` to the first free `map_N.png` and return its path.
    pub fn persist(&self, bytes: &[u8]) -> HeatmapResult<PathBuf> {
        let mut index = 0u64;
        loop {
            let path = self.file_path(index);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let written = file.write_all(bytes).and_then(|_| file.sync_all());
                    if let Err(e) = written {
                        drop(file);
                        let _ = std::fs::remove_file(&path);
                        return Err(HeatmapError::OutputError(format!(
                            "failed to write {}: {}",
                            path.display(),
                            e
                        )));
                    }
                    info!(path = %path.display(), bytes = bytes.len(), "Saved map");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    index = index.checked_add(1).ok_or_else(|| {
                        HeatmapError::OutputError(format!("no free file name in {}", self.root.display()))
                    })?;
                }
                Err(e) => {
                    return Err(HeatmapError::OutputError(format!(
                        "cannot create {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
    }
}
