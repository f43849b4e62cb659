use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Result, SorterError};

/// Image extensions accepted by the queue (compared lowercase)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Check whether a path has one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Ordered list of images waiting to be sorted.
///
/// The list is filled once per folder and never reordered afterwards.
/// `cursor` points at the image currently shown; `processed` counts
/// successful assignments and only ever grows until the next load.
#[derive(Debug, Default, Clone)]
pub struct ImageQueue {
    images: Vec<PathBuf>,
    cursor: usize,
    processed: usize,
}

impl ImageQueue {
    /// Build a queue from the images directly inside `folder`.
    ///
    /// Order follows the directory listing (not sorted). Sub-directories
    /// are not descended into.
    pub fn load(folder: &Path) -> Result<Self> {
        let metadata = fs::metadata(folder).map_err(|e| SorterError::io(folder, e))?;
        if !metadata.is_dir() {
            return Err(SorterError::NotADirectory(folder.to_path_buf()));
        }

        let mut images = Vec::new();
        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // A broken child (dangling link, unreadable file) is skipped;
                // only a failure to read the folder itself aborts the load
                Err(e) if e.depth() >= 1 => {
                    warn!("⚠️  Skipping unreadable entry: {}", e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let path = entry.path();

            if !entry.file_type().is_file() || !is_supported_image(path) {
                debug!("Skipping {}", path.display());
                continue;
            }

            images.push(path.to_path_buf());
        }

        info!("📂 Found {} images in {}", images.len(), folder.display());

        Ok(Self {
            images,
            cursor: 0,
            processed: 0,
        })
    }

    /// Image at the cursor, or `None` when empty or fully processed
    pub fn current(&self) -> Option<&Path> {
        if self.is_exhausted() {
            return None;
        }
        self.images.get(self.cursor).map(PathBuf::as_path)
    }

    /// Move the cursor to the next image.
    ///
    /// Returns `false` (and leaves the cursor alone) once every image
    /// has been processed.
    pub fn advance(&mut self) -> bool {
        if self.processed < self.images.len() {
            self.cursor = (self.cursor + 1) % self.images.len();
            true
        } else {
            false
        }
    }

    /// Count one more image as sorted
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Images not yet assigned to any category
    pub fn remaining(&self) -> usize {
        self.images.len().saturating_sub(self.processed)
    }

    /// True once every image has been processed (false for an empty queue)
    pub fn is_exhausted(&self) -> bool {
        self.processed >= self.images.len()
    }

    #[cfg(test)]
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }
}
