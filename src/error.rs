/// Error types for the image sorter
///
/// Every failure is recoverable at the operation boundary: the UI shows
/// the message in the status line and the session keeps running.

use std::path::PathBuf;
use thiserror::Error;

use crate::state::registry::CategoryId;

/// Result type alias for sorter operations
pub type Result<T> = std::result::Result<T, SorterError>;

#[derive(Error, Debug)]
pub enum SorterError {
    /// The category's name input was empty (or whitespace only)
    #[error("Please enter a category name.")]
    EmptyCategoryName,

    /// The name would leave the export folder (`..`, path separators)
    #[error("Category name '{0}' cannot contain path separators or be '.' or '..'.")]
    UnsafeCategoryName(String),

    /// No current image: nothing loaded, or every image already assigned
    #[error("There is no image left to assign.")]
    NothingToAssign,

    #[error("Unknown category handle: {0}")]
    UnknownCategory(CategoryId),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SorterError {
    /// Wrap an `io::Error` together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SorterError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors the user fixes by changing their input
    /// (as opposed to file system failures)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SorterError::EmptyCategoryName
                | SorterError::UnsafeCategoryName(_)
                | SorterError::NothingToAssign
                | SorterError::UnknownCategory(_)
        )
    }
}
