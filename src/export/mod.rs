/// Batch export of sorted images
///
/// For every bucket, each image is copied into `<destination>/<name>/`
/// and its sidecar tag file is rewritten there with the bucket name
/// appended. A failing image is recorded in the report and the batch
/// moves on to the next one.

pub mod sidecar;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, SorterError};
use crate::state::registry::Bucket;

/// One image that could not be exported
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFailure {
    pub image: PathBuf,
    pub reason: String,
}

/// Outcome of an export run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub destination: PathBuf,
    /// Images copied successfully
    pub copied: usize,
    /// Sidecar files written successfully
    pub tagged: usize,
    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, image: &Path, error: &SorterError) {
        warn!("⚠️  Export failed for {}: {}", image.display(), error);
        self.failures.push(ExportFailure {
            image: image.to_path_buf(),
            reason: error.to_string(),
        });
    }
}

/// Export every bucket into `destination`.
///
/// Never aborts early: failures are collected per image.
pub fn export_buckets(buckets: &[Bucket], destination: &Path) -> ExportReport {
    let mut report = ExportReport {
        destination: destination.to_path_buf(),
        ..Default::default()
    };

    for bucket in buckets {
        let category_dir = destination.join(&bucket.name);

        if let Err(e) = fs::create_dir_all(&category_dir) {
            let error = SorterError::io(&category_dir, e);
            for image in &bucket.images {
                report.fail(image, &error);
            }
            continue;
        }

        for image in &bucket.images {
            if let Err(error) = copy_image(image, &category_dir) {
                report.fail(image, &error);
                continue;
            }
            report.copied += 1;

            match sidecar::write_tagged(image, &category_dir, &bucket.name) {
                Ok(_) => report.tagged += 1,
                Err(error) => report.fail(image, &error),
            }
        }
    }

    info!(
        "✅ Export to {} complete: {} copied, {} tagged, {} failed",
        destination.display(),
        report.copied,
        report.tagged,
        report.failures.len()
    );

    report
}

/// Copy `image` into `dir`, overwriting a file of the same name
fn copy_image(image: &Path, dir: &Path) -> Result<PathBuf> {
    let Some(file_name) = image.file_name() else {
        return Err(SorterError::io(image, sidecar::no_file_name()));
    };
    let dest = dir.join(file_name);
    if is_same_file(image, &dest) {
        // Copying a file onto itself would truncate it
        return Ok(dest);
    }
    fs::copy(image, &dest).map_err(|e| SorterError::io(image, e))?;
    Ok(dest)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
