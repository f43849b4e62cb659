/// Sidecar tag files
///
/// A sidecar sits next to its image with the same basename and a `.txt`
/// extension (`cat.jpg` → `cat.txt`). Its content is a list of tags
/// joined by the literal separator `", "`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SorterError};

/// Separator between tags inside a sidecar file
pub const TAG_SEPARATOR: &str = ", ";

/// Path of the sidecar belonging to `image` (final extension replaced)
pub fn sidecar_path(image: &Path) -> PathBuf {
    image.with_extension("txt")
}

/// Split sidecar content into tags. Empty content means no tags.
pub fn parse_tags(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    content.split(TAG_SEPARATOR).map(str::to_string).collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_SEPARATOR)
}

/// Read the tags of `image`'s sidecar, or none if it has no sidecar
pub fn read_tags(image: &Path) -> Result<Vec<String>> {
    let path = sidecar_path(image);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| SorterError::io(&path, e))?;
    Ok(parse_tags(&content))
}

/// Write the source sidecar's tags plus `tag` into `dest_dir`.
///
/// Tags are never deduplicated: exporting twice appends the tag twice.
/// Returns the written path.
pub fn write_tagged(image: &Path, dest_dir: &Path, tag: &str) -> Result<PathBuf> {
    let mut tags = read_tags(image)?;
    tags.push(tag.to_string());

    let source = sidecar_path(image);
    let Some(file_name) = source.file_name() else {
        return Err(SorterError::io(&source, no_file_name()));
    };
    let dest = dest_dir.join(file_name);

    fs::write(&dest, join_tags(&tags)).map_err(|e| SorterError::io(&dest, e))?;
    Ok(dest)
}

pub(crate) fn no_file_name() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
}
