//! Candidate image discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{IoError, IoResult};

/// Extensions [`list_images`] picks up, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// `true` if `path` has one of [`IMAGE_EXTENSIONS`].
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Lists image files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched.
pub fn list_images<P: AsRef<Path>>(dir: P) -> IoResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(IoError::NotFound(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(dir = %dir.display(), count = images.len(), "Listed images");
    Ok(images)
}

/// Picks the `index`-th (1-based) image of `dir`.
pub fn select_image<P: AsRef<Path>>(dir: P, index: usize) -> IoResult<PathBuf> {
    let dir = dir.as_ref();
    let images = list_images(dir)?;
    index
        .checked_sub(1)
        .and_then(|i| images.get(i))
        .cloned()
        .ok_or_else(|| {
            IoError::NotFound(dir.join(format!("#{} (of {} images)", index, images.len())))
        })
}
