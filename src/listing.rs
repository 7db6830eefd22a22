//! Sorted enumeration of the `root/<class>/*.jpg` layout.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{DatasetError, DatasetResult};

/// Only file names ending in `.` plus this extension are treated as samples.
pub const IMAGE_EXTENSION: &str = "jpg";

fn sorted_children(dir: &Path) -> WalkDir {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
}

/// Immediate subdirectories of `root` as `(name, path)`, sorted by name.
pub fn list_subdirectories(root: &Path) -> DatasetResult<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Err(DatasetError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut dirs = Vec::new();
    for entry in sorted_children(root) {
        let entry = match entry {
            Ok(entry) => entry,
            // Dangling links and other entries that do not resolve to a directory.
            Err(e) if e.depth() == 1 && e.path().is_some_and(|p| !p.is_dir()) => continue,
            Err(e) => return Err(DatasetError::from_walk(root, e)),
        };
        if entry.file_type().is_dir() {
            let name = entry.file_name().to_string_lossy().into_owned();
            dirs.push((name, entry.into_path()));
        }
    }
    Ok(dirs)
}

/// Regular files in `dir` whose name ends in `.{extension}` (case-sensitive), sorted by file name.
///
/// Matches like a `*.jpg` glob, so a file named exactly `.jpg` is included.
pub fn list_files(dir: &Path, extension: &str) -> DatasetResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DatasetError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let suffix = format!(".{extension}");
    let mut files = Vec::new();
    for entry in sorted_children(dir) {
        let entry = entry.map_err(|e| DatasetError::from_walk(dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Every `(image_path, class_name)` pair under `root`, classes and files in sorted order.
///
/// No label filtering happens here; unknown class directories are listed too.
pub fn list_image_paths<P: AsRef<Path>>(root: P) -> DatasetResult<Vec<(PathBuf, String)>> {
    let mut samples = Vec::new();
    for (class_name, class_dir) in list_subdirectories(root.as_ref())? {
        for path in list_files(&class_dir, IMAGE_EXTENSION)? {
            samples.push((path, class_name.clone()));
        }
    }
    Ok(samples)
}
