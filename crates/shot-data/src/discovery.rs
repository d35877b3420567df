//! Photo file discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// File extensions (compared case-insensitively) treated as photos.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// Whether `path` has one of the [`PHOTO_EXTENSIONS`].
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PHOTO_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
        .unwrap_or(false)
}

/// Find all photo files recursively under `root`, sorted by path.
///
/// Entries that cannot be read are logged and skipped.
pub fn find_photo_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        warn!("Photo folder does not exist: {}", root.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_photo(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!("Found {} photos under {}", files.len(), root.display());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_is_photo_case_insensitive() {
        assert!(is_photo(Path::new("a.jpg")));
        assert!(is_photo(Path::new("a.JPG")));
        assert!(is_photo(Path::new("a.Jpeg")));
        assert!(is_photo(Path::new("scan.TIFF")));
        assert!(is_photo(Path::new("x.png")));
        assert!(is_photo(Path::new("x.bmp")));
    }

    #[test]
    fn test_is_photo_rejects_other_files() {
        assert!(!is_photo(Path::new("clip.mp4")));
        assert!(!is_photo(Path::new("raw.cr2")));
        assert!(!is_photo(Path::new("scan.tif")));
        assert!(!is_photo(Path::new("jpg")));
        assert!(!is_photo(Path::new("notes.jpg.txt")));
    }

    #[test]
    fn test_find_photo_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let b = touch(dir.path(), "b.jpg");
        let a = touch(dir.path(), "a.PNG");
        let nested = touch(dir.path(), "2024/01/c.jpeg");
        touch(dir.path(), "2024/readme.txt");
        touch(dir.path(), "video.mov");

        let files = find_photo_files(dir.path());
        assert_eq!(files, vec![nested, a, b]);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_photo_files_does_not_follow_symlinked_dirs() {
        let dir = TempDir::new().unwrap();
        let real = touch(dir.path(), "photos/a.jpg");
        std::os::unix::fs::symlink(dir.path().join("photos"), dir.path().join("alias")).unwrap();

        assert_eq!(find_photo_files(dir.path()), vec![real]);
    }

    #[test]
    fn test_find_photo_files_missing_root() {
        let dir = TempDir::new().unwrap();
        assert!(find_photo_files(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_find_photo_files_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_photo_files(dir.path()).is_empty());
    }
}
