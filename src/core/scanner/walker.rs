//! Folder listing using walkdir.

use super::dates::creation_time;
use super::ScanResult;
use crate::core::descriptor::DownloadedFile;
use crate::error::ScanError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the folder scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files
    pub include_hidden: bool,
}

/// Lists regular files directly inside a folder (subfolders are not entered,
/// so a previous run's `logo/`, `video/` and dated folders are left alone)
pub struct LocalScanner {
    config: ScanConfig,
}

impl LocalScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    let error = if e.io_error().map(|io| io.kind()) == Some(ErrorKind::PermissionDenied) {
                        ScanError::PermissionDenied { path }
                    } else {
                        ScanError::ReadDirectory {
                            path,
                            source: std::io::Error::other(e.to_string()),
                        }
                    };
                    warn!("{}", error);
                    errors.push(error);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let hidden = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'));
            if hidden && !self.config.include_hidden {
                continue;
            }

            let path = entry.path();
            let created = creation_time(path);
            debug!("Found {} (created {:?})", path.display(), created);
            files.push(DownloadedFile::new(path, created));
        }

        Ok(ScanResult { files, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn empty_folder_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let result = LocalScanner::new(ScanConfig::default()).scan(dir.path()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn lists_all_file_types_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        for name in ["c.mp4", "a.jpg", "b.txt"] {
            fs::write(dir.path().join(name), name).unwrap();
        }

        let result = LocalScanner::new(ScanConfig::default()).scan(dir.path()).unwrap();
        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.txt", "c.mp4"]);
    }

    #[test]
    fn subfolders_are_not_entered() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("logo")).unwrap();
        fs::write(dir.path().join("logo").join("old.png"), b"x").unwrap();
        fs::write(dir.path().join("new.png"), b"y").unwrap();

        let result = LocalScanner::new(ScanConfig::default()).scan(dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("new.png"));
    }

    #[test]
    fn hidden_files_are_opt_in() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".thumbs.db"), b"x").unwrap();
        fs::write(dir.path().join("a.jpg"), b"y").unwrap();

        let default = LocalScanner::new(ScanConfig::default()).scan(dir.path()).unwrap();
        assert_eq!(default.files.len(), 1);

        let config = ScanConfig {
            include_hidden: true,
            ..Default::default()
        };
        let all = LocalScanner::new(config).scan(dir.path()).unwrap();
        assert_eq!(all.files.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_followed_only_when_asked() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("IMG_0001.JPG");
        fs::write(&target, b"jpeg").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.jpg")).unwrap();

        let default = LocalScanner::new(ScanConfig::default()).scan(dir.path()).unwrap();
        assert!(default.files.is_empty());

        let config = ScanConfig {
            follow_symlinks: true,
            ..Default::default()
        };
        let followed = LocalScanner::new(config).scan(dir.path()).unwrap();
        assert_eq!(followed.files.len(), 1);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let result = LocalScanner::new(ScanConfig::default()).scan(&PathBuf::from("/nonexistent/12345"));
        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
