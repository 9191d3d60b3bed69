//! Executor for split plans.

use super::planner::FolderPlanner;
use super::types::*;
use crate::core::descriptor::FileDescriptor;
use crate::error::FolderError;
use crate::events::{null_sender, Event, EventSender, SplitEvent};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Plans and performs the moves into bucket folders
#[derive(Debug, Clone, Default)]
pub struct FolderSplitter {
    planner: FolderPlanner,
}

impl FolderSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self {
            planner: FolderPlanner::new(config),
        }
    }

    pub fn plan(&self, files: &[FileDescriptor]) -> SplitPlan {
        self.planner.plan(files)
    }

    /// Plan and execute in one go
    pub fn split(&self, files: &mut [FileDescriptor]) -> SplitReport {
        let plan = self.plan(files);
        self.execute(&plan, files, &null_sender())
    }

    /// Move every planned file into its folder.
    ///
    /// Folders are created right before their first file moves in. A folder that
    /// cannot be created is tried once; its remaining files are skipped with an
    /// error while other folders carry on. Move failures leave the file (and its
    /// descriptor) where it was.
    pub fn execute(
        &self,
        plan: &SplitPlan,
        files: &mut [FileDescriptor],
        events: &EventSender,
    ) -> SplitReport {
        let mut report = SplitReport {
            dated_folders: plan.dated_folders.clone(),
            ..SplitReport::default()
        };
        // folder -> usable
        let mut prepared: HashMap<PathBuf, bool> = HashMap::new();

        events.send(Event::Split(SplitEvent::Started {
            total_files: plan.placements.len(),
            dated_folders: plan.dated_folders.len(),
        }));

        for placement in &plan.placements {
            let Some(file) = files.get_mut(placement.index) else {
                report
                    .errors
                    .push(format!("No file at position {} of the working set", placement.index));
                continue;
            };
            let from = file.path().to_path_buf();
            let Some(parent) = file.parent_folder() else {
                Self::record_error(&mut report, events, from, "file has no parent folder".into());
                continue;
            };
            let folder = parent.join(&placement.folder);

            let usable = match prepared.get(&folder) {
                Some(usable) => *usable,
                None => {
                    let usable = self.prepare_folder(&folder, &mut report, events);
                    prepared.insert(folder.clone(), usable);
                    usable
                }
            };

            if !usable {
                let error = FolderError::BucketUnavailable {
                    file: from.clone(),
                    folder,
                };
                Self::record_error(&mut report, events, from, error.to_string());
                continue;
            }

            match file.move_under(&placement.folder) {
                Ok(to) => {
                    debug!("Moved {} -> {}", from.display(), to.display());
                    events.send(Event::Split(SplitEvent::FileMoved {
                        from,
                        to: to.to_path_buf(),
                    }));
                    report.files_moved += 1;
                    match placement.bucket {
                        BucketKind::Logo => report.logo_count += 1,
                        BucketKind::Video => report.video_count += 1,
                        BucketKind::Dated | BucketKind::NoDate => {}
                    }
                }
                Err(e) => Self::record_error(&mut report, events, from, e.to_string()),
            }
        }

        events.send(Event::Split(SplitEvent::Completed {
            files_moved: report.files_moved,
            folders_created: report.folders_created,
        }));

        report
    }

    fn prepare_folder(
        &self,
        folder: &Path,
        report: &mut SplitReport,
        events: &EventSender,
    ) -> bool {
        if folder.is_dir() {
            return true;
        }

        // create_dir_all tolerates a concurrent creator
        match fs::create_dir_all(folder) {
            Ok(()) => {
                report.folders_created += 1;
                events.send(Event::Split(SplitEvent::FolderCreated {
                    path: folder.to_path_buf(),
                }));
                true
            }
            Err(source) => {
                let error = FolderError::CreateFailed {
                    path: folder.to_path_buf(),
                    source,
                };
                Self::record_error(report, events, folder.to_path_buf(), error.to_string());
                false
            }
        }
    }

    fn record_error(report: &mut SplitReport, events: &EventSender, path: PathBuf, message: String) {
        warn!("{}", message);
        events.send(Event::Split(SplitEvent::Error {
            path,
            message: message.clone(),
        }));
        report.errors.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn at(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, day).and_then(|d| d.and_hms_opt(10, 0, 0))
    }

    fn create(dir: &TempDir, name: &str, created: Option<NaiveDateTime>) -> FileDescriptor {
        let path = dir.path().join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        FileDescriptor::new(path, created)
    }

    #[test]
    fn moves_files_into_dated_and_fixed_folders() {
        let dir = TempDir::new().unwrap();
        let mut files = vec![
            create(&dir, "a.jpg", at(1)),
            create(&dir, "clip.mp4", at(1)),
            create(&dir, "notes.txt", None),
        ];

        let report = FolderSplitter::default().split(&mut files);

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.files_moved, 3);
        assert_eq!(report.video_count, 1);
        assert_eq!(report.folders_created, 3);
        assert_eq!(files[0].path(), dir.path().join("2024-03-01").join("a.jpg"));
        assert_eq!(files[1].path(), dir.path().join("video").join("clip.mp4"));
        assert_eq!(files[2].path(), dir.path().join("no-date").join("notes.txt"));
    }

    #[test]
    fn existing_folders_are_reused() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("video")).unwrap();
        let mut files = vec![create(&dir, "a.mp4", None), create(&dir, "b.avi", None)];

        let report = FolderSplitter::default().split(&mut files);

        assert!(report.errors.is_empty());
        assert_eq!(report.folders_created, 0);
        assert_eq!(report.video_count, 2);
    }

    #[test]
    fn folders_are_not_created_when_unused() {
        let dir = TempDir::new().unwrap();
        let mut files = vec![create(&dir, "a.jpg", at(2))];

        FolderSplitter::default().split(&mut files);

        assert!(!dir.path().join("logo").exists());
        assert!(!dir.path().join("video").exists());
        assert!(!dir.path().join("no-date").exists());
    }

    #[test]
    fn failed_folder_only_skips_its_bucket() {
        let dir = TempDir::new().unwrap();
        // A plain file squatting on the folder name
        fs::write(dir.path().join("video"), b"not a folder").unwrap();
        let mut files = vec![
            create(&dir, "a.mp4", at(1)),
            create(&dir, "b.mp4", at(1)),
            create(&dir, "c.jpg", at(1)),
        ];

        let report = FolderSplitter::default().split(&mut files);

        // one creation failure + two skipped files
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.files_moved, 1);
        assert_eq!(files[0].path(), dir.path().join("a.mp4"));
        assert_eq!(files[1].path(), dir.path().join("b.mp4"));
        assert_eq!(files[2].path(), dir.path().join("2024-03-01").join("c.jpg"));
    }

    #[test]
    fn name_clash_leaves_file_in_place() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("no-date")).unwrap();
        fs::write(dir.path().join("no-date").join("x.txt"), b"older").unwrap();
        let mut files = vec![create(&dir, "x.txt", None)];

        let report = FolderSplitter::default().split(&mut files);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.files_moved, 0);
        assert_eq!(files[0].path(), dir.path().join("x.txt"));
        assert!(dir.path().join("x.txt").exists());
    }

    #[test]
    fn report_lists_dated_folders() {
        let dir = TempDir::new().unwrap();
        let mut files = vec![create(&dir, "a.jpg", at(1)), create(&dir, "b.jpg", at(7))];
        let splitter = FolderSplitter::new(SplitConfig {
            min_files_per_folder: 1,
            ..SplitConfig::default()
        });

        let report = splitter.split(&mut files);

        assert_eq!(report.dated_folders, vec!["2024-03-01", "2024-03-07"]);
        assert!(dir.path().join("2024-03-07").join("b.jpg").exists());
    }
}
