//! Plan generator for folder splitting.

use super::types::*;
use crate::core::classifier::MediaKind;
use crate::core::descriptor::FileDescriptor;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// The dated folder currently being filled
#[derive(Debug)]
struct OpenFolder {
    name: String,
    last_day: NaiveDate,
    count: usize,
}

/// Computes where each descriptor goes, without touching the filesystem
#[derive(Debug, Clone)]
pub struct FolderPlanner {
    config: SplitConfig,
}

impl FolderPlanner {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Assign every descriptor to a folder.
    ///
    /// Logos and videos go to their fixed folders unconditionally. Undated files
    /// go to the no-date folder. The rest are sorted by creation time (stable,
    /// so ties keep input order) and cut into dated folders: a new folder starts
    /// only on a day change once the open one holds the configured minimum, or
    /// when the open one reaches the optional maximum.
    pub fn plan(&self, files: &[FileDescriptor]) -> SplitPlan {
        let mut placements = Vec::with_capacity(files.len());
        let mut no_date = Vec::new();
        let mut dated: Vec<(usize, NaiveDateTime)> = Vec::new();

        for (index, file) in files.iter().enumerate() {
            if file.is_logo() {
                placements.push(self.fixed(index, BucketKind::Logo));
            } else if file.kind() == MediaKind::Video {
                placements.push(self.fixed(index, BucketKind::Video));
            } else {
                match file.created() {
                    Some(created) => dated.push((index, created)),
                    None => no_date.push(self.fixed(index, BucketKind::NoDate)),
                }
            }
        }
        placements.extend(no_date);

        dated.sort_by_key(|&(_, created)| created);

        let mut dated_folders: Vec<String> = Vec::new();
        let mut current: Option<OpenFolder> = None;

        for (index, created) in dated {
            let day = created.date();
            let start_new = current
                .as_ref()
                .map_or(true, |open| self.should_close(open, day));

            if start_new {
                let name = self.folder_name(day, &dated_folders);
                dated_folders.push(name.clone());
                current = Some(OpenFolder {
                    name,
                    last_day: day,
                    count: 0,
                });
            }

            if let Some(open) = current.as_mut() {
                open.count += 1;
                open.last_day = day;
                placements.push(Placement {
                    index,
                    folder: open.name.clone(),
                    bucket: BucketKind::Dated,
                });
            }
        }

        SplitPlan {
            placements,
            dated_folders,
        }
    }

    fn should_close(&self, open: &OpenFolder, day: NaiveDate) -> bool {
        let day_changed = day != open.last_day && open.count >= self.config.min_files_per_folder;
        let full = self
            .config
            .max_files_per_folder
            .is_some_and(|max| max > 0 && open.count >= max);
        day_changed || full
    }

    fn fixed(&self, index: usize, bucket: BucketKind) -> Placement {
        let folder = match bucket {
            BucketKind::Logo => &self.config.logo_folder,
            BucketKind::Video => &self.config.video_folder,
            BucketKind::NoDate | BucketKind::Dated => &self.config.no_date_folder,
        };
        Placement {
            index,
            folder: folder.clone(),
            bucket,
        }
    }

    /// Day in the configured format; ISO date if that format is malformed
    fn day_name(&self, day: NaiveDate) -> String {
        let mut name = String::new();
        match write!(name, "{}", day.format(&self.config.day_format)) {
            Ok(()) => name,
            Err(_) => day.to_string(),
        }
    }

    /// Day name, suffixed `_2`, `_3`, ... when a day spans several folders
    fn folder_name(&self, day: NaiveDate, used: &[String]) -> String {
        let base = self.day_name(day);
        if !used.contains(&base) {
            return base;
        }

        let mut counter = 2;
        loop {
            let candidate = format!("{}_{}", base, counter);
            if !used.contains(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Default for FolderPlanner {
    fn default() -> Self {
        Self::new(SplitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::ContentHash;

    fn at(day: u32, hour: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
    }

    fn photo(name: &str, created: Option<NaiveDateTime>) -> FileDescriptor {
        FileDescriptor::new(format!("/dl/{}", name), created)
    }

    fn planner(min: usize, max: Option<usize>) -> FolderPlanner {
        FolderPlanner::new(SplitConfig {
            min_files_per_folder: min,
            max_files_per_folder: max,
            ..SplitConfig::default()
        })
    }

    #[test]
    fn short_days_are_merged() {
        let mut files = Vec::new();
        for day in 1..=5 {
            for hour in 0..3 {
                files.push(photo(&format!("{}_{}.jpg", day, hour), at(day, hour)));
            }
        }

        let plan = planner(10, None).plan(&files);

        assert!(plan.dated_folders.len() < 5);
        assert_eq!(plan.dated_folders, vec!["2024-03-01", "2024-03-05"]);
        assert_eq!(plan.count(BucketKind::Dated), 15);
    }

    #[test]
    fn busy_single_day_stays_in_one_folder() {
        let files: Vec<_> = (0..1000)
            .map(|i| photo(&format!("IMG_{}.jpg", i), at(9, 12)))
            .collect();

        let plan = planner(10, None).plan(&files);

        assert_eq!(plan.dated_folders, vec!["2024-03-09"]);
        assert_eq!(plan.placements.len(), 1000);
    }

    #[test]
    fn day_is_never_split_by_minimum_alone() {
        // 4 files on day 1, then 8 on day 2: reaching the minimum mid-day 2
        // must not open a new folder until the day changes
        let mut files = Vec::new();
        for hour in 0..4 {
            files.push(photo(&format!("a{}.jpg", hour), at(1, hour)));
        }
        for hour in 0..8 {
            files.push(photo(&format!("b{}.jpg", hour), at(2, hour)));
        }
        files.push(photo("c.jpg", at(3, 0)));

        let plan = planner(5, None).plan(&files);

        assert_eq!(plan.dated_folders, vec!["2024-03-01", "2024-03-03"]);
    }

    #[test]
    fn zero_minimum_gives_one_folder_per_day() {
        let files = vec![
            photo("a.jpg", at(1, 0)),
            photo("b.jpg", at(2, 0)),
            photo("c.jpg", at(2, 5)),
            photo("d.jpg", at(4, 0)),
        ];

        let plan = planner(0, None).plan(&files);

        assert_eq!(plan.dated_folders, vec!["2024-03-01", "2024-03-02", "2024-03-04"]);
    }

    #[test]
    fn maximum_forces_split_within_a_day() {
        let files: Vec<_> = (0..25)
            .map(|i| photo(&format!("IMG_{}.jpg", i), at(9, 12)))
            .collect();

        let plan = planner(10, Some(10)).plan(&files);

        assert_eq!(
            plan.dated_folders,
            vec!["2024-03-09", "2024-03-09_2", "2024-03-09_3"]
        );
        let last = plan.placements.iter().filter(|p| p.folder == "2024-03-09_3").count();
        assert_eq!(last, 5);
    }

    #[test]
    fn input_order_does_not_matter() {
        let files = vec![
            photo("late.jpg", at(5, 0)),
            photo("early.jpg", at(1, 0)),
            photo("mid.jpg", at(3, 0)),
        ];

        let plan = planner(0, None).plan(&files);

        assert_eq!(plan.dated_folders, vec!["2024-03-01", "2024-03-03", "2024-03-05"]);
        let order: Vec<usize> = plan.placements.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn undated_files_go_to_fallback() {
        let mut files: Vec<_> = (0..50)
            .map(|i| photo(&format!("IMG_{}.jpg", i), at(9, 12)))
            .collect();
        files.push(photo("mystery.jpg", None));

        let plan = planner(10, None).plan(&files);

        let fallback: Vec<_> = plan
            .placements
            .iter()
            .filter(|p| p.bucket == BucketKind::NoDate)
            .collect();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].index, 50);
        assert_eq!(fallback[0].folder, "no-date");
        assert!(!plan.dated_folders.contains(&"no-date".to_string()));
    }

    #[test]
    fn videos_go_to_fixed_folder_without_cap() {
        let files: Vec<_> = (0..30)
            .map(|i| photo(&format!("MOV_{}.mp4", i), at(1, 0)))
            .collect();

        let plan = planner(10, Some(5)).plan(&files);

        assert_eq!(plan.count(BucketKind::Video), 30);
        assert!(plan.dated_folders.is_empty());
        assert!(plan.placements.iter().all(|p| p.folder == "video"));
    }

    #[test]
    fn unclassified_images_are_dated() {
        // No colour depth yet, so not a logo
        let mut file = photo("a.png", at(2, 0));
        file.set_hash(ContentHash::from_hex("h1"));

        let plan = planner(10, None).plan(&[file]);

        assert_eq!(plan.count(BucketKind::Logo), 0);
        assert_eq!(plan.count(BucketKind::Dated), 1);
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        let plan = planner(10, None).plan(&[]);
        assert!(plan.placements.is_empty());
        assert!(plan.dated_folders.is_empty());
    }

    #[test]
    fn custom_day_format_names_folders() {
        let planner = FolderPlanner::new(SplitConfig {
            day_format: "%Y%m%d".to_string(),
            ..SplitConfig::default()
        });

        let plan = planner.plan(&[photo("a.jpg", at(9, 0))]);

        assert_eq!(plan.dated_folders, vec!["20240309"]);
    }

    #[test]
    fn malformed_day_format_falls_back_to_iso_date() {
        let planner = FolderPlanner::new(SplitConfig {
            day_format: "%Q".to_string(),
            ..SplitConfig::default()
        });

        let plan = planner.plan(&[photo("a.jpg", at(9, 0))]);

        assert_eq!(plan.dated_folders, vec!["2024-03-09"]);
    }
}
