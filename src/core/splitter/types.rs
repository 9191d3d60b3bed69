//! Types for the splitter module.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Configuration for folder splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// A dated folder is only closed at a day change once it holds this many files
    pub min_files_per_folder: usize,
    /// Close a dated folder at this size even within one day (None = no cap)
    pub max_files_per_folder: Option<usize>,
    pub logo_folder: String,
    pub video_folder: String,
    /// Folder for files without a creation time
    pub no_date_folder: String,
    /// `chrono` format used to name dated folders
    pub day_format: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_files_per_folder: 10,
            max_files_per_folder: None,
            logo_folder: "logo".to_string(),
            video_folder: "video".to_string(),
            no_date_folder: "no-date".to_string(),
            day_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl SplitConfig {
    /// Check the settings a run cannot recover from
    pub fn validate(&self) -> Result<(), String> {
        if self.max_files_per_folder == Some(0) {
            return Err("maximum files per folder must be at least 1".to_string());
        }
        if StrftimeItems::new(&self.day_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid day format {:?}", self.day_format));
        }
        Ok(())
    }
}

/// Kind of destination folder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    Logo,
    Video,
    Dated,
    NoDate,
}

/// Where one descriptor should go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    /// Position of the descriptor in the slice given to the planner
    pub index: usize,
    /// Subfolder name under the file's current folder
    pub folder: String,
    pub bucket: BucketKind,
}

/// The full assignment, in execution order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitPlan {
    pub placements: Vec<Placement>,
    /// Dated folder names in chronological order
    pub dated_folders: Vec<String>,
}

impl SplitPlan {
    /// Number of placements into the given bucket kind
    pub fn count(&self, bucket: BucketKind) -> usize {
        self.placements.iter().filter(|p| p.bucket == bucket).count()
    }
}

/// Result of executing a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitReport {
    pub files_moved: usize,
    pub folders_created: usize,
    pub logo_count: usize,
    pub video_count: usize,
    pub dated_folders: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SplitConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_maximum_is_rejected() {
        let config = SplitConfig {
            max_files_per_folder: Some(0),
            ..SplitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_format_specifier_is_rejected() {
        let config = SplitConfig {
            day_format: "%Q".to_string(),
            ..SplitConfig::default()
        };
        let message = config.validate().unwrap_err();
        assert!(message.contains("%Q"));
    }
}
