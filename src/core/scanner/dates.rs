//! Creation time lookup for local files.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Best-known creation time: EXIF first, then the filesystem
pub fn creation_time(path: &Path) -> Option<NaiveDateTime> {
    exif_creation_time(path).or_else(|| filesystem_creation_time(path))
}

/// Capture time recorded in the file's EXIF block, if any
pub fn exif_creation_time(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .filter_map(|tag| exif.get_field(tag, exif::In::PRIMARY))
        .find_map(|field| match field.value {
            exif::Value::Ascii(ref parts) => parts.first().and_then(|raw| parse_exif_datetime(raw)),
            _ => None,
        })
}

/// Parse the raw `YYYY:MM:DD HH:MM:SS` form
fn parse_exif_datetime(raw: &[u8]) -> Option<NaiveDateTime> {
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
        .and_hms_opt(u32::from(dt.hour), u32::from(dt.minute), u32::from(dt.second))
}

fn filesystem_creation_time(path: &Path) -> Option<NaiveDateTime> {
    let created = fs::metadata(path).ok()?.created().ok()?;
    let local: DateTime<Local> = created.into();
    Some(local.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::TempDir;

    #[test]
    fn parses_exif_datetime() {
        let parsed = parse_exif_datetime(b"2024:01:15 14:30:05").unwrap();
        assert_eq!(parsed.to_string(), "2024-01-15 14:30:05");
    }

    #[test]
    fn rejects_blank_exif_datetime() {
        assert!(parse_exif_datetime(b"    :  :     :  :  ").is_none());
        assert!(parse_exif_datetime(b"0000:00:00 00:00:00").is_none());
    }

    #[test]
    fn files_without_exif_have_no_exif_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, b"no metadata here").unwrap();

        assert!(exif_creation_time(&path).is_none());
    }

    #[test]
    fn missing_file_has_no_time() {
        assert!(creation_time(Path::new("/nonexistent/IMG_0001.JPG")).is_none());
    }

    #[test]
    fn falls_back_to_filesystem_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, b"x").unwrap();

        // Not every filesystem records a birth time
        if let Some(created) = creation_time(&path) {
            assert!(created.year() >= 2000);
        }
    }
}
