//! Tabular data sources.
//!
//! A source yields the three record sets (faculty, courses, labs) of
//! one workbook. A load fails when any of them is missing or empty;
//! the pipeline then produces no schedules at all.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

use crate::error::SourceError;
use crate::models::{CourseRow, Dataset, FacultyRow, LabRow};

/// Sheet holding faculty rows.
pub const FACULTY_SHEET: &str = "Sheet1";
/// Sheet holding course rows.
pub const COURSE_SHEET: &str = "Sheet2";
/// Sheet holding lab rows.
pub const LAB_SHEET: &str = "Sheet3";

/// Supplies a dataset for one generation run.
pub trait DataSource {
    /// Loads all three record sets.
    fn load(&self) -> Result<Dataset, SourceError>;
}

impl DataSource for Dataset {
    fn load(&self) -> Result<Dataset, SourceError> {
        ensure_complete(self)?;
        Ok(self.clone())
    }
}

/// Fails with the first empty record set, in sheet order.
pub fn ensure_complete(dataset: &Dataset) -> Result<(), SourceError> {
    let sheets = [
        (FACULTY_SHEET, "Faculty Details", dataset.faculty.is_empty()),
        (COURSE_SHEET, "Courses", dataset.courses.is_empty()),
        (LAB_SHEET, "Labs", dataset.labs.is_empty()),
    ];
    match sheets.into_iter().find(|(_, _, empty)| *empty) {
        Some((sheet, label, _)) => {
            error!(sheet, label, "No data found in sheet");
            Err(SourceError::EmptySheet {
                sheet: sheet.to_string(),
                label: label.to_string(),
            })
        }
        None => Ok(()),
    }
}

#[derive(Deserialize)]
struct Workbook {
    #[serde(rename = "Sheet1", default)]
    faculty: Vec<FacultyRow>,
    #[serde(rename = "Sheet2", default)]
    courses: Vec<CourseRow>,
    #[serde(rename = "Sheet3", default)]
    labs: Vec<LabRow>,
}

/// A workbook exported as JSON: `{"Sheet1": [...], "Sheet2": [...], "Sheet3": [...]}`.
///
/// Each sheet is an array of records keyed by column name.
#[derive(Debug, Clone)]
pub struct JsonWorkbookSource {
    path: PathBuf,
}

impl JsonWorkbookSource {
    /// Creates a source reading from `path` on every load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses workbook JSON into a complete dataset.
    pub fn parse(text: &str) -> Result<Dataset, SourceError> {
        let workbook: Workbook =
            serde_json::from_str(text).map_err(|e| SourceError::Malformed(e.to_string()))?;
        let dataset = Dataset::new(workbook.faculty, workbook.courses, workbook.labs);
        ensure_complete(&dataset)?;
        Ok(dataset)
    }
}

impl DataSource for JsonWorkbookSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Dataset, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let dataset = Self::parse(&text)?;
        info!(
            faculty = dataset.faculty.len(),
            courses = dataset.courses.len(),
            labs = dataset.labs.len(),
            "Workbook loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    const WORKBOOK: &str = r#"{
        "Sheet1": [{"Faculty_Name": "A. Rao", "Course_Code": "CS301", "Year": "2ND"}],
        "Sheet2": [{"Course_Code": "CS301", "Course_Name": "DBMS", "Year": "2ND", "Semester": 1}],
        "Sheet3": [{"Lab_Name": "L1", "Course_Code": "CS301", "Type": "Lab", "Year": "2ND"}]
    }"#;

    #[test]
    fn test_parse_workbook() {
        let ds = JsonWorkbookSource::parse(WORKBOOK).unwrap();
        assert_eq!(ds.faculty[0].subject(), Some("DBMS"));
        assert_eq!(ds.courses[0].semester, "1");
        assert!(ds.labs[0].is_lab());
    }

    #[test]
    fn test_missing_sheet() {
        let err = JsonWorkbookSource::parse(r#"{"Sheet1": [], "Sheet2": [], "Sheet3": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::EmptySheet { ref sheet, .. } if sheet == "Sheet1"));

        let only_faculty = r#"{"Sheet1": [{"Faculty_Name": "A. Rao", "Course_Code": "CS301", "Year": "2ND"}]}"#;
        let err = JsonWorkbookSource::parse(only_faculty).unwrap_err();
        assert!(matches!(err, SourceError::EmptySheet { ref sheet, .. } if sheet == "Sheet2"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            JsonWorkbookSource::parse("[1, 2").unwrap_err(),
            SourceError::Malformed(_)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable_data.json");
        fs::write(&path, WORKBOOK).unwrap();
        let ds = JsonWorkbookSource::new(&path).load().unwrap();
        assert_eq!(ds.faculty.len(), 1);

        let missing = JsonWorkbookSource::new(dir.path().join("absent.json"));
        assert!(matches!(missing.load().unwrap_err(), SourceError::Io { .. }));
    }

    #[test]
    fn test_in_memory_dataset_source() {
        assert!(Dataset::default().load().is_err());
        let ds = JsonWorkbookSource::parse(WORKBOOK).unwrap();
        assert_eq!(ds.load().unwrap(), ds);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_load_logs_row_counts_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable_data.json");
        fs::write(&path, WORKBOOK).unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            JsonWorkbookSource::new(&path).load().unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("courses=1").count(), 1, "{output}");
    }
}
