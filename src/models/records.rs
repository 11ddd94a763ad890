//! Source records.
//!
//! Rows arrive from a tabular source as field-named records (one sheet
//! each for faculty, courses and labs). Cells may be text, numbers or
//! null; every field is read as text so that a year of `2` and `"2"`
//! compare equal downstream.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::department::Department;

/// A faculty-teaches-course row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRow {
    #[serde(rename = "Faculty_Name", default, deserialize_with = "text_cell")]
    pub faculty_name: String,
    #[serde(rename = "Course_Code", default, deserialize_with = "text_cell")]
    pub course_code: String,
    /// Subject text; falls back to the course name when blank.
    #[serde(rename = "Subject", default, deserialize_with = "optional_text_cell")]
    pub subject: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "text_cell")]
    pub year: String,
}

/// A course offered in a given year and semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRow {
    #[serde(rename = "Course_Code", default, deserialize_with = "text_cell")]
    pub course_code: String,
    #[serde(rename = "Course_Name", default, deserialize_with = "text_cell")]
    pub course_name: String,
    #[serde(rename = "Year", default, deserialize_with = "text_cell")]
    pub year: String,
    #[serde(rename = "Semester", default, deserialize_with = "text_cell")]
    pub semester: String,
}

/// A laboratory room bound to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabRow {
    #[serde(rename = "Lab_Name", default, deserialize_with = "text_cell")]
    pub lab_name: String,
    #[serde(rename = "Course_Code", default, deserialize_with = "text_cell")]
    pub course_code: String,
    /// Room type; only `"Lab"` rows receive lab schedule entries.
    #[serde(rename = "Type", default, deserialize_with = "text_cell")]
    pub lab_type: String,
    #[serde(rename = "Year", default, deserialize_with = "text_cell")]
    pub year: String,
    #[serde(rename = "Capacity", default, deserialize_with = "count_cell")]
    pub capacity: Option<u32>,
}

/// Row types that carry a department year.
pub trait YearRow {
    /// Raw `Year` field.
    fn year(&self) -> &str;
}

impl YearRow for FacultyRow {
    fn year(&self) -> &str {
        &self.year
    }
}

impl YearRow for CourseRow {
    fn year(&self) -> &str {
        &self.year
    }
}

impl YearRow for LabRow {
    fn year(&self) -> &str {
        &self.year
    }
}

impl FacultyRow {
    /// Creates a row with no explicit subject.
    pub fn new(
        faculty_name: impl Into<String>,
        course_code: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            faculty_name: faculty_name.into(),
            course_code: course_code.into(),
            subject: None,
            year: year.into(),
        }
    }

    /// Sets the subject text.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Subject text, if present and non-blank.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Case-insensitive, trimmed faculty name comparison.
    pub fn is_taught_by(&self, faculty: &str) -> bool {
        same_faculty(&self.faculty_name, faculty)
    }
}

impl CourseRow {
    /// Creates a course row.
    pub fn new(
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        year: impl Into<String>,
        semester: impl Into<String>,
    ) -> Self {
        Self {
            course_code: course_code.into(),
            course_name: course_name.into(),
            year: year.into(),
            semester: semester.into(),
        }
    }
}

impl LabRow {
    /// Type label that marks a room as a laboratory.
    pub const LAB_TYPE: &'static str = "Lab";

    /// Creates a lab row of type `"Lab"`.
    pub fn new(
        lab_name: impl Into<String>,
        course_code: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            lab_name: lab_name.into(),
            course_code: course_code.into(),
            lab_type: Self::LAB_TYPE.to_string(),
            year: year.into(),
            capacity: None,
        }
    }

    /// Sets the room type.
    pub fn with_type(mut self, lab_type: impl Into<String>) -> Self {
        self.lab_type = lab_type.into();
        self
    }

    /// Whether this room is a laboratory.
    pub fn is_lab(&self) -> bool {
        self.lab_type == Self::LAB_TYPE
    }
}

/// Case-insensitive, trimmed comparison of two faculty names.
pub fn same_faculty(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// The three record sets of one source load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub faculty: Vec<FacultyRow>,
    pub courses: Vec<CourseRow>,
    pub labs: Vec<LabRow>,
}

impl Dataset {
    /// Assembles a dataset, filling blank subjects from course names.
    ///
    /// A faculty row without subject text takes the name of the first
    /// course sharing its course code. Rows that still have no subject
    /// are kept; the assignment engine skips them.
    pub fn new(faculty: Vec<FacultyRow>, courses: Vec<CourseRow>, labs: Vec<LabRow>) -> Self {
        let faculty: Vec<FacultyRow> = faculty
            .into_iter()
            .map(|mut row| {
                if row.subject().is_none() {
                    row.subject = courses
                        .iter()
                        .find(|c| c.course_code == row.course_code)
                        .map(|c| c.course_name.clone())
                        .filter(|name| !name.trim().is_empty());
                }
                row
            })
            .collect();

        let missing = faculty.iter().filter(|r| r.subject().is_none()).count();
        if missing > 0 {
            warn!(rows = missing, "Some faculty rows have no subject even after merging with courses");
        }

        Self {
            faculty,
            courses,
            labs,
        }
    }

    /// Department labels offered by this dataset.
    ///
    /// One `"<year> Year"` label per distinct faculty-row year, in
    /// first-seen order, or the default department when no row has one.
    pub fn departments(&self) -> Vec<Department> {
        let mut seen = HashSet::new();
        let departments: Vec<Department> = self
            .faculty
            .iter()
            .map(|r| r.year.trim())
            .filter(|y| !y.is_empty())
            .filter(|y| seen.insert(y.to_string()))
            .map(Department::for_year)
            .collect();

        if departments.is_empty() {
            vec![Department::default_department()]
        } else {
            departments
        }
    }

    /// Distinct non-empty faculty names, sorted.
    pub fn faculty_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .faculty
            .iter()
            .map(|r| r.faculty_name.clone())
            .filter(|n| !n.trim().is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    fn into_text(self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Int(n) => Some(n.to_string()),
            Cell::Float(f) if f.is_nan() => None,
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some((f as i64).to_string())
            }
            Cell::Float(f) => Some(f.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

fn optional_text_cell<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let cell = Option::<Cell>::deserialize(d)?;
    Ok(cell
        .and_then(Cell::into_text)
        .filter(|s| !s.trim().is_empty()))
}

fn text_cell<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<Cell>::deserialize(d)?
        .and_then(Cell::into_text)
        .unwrap_or_default())
}

fn count_cell<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(optional_text_cell(d)?.and_then(|s| s.trim().parse::<u32>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_falls_back_to_course_name() {
        let ds = Dataset::new(
            vec![
                FacultyRow::new("A. Rao", "CS301", "2ND"),
                FacultyRow::new("A. Rao", "CS302", "2ND").with_subject("OS"),
                FacultyRow::new("B. Iyer", "CS999", "2ND").with_subject("  "),
            ],
            vec![
                CourseRow::new("CS301", "DBMS", "2ND", "1"),
                CourseRow::new("CS302", "Operating Systems", "2ND", "1"),
            ],
            vec![LabRow::new("L1", "CS301", "2ND")],
        );
        assert_eq!(ds.faculty[0].subject(), Some("DBMS"));
        assert_eq!(ds.faculty[1].subject(), Some("OS"));
        assert_eq!(ds.faculty[2].subject(), None);
    }

    #[test]
    fn test_deserialize_mixed_cells() {
        let json = r#"[
            {"Faculty_Name": "A. Rao", "Course_Code": "CS301", "Subject": null, "Year": 2},
            {"Faculty_Name": "B. Iyer", "Course_Code": "CS302", "Year": "3RD"}
        ]"#;
        let rows: Vec<FacultyRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].year, "2");
        assert_eq!(rows[0].subject, None);
        assert_eq!(rows[1].subject, None);

        let lab: LabRow = serde_json::from_str(
            r#"{"Lab_Name": "L1", "Course_Code": "CS301", "Type": "Lab", "Year": "2ND", "Capacity": 30.0}"#,
        )
        .unwrap();
        assert!(lab.is_lab());
        assert_eq!(lab.capacity, Some(30));

        let course: CourseRow = serde_json::from_str(
            r#"{"Course_Code": "CS301", "Course_Name": "DBMS", "Year": "2ND", "Semester": 1.0}"#,
        )
        .unwrap();
        assert_eq!(course.semester, "1");
    }

    #[test]
    fn test_faculty_name_matching() {
        let row = FacultyRow::new("  A. Rao ", "CS301", "2ND");
        assert!(row.is_taught_by("a. rao"));
        assert!(!row.is_taught_by("A Rao"));
    }

    #[test]
    fn test_departments_and_faculty_names() {
        let ds = Dataset::new(
            vec![
                FacultyRow::new("B. Iyer", "CS302", "3RD"),
                FacultyRow::new("A. Rao", "CS301", "2ND"),
                FacultyRow::new("A. Rao", "CS303", "2ND"),
            ],
            vec![],
            vec![],
        );
        let labels: Vec<String> = ds.departments().iter().map(|d| d.to_string()).collect();
        assert_eq!(labels, vec!["3RD Year", "2ND Year"]);
        assert_eq!(ds.faculty_names(), vec!["A. Rao", "B. Iyer"]);
    }

    #[test]
    fn test_departments_default_without_years() {
        let ds = Dataset::new(vec![FacultyRow::new("A. Rao", "CS301", "")], vec![], vec![]);
        assert!(ds.departments()[0].is_default());
    }

    #[test]
    fn test_non_lab_type() {
        let room = LabRow::new("R1", "CS301", "2ND").with_type("Theory");
        assert!(!room.is_lab());
    }
}
