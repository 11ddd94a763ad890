//! Class and lab schedules derived from faculty grids.
//!
//! Both derivations are pure functions of already-built state:
//!
//! - **Class**: for every course, copy each non-empty slot of every
//!   faculty teaching that course code whose text contains the course
//!   name into `class[year][semester]["<Day> Period<N>"]`.
//! - **Lab**: for every `"Lab"` room, copy the class entries of each
//!   course sharing its code whose text contains the course name.
//!
//! Concurrent writes to one key resolve last-write-wins; no conflict
//! detection is attempted.

use crate::models::{ClassSchedule, CourseRow, FacultyRow, FacultySchedule, LabRow, LabSchedule};

/// Builds derived schedules for one department's courses and labs.
///
/// # Example
/// ```
/// use u_timetable::models::{CourseRow, FacultyRow, FacultySchedule, LabRow};
/// use u_timetable::scheduler::DerivedScheduleBuilder;
///
/// let courses = vec![CourseRow::new("CS301", "DBMS", "2ND", "1")];
/// let labs = vec![LabRow::new("L1", "CS301", "2ND")];
/// let builder = DerivedScheduleBuilder::new(&courses, &labs);
///
/// let class = builder.class_schedule(&[], &FacultySchedule::new());
/// assert_eq!(class.entry_count(), 0);
/// let lab = builder.lab_schedule(&class);
/// assert!(lab.lab("L1").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DerivedScheduleBuilder<'a> {
    courses: &'a [CourseRow],
    labs: &'a [LabRow],
}

impl<'a> DerivedScheduleBuilder<'a> {
    /// Creates a builder over department-filtered courses and labs.
    pub fn new(courses: &'a [CourseRow], labs: &'a [LabRow]) -> Self {
        Self { courses, labs }
    }

    /// Derives the per-cohort schedule.
    ///
    /// Every course creates its (year, semester) cohort, even when no
    /// slot matches. Faculty rows are resolved to grids by
    /// case-insensitive name.
    pub fn class_schedule(
        &self,
        faculty_rows: &[FacultyRow],
        faculty: &FacultySchedule,
    ) -> ClassSchedule {
        let mut class = ClassSchedule::new();

        for course in self.courses {
            class.cohort_mut(&course.year, &course.semester);
            if course.course_name.trim().is_empty() {
                continue;
            }

            let instructors = faculty_rows
                .iter()
                .filter(|r| r.course_code == course.course_code);
            for row in instructors {
                let Some(grid) = faculty.grid_for(&row.faculty_name) else {
                    continue;
                };
                for (slot, text) in grid.occupied() {
                    if text.contains(course.course_name.as_str()) {
                        class.record(&course.year, &course.semester, slot.key(), text);
                    }
                }
            }
        }

        class
    }

    /// Derives the per-lab schedule from a class schedule.
    ///
    /// Every lab row creates its entry; only rooms of type `"Lab"`
    /// receive slots.
    pub fn lab_schedule(&self, class: &ClassSchedule) -> LabSchedule {
        let mut labs = LabSchedule::new();

        for lab in self.labs {
            labs.lab_mut(&lab.lab_name);
            if !lab.is_lab() {
                continue;
            }

            let courses = self
                .courses
                .iter()
                .filter(|c| c.course_code == lab.course_code)
                .filter(|c| !c.course_name.trim().is_empty());
            for course in courses {
                let Some(entries) = class.cohort(&course.year, &course.semester) else {
                    continue;
                };
                for (slot_key, text) in entries {
                    if text.contains(course.course_name.as_str()) {
                        labs.record(&lab.lab_name, slot_key.clone(), text.clone());
                    }
                }
            }
        }

        labs
    }
}
