//! Timetable domain models.
//!
//! Provides the source records a generation run consumes and the
//! schedules it produces.
//!
//! # Domain Mappings
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | FacultyRow | Faculty member teaches a course |
//! | CourseRow | Course offered to a year/semester cohort |
//! | LabRow | Room bound to a course |
//! | SlotGrid | One faculty member's week |
//! | ClassSchedule | Cohort view derived from faculty grids |
//! | LabSchedule | Room view derived from the class schedule |

mod constraint;
mod records;
mod schedule;
mod slot;

pub use constraint::{Constraint, ConstraintGroup};
pub use records::{same_faculty, CourseRow, Dataset, FacultyRow, LabRow, YearRow};
pub use schedule::{
    ClassSchedule, FacultySchedule, LabSchedule, SlotEntries, Timetable, TimetableKind,
};
pub use slot::{Day, SlotGrid, TimeSlot, EMPTY_MARKER, PERIODS_PER_DAY, SLOTS_PER_GRID};
