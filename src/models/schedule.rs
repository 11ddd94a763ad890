//! Schedule (solution) models.
//!
//! One generation run produces three mutually consistent schedules:
//!
//! | Schedule | Shape |
//! |----------|-------|
//! | `FacultySchedule` | faculty → weekly `SlotGrid` |
//! | `ClassSchedule` | year → semester → slot key → assignment |
//! | `LabSchedule` | lab → slot key → assignment |
//!
//! Slot keys in class and lab schedules are the flat `"<Day> Period<N>"`
//! form produced by [`TimeSlot::key`](super::TimeSlot::key).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::records::same_faculty;
use super::SlotGrid;

/// Which of the three schedules a payload is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimetableKind {
    Faculty,
    Class,
    Lab,
}

impl TimetableKind {
    /// Lowercase name used in storage keys.
    pub fn as_str(self) -> &'static str {
        match self {
            TimetableKind::Faculty => "faculty",
            TimetableKind::Class => "class",
            TimetableKind::Lab => "lab",
        }
    }
}

impl fmt::Display for TimetableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistable schedule.
pub trait Timetable: Serialize + DeserializeOwned + Default {
    /// Storage kind of this schedule.
    const KIND: TimetableKind;

    /// Whether the schedule has no top-level entries.
    fn is_empty(&self) -> bool;
}

/// Slot key → assignment text.
pub type SlotEntries = BTreeMap<String, String>;

/// Per-faculty weekly grids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacultySchedule {
    grids: BTreeMap<String, SlotGrid>,
}

impl FacultySchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid for a faculty member, replacing any previous one.
    pub fn insert(&mut self, faculty: impl Into<String>, grid: SlotGrid) {
        self.grids.insert(faculty.into(), grid);
    }

    /// Grid stored under exactly this name.
    pub fn grid(&self, faculty: &str) -> Option<&SlotGrid> {
        self.grids.get(faculty)
    }

    /// Grid for a faculty name, matched case-insensitively after trimming.
    pub fn grid_for(&self, faculty: &str) -> Option<&SlotGrid> {
        self.grid(faculty).or_else(|| {
            self.grids
                .iter()
                .find(|(name, _)| same_faculty(name, faculty))
                .map(|(_, grid)| grid)
        })
    }

    /// Iterates (faculty, grid) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotGrid)> {
        self.grids.iter().map(|(name, grid)| (name.as_str(), grid))
    }

    /// Number of faculty entries.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Total occupied slots across all faculty.
    pub fn placed_count(&self) -> usize {
        self.grids.values().map(SlotGrid::occupied_count).sum()
    }
}

impl Timetable for FacultySchedule {
    const KIND: TimetableKind = TimetableKind::Faculty;

    fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

/// Per-cohort schedule: year → semester → slot key → assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassSchedule {
    years: BTreeMap<String, BTreeMap<String, SlotEntries>>,
}

impl ClassSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the (year, semester) entry if absent and returns it.
    pub fn cohort_mut(&mut self, year: &str, semester: &str) -> &mut SlotEntries {
        self.years
            .entry(year.to_string())
            .or_default()
            .entry(semester.to_string())
            .or_default()
    }

    /// Writes an assignment; a later write to the same key wins.
    pub fn record(&mut self, year: &str, semester: &str, slot_key: impl Into<String>, text: impl Into<String>) {
        self.cohort_mut(year, semester)
            .insert(slot_key.into(), text.into());
    }

    /// Entries for one (year, semester), if that cohort exists.
    pub fn cohort(&self, year: &str, semester: &str) -> Option<&SlotEntries> {
        self.years.get(year)?.get(semester)
    }

    /// Iterates (year, semester, entries) triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &SlotEntries)> {
        self.years.iter().flat_map(|(year, semesters)| {
            semesters
                .iter()
                .map(move |(sem, entries)| (year.as_str(), sem.as_str(), entries))
        })
    }

    /// Total slot entries across all cohorts.
    pub fn entry_count(&self) -> usize {
        self.iter().map(|(_, _, e)| e.len()).sum()
    }
}

impl Timetable for ClassSchedule {
    const KIND: TimetableKind = TimetableKind::Class;

    fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Per-laboratory schedule: lab → slot key → assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabSchedule {
    labs: BTreeMap<String, SlotEntries>,
}

impl LabSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the lab entry if absent and returns it.
    pub fn lab_mut(&mut self, lab_name: &str) -> &mut SlotEntries {
        self.labs.entry(lab_name.to_string()).or_default()
    }

    /// Writes an assignment; a later write to the same key wins.
    pub fn record(&mut self, lab_name: &str, slot_key: impl Into<String>, text: impl Into<String>) {
        self.lab_mut(lab_name).insert(slot_key.into(), text.into());
    }

    /// Entries for one lab.
    pub fn lab(&self, lab_name: &str) -> Option<&SlotEntries> {
        self.labs.get(lab_name)
    }

    /// Iterates (lab, entries) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotEntries)> {
        self.labs.iter().map(|(name, e)| (name.as_str(), e))
    }

    /// Total slot entries across all labs.
    pub fn entry_count(&self) -> usize {
        self.labs.values().map(BTreeMap::len).sum()
    }
}

impl Timetable for LabSchedule {
    const KIND: TimetableKind = TimetableKind::Lab;

    fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }
}
