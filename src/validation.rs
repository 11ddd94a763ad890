//! Overlap scan over finished schedules.
//!
//! Groups each schedule's occupied slots by owner and day and compares
//! the number of occupied periods against the number of distinct period
//! keys. A mismatch is logged as an overlap.
//!
//! The scan only detects; it never repairs or reassigns. Because grids
//! accept writes only into empty slots and schedule entries are keyed
//! maps, the overlap condition cannot arise from the generation
//! pipeline itself.

use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use crate::models::{ClassSchedule, Day, FacultySchedule, LabSchedule, SlotEntries, TimeSlot};

/// Occupied period keys of one owner on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup {
    /// Schedule owner (faculty, `year/semester` cohort, or lab).
    pub owner: String,
    /// Day name.
    pub day: String,
    /// Period keys holding an assignment.
    pub periods: Vec<String>,
}

/// A detected overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub owner: String,
    pub day: String,
    /// Occupied period entries.
    pub occupied: usize,
    /// Distinct period keys among them.
    pub distinct: usize,
}

/// A schedule that can be scanned for overlaps.
pub trait SlotTable {
    /// Occupied periods grouped by owner and day.
    fn slot_groups(&self) -> Vec<SlotGroup>;
}

impl SlotTable for FacultySchedule {
    fn slot_groups(&self) -> Vec<SlotGroup> {
        let mut groups = Vec::new();
        for (faculty, grid) in self.iter() {
            for day in Day::ALL {
                let periods: Vec<String> = grid
                    .occupied()
                    .filter(|(slot, _)| slot.day() == day)
                    .map(|(slot, _)| slot.period_key())
                    .collect();
                groups.push(SlotGroup {
                    owner: faculty.to_string(),
                    day: day.name().to_string(),
                    periods,
                });
            }
        }
        groups
    }
}

impl SlotTable for ClassSchedule {
    fn slot_groups(&self) -> Vec<SlotGroup> {
        self.iter()
            .flat_map(|(year, semester, entries)| group_by_day(&format!("{year}/{semester}"), entries))
            .collect()
    }
}

impl SlotTable for LabSchedule {
    fn slot_groups(&self) -> Vec<SlotGroup> {
        self.iter()
            .flat_map(|(lab, entries)| group_by_day(lab, entries))
            .collect()
    }
}

/// Splits flat `"<Day> Period<N>"` keys into per-day groups.
///
/// Keys that do not name a slot are skipped with a warning.
fn group_by_day(owner: &str, entries: &SlotEntries) -> Vec<SlotGroup> {
    let mut by_day: BTreeMap<Day, Vec<String>> = BTreeMap::new();
    for key in entries.keys() {
        match TimeSlot::parse_key(key) {
            Some(slot) => by_day.entry(slot.day()).or_default().push(slot.period_key()),
            None => warn!(owner, key = %key, "Skipping unrecognized slot key"),
        }
    }
    by_day
        .into_iter()
        .map(|(day, periods)| SlotGroup {
            owner: owner.to_string(),
            day: day.name().to_string(),
            periods,
        })
        .collect()
}

/// Returns every group whose occupied count exceeds its distinct keys.
pub fn find_overlaps<T: SlotTable>(schedule: &T) -> Vec<Overlap> {
    schedule
        .slot_groups()
        .into_iter()
        .filter_map(|group| {
            let distinct = group.periods.iter().collect::<HashSet<_>>().len();
            (group.periods.len() > distinct).then(|| Overlap {
                owner: group.owner,
                day: group.day,
                occupied: group.periods.len(),
                distinct,
            })
        })
        .collect()
}

/// Logs any overlaps and returns the schedule unchanged.
pub fn check<T: SlotTable>(schedule: T) -> T {
    for overlap in find_overlaps(&schedule) {
        warn!(
            owner = %overlap.owner,
            day = %overlap.day,
            occupied = overlap.occupied,
            distinct = overlap.distinct,
            "Overlap detected in timetable"
        );
    }
    schedule
}
