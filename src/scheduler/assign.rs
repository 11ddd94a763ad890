//! Randomized greedy slot placement.
//!
//! # Algorithm
//!
//! 1. Start each faculty member's grid with all 48 slots empty.
//! 2. For every (subject, course code) the faculty teaches, draw a
//!    uniformly random (day, period) up to `max_attempts` times.
//! 3. The first draw landing on an empty slot commits
//!    `"<subject> (<code>)"`; if every draw hits an occupied slot the
//!    subject is dropped and logged.
//!
//! There is no backtracking and no ordering among subjects, so placement
//! may be incomplete even when free slots remain.
//!
//! # Complexity
//! O(s * a) per faculty, where s = subjects and a = max attempts.

use rand::Rng;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::{Day, FacultyRow, FacultySchedule, SlotGrid, TimeSlot, PERIODS_PER_DAY};

/// Draws per subject before it is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Places each faculty member's subjects into a weekly grid at random.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_timetable::models::FacultyRow;
/// use u_timetable::scheduler::RandomSlotAssigner;
///
/// let rows = vec![
///     FacultyRow::new("A. Rao", "CS301", "2ND").with_subject("DBMS"),
///     FacultyRow::new("A. Rao", "CS302", "2ND").with_subject("OS"),
/// ];
/// let mut rng = SmallRng::seed_from_u64(7);
/// let schedule = RandomSlotAssigner::new().assign(&rows, None, &mut rng);
/// assert_eq!(schedule.placed_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RandomSlotAssigner {
    max_attempts: u32,
}

impl RandomSlotAssigner {
    /// Creates an assigner with the default attempt budget.
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the number of draws per subject.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Builds faculty grids from `rows`.
    ///
    /// With `target`, only rows whose faculty name matches it
    /// (case-insensitive, trimmed) are used and the single resulting
    /// grid is keyed by `target` as given. An unknown name yields an
    /// all-empty grid. Without `target`, one grid is built for every
    /// distinct faculty name in `rows`.
    pub fn assign<R: Rng>(
        &self,
        rows: &[FacultyRow],
        target: Option<&str>,
        rng: &mut R,
    ) -> FacultySchedule {
        let mut schedule = FacultySchedule::new();

        match target {
            Some(faculty) => {
                let taught: Vec<&FacultyRow> =
                    rows.iter().filter(|r| r.is_taught_by(faculty)).collect();
                if taught.is_empty() {
                    warn!(faculty, "No data found for faculty");
                }
                schedule.insert(faculty, self.build_grid(faculty, &taught, rng));
            }
            None => {
                let mut seen = HashSet::new();
                let names: Vec<&str> = rows
                    .iter()
                    .map(|r| r.faculty_name.as_str())
                    .filter(|n| !n.is_empty())
                    .filter(|n| seen.insert(*n))
                    .collect();

                for name in names {
                    let taught: Vec<&FacultyRow> =
                        rows.iter().filter(|r| r.faculty_name == name).collect();
                    schedule.insert(name, self.build_grid(name, &taught, rng));
                }
            }
        }

        schedule
    }

    fn build_grid<R: Rng>(&self, faculty: &str, rows: &[&FacultyRow], rng: &mut R) -> SlotGrid {
        let mut grid = SlotGrid::new();
        let subjects: Vec<(&str, &str)> = rows
            .iter()
            .filter_map(|r| r.subject().map(|s| (s, r.course_code.as_str())))
            .collect();
        info!(faculty, subjects = subjects.len(), "Placing subjects");

        for (subject, course_code) in subjects {
            let text = format!("{subject} ({course_code})");
            if !self.place(&mut grid, &text, rng) {
                warn!(
                    faculty,
                    subject,
                    course_code,
                    attempts = self.max_attempts,
                    "Could not assign subject due to slot unavailability"
                );
            }
        }

        grid
    }

    /// Tries up to `max_attempts` random slots; true once one was free.
    fn place<R: Rng>(&self, grid: &mut SlotGrid, text: &str, rng: &mut R) -> bool {
        for _ in 0..self.max_attempts {
            let day = Day::ALL[rng.random_range(0..Day::ALL.len())];
            let period = rng.random_range(1..=PERIODS_PER_DAY);
            if let Some(slot) = TimeSlot::new(day, period) {
                if grid.try_place(slot, text) {
                    return true;
                }
            }
        }
        false
    }
}

impl Default for RandomSlotAssigner {
    fn default() -> Self {
        Self::new()
    }
}
