//! Weekly slot grid.
//!
//! Every schedule addresses the same fixed space: six teaching days
//! (Monday through Saturday) by eight periods per day, 48 slots in total.
//! A `SlotGrid` holds at most one assignment text per slot.
//!
//! # Wire format
//! A grid serializes as a nested map, with `-` marking an empty slot:
//!
//! ```text
//! { "Monday": { "Period1": "DBMS (CS301)", "Period2": "-", ... }, ... }
//! ```

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Periods per teaching day.
pub const PERIODS_PER_DAY: u8 = 8;

/// Slots in one weekly grid (6 days × 8 periods).
pub const SLOTS_PER_GRID: usize = Day::ALL.len() * PERIODS_PER_DAY as usize;

/// Text stored in a slot that holds no assignment.
pub const EMPTY_MARKER: &str = "-";

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All teaching days in week order.
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Full English day name, as used in slot keys.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    /// Parses a full day name.
    pub fn parse(name: &str) -> Option<Day> {
        Day::ALL.into_iter().find(|d| d.name() == name)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One (day, period) cell of the weekly grid.
///
/// Periods are 1-based: `1..=PERIODS_PER_DAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    day: Day,
    period: u8,
}

impl TimeSlot {
    /// Creates a slot. Returns `None` if the period is out of range.
    pub fn new(day: Day, period: u8) -> Option<Self> {
        (1..=PERIODS_PER_DAY)
            .contains(&period)
            .then_some(Self { day, period })
    }

    /// Slot day.
    pub fn day(&self) -> Day {
        self.day
    }

    /// Slot period (1-based).
    pub fn period(&self) -> u8 {
        self.period
    }

    /// Iterates all 48 slots, day-major.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        Day::ALL.into_iter().flat_map(|day| {
            (1..=PERIODS_PER_DAY).map(move |period| TimeSlot { day, period })
        })
    }

    /// Period key within a day, e.g. `Period3`.
    pub fn period_key(&self) -> String {
        format!("Period{}", self.period)
    }

    /// Flat slot key used by class and lab schedules, e.g. `Monday Period3`.
    pub fn key(&self) -> String {
        format!("{} {}", self.day, self.period_key())
    }

    /// Parses a period key (`Period3`) into its 1-based number.
    pub fn parse_period_key(key: &str) -> Option<u8> {
        key.strip_prefix("Period")?
            .parse::<u8>()
            .ok()
            .filter(|p| (1..=PERIODS_PER_DAY).contains(p))
    }

    /// Parses a flat slot key (`Monday Period3`).
    pub fn parse_key(key: &str) -> Option<Self> {
        let (day, period) = key.split_once(' ')?;
        Self::new(Day::parse(day)?, Self::parse_period_key(period)?)
    }

    #[inline]
    fn index(&self) -> usize {
        self.day.index() * PERIODS_PER_DAY as usize + (self.period as usize - 1)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Period{}", self.day, self.period)
    }
}

/// A 48-slot weekly grid for one faculty member.
///
/// A slot is written only while it is empty, so each slot carries at
/// most one assignment for the lifetime of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    cells: Vec<Option<String>>,
}

impl SlotGrid {
    /// Creates a grid with every slot empty.
    pub fn new() -> Self {
        Self {
            cells: vec![None; SLOTS_PER_GRID],
        }
    }

    /// Assignment text at a slot, if any.
    pub fn get(&self, slot: TimeSlot) -> Option<&str> {
        self.cells[slot.index()].as_deref()
    }

    /// Whether the slot holds no assignment.
    pub fn is_free(&self, slot: TimeSlot) -> bool {
        self.cells[slot.index()].is_none()
    }

    /// Writes `text` into the slot if it is empty.
    ///
    /// Returns `false` (and leaves the grid untouched) when occupied.
    pub fn try_place(&mut self, slot: TimeSlot, text: impl Into<String>) -> bool {
        if !self.is_free(slot) {
            return false;
        }
        self.cells[slot.index()] = Some(text.into());
        true
    }

    /// Occupied slots with their assignment text, day-major.
    pub fn occupied(&self) -> impl Iterator<Item = (TimeSlot, &str)> {
        TimeSlot::all().filter_map(move |slot| self.get(slot).map(|text| (slot, text)))
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of free slots.
    pub fn free_count(&self) -> usize {
        SLOTS_PER_GRID - self.occupied_count()
    }

    /// Whether no slot is occupied.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn from_raw(raw: BTreeMap<String, BTreeMap<String, String>>) -> Result<Self, String> {
        let mut grid = Self::new();
        for (day_name, periods) in raw {
            let day = Day::parse(&day_name).ok_or_else(|| format!("unknown day '{day_name}'"))?;
            for (period_key, text) in periods {
                let period = TimeSlot::parse_period_key(&period_key)
                    .ok_or_else(|| format!("unknown period '{period_key}'"))?;
                if text.is_empty() || text == EMPTY_MARKER {
                    continue;
                }
                if let Some(slot) = TimeSlot::new(day, period) {
                    grid.cells[slot.index()] = Some(text);
                }
            }
        }
        Ok(grid)
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for SlotGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Day::ALL.len()))?;
        for day in Day::ALL {
            map.serialize_entry(day.name(), &DayRow { grid: self, day })?;
        }
        map.end()
    }
}

struct DayRow<'a> {
    grid: &'a SlotGrid,
    day: Day,
}

impl Serialize for DayRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PERIODS_PER_DAY as usize))?;
        for period in 1..=PERIODS_PER_DAY {
            let slot = TimeSlot {
                day: self.day,
                period,
            };
            map.serialize_entry(&slot.period_key(), self.grid.get(slot).unwrap_or(EMPTY_MARKER))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SlotGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, BTreeMap<String, String>>::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(D::Error::custom)
    }
}
