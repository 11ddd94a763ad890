//! Academic timetable generation.
//!
//! Assigns faculty subjects to a weekly grid of 6 days × 8 periods and
//! derives three mutually consistent schedules (per-faculty, per-class,
//! per-lab) from one tabular dataset.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `FacultyRow`, `CourseRow`, `LabRow`,
//!   `Dataset`, `TimeSlot`, `SlotGrid`, the three schedules, `Constraint`
//! - **`department`**: Department labels and year-based row filtering
//! - **`scheduler`**: Randomized slot placement, stage hooks, derived schedules
//! - **`validation`**: Read-only overlap scan
//! - **`storage`**: Blob store trait, backends and the JSON gateway
//! - **`source`**: Tabular data sources
//! - **`generator`**: The end-to-end `generate` request
//!
//! # Architecture
//!
//! Department filter → random placement → overlap scan → derived class
//! and lab schedules → persistence, one write per schedule. Every
//! schedule is rebuilt from source data on each request; nothing is
//! cached between requests.

pub mod config;
pub mod department;
pub mod error;
pub mod generator;
pub mod models;
pub mod scheduler;
pub mod source;
pub mod storage;
pub mod validation;

pub use department::Department;
pub use error::{SourceError, StoreError, TimetableError};
pub use generator::{GenerationReport, TimetableGenerator};
