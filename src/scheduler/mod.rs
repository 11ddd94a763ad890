//! Timetable schedulers.
//!
//! Provides the randomized slot assigner, the stage pipeline that runs
//! after it, and the builder that derives class and lab schedules.
//!
//! # Algorithm
//!
//! `RandomSlotAssigner` uses randomized greedy placement with a fixed
//! draw budget per subject. It is neither optimal nor complete; subjects
//! that exhaust their draws are dropped and logged.

mod assign;
mod derive;
mod stages;

pub use assign::{RandomSlotAssigner, DEFAULT_MAX_ATTEMPTS};
pub use derive::DerivedScheduleBuilder;
pub use stages::{
    ConstraintPropagation, GeneticSearch, GraphColoring, OverlapScan, ScheduleStage,
    StagePipeline,
};
