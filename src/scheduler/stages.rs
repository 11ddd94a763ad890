//! Post-placement pipeline stages.
//!
//! After random placement, the faculty schedule flows through an ordered
//! list of stages. Only the overlap scan does real (read-only) work; the
//! constraint-propagation, graph-colouring and genetic-search stages are
//! pass-through hooks that keep the pipeline shape open for future
//! optimizers.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::models::{Constraint, FacultySchedule};
use crate::validation;

/// A stage applied to a faculty schedule.
pub trait ScheduleStage: Send + Sync + fmt::Debug {
    /// Stage name, used in logs.
    fn name(&self) -> &'static str;

    /// Transforms the schedule under the given constraints.
    fn apply(&self, schedule: FacultySchedule, constraints: &[Constraint]) -> FacultySchedule;
}

/// Read-only overlap scan; logs overlaps and returns its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapScan;

impl ScheduleStage for OverlapScan {
    fn name(&self) -> &'static str {
        "overlap-scan"
    }

    fn apply(&self, schedule: FacultySchedule, _constraints: &[Constraint]) -> FacultySchedule {
        validation::check(schedule)
    }
}

macro_rules! pass_through_stage {
    ($(#[$doc:meta])* $ty:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl ScheduleStage for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn apply(&self, schedule: FacultySchedule, constraints: &[Constraint]) -> FacultySchedule {
                debug!(stage = $name, constraints = constraints.len(), "Pass-through stage");
                schedule
            }
        }
    };
}

pass_through_stage!(
    /// Constraint-propagation hook. Currently the identity.
    ConstraintPropagation,
    "constraint-propagation"
);
pass_through_stage!(
    /// Graph-colouring hook. Currently the identity.
    GraphColoring,
    "graph-coloring"
);
pass_through_stage!(
    /// Genetic-search hook. Currently the identity.
    GeneticSearch,
    "genetic-search"
);

/// An ordered list of stages.
#[derive(Clone)]
pub struct StagePipeline {
    stages: Vec<Arc<dyn ScheduleStage>>,
}

impl StagePipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Overlap scan followed by the three pass-through hooks.
    pub fn standard() -> Self {
        Self::new()
            .with_stage(OverlapScan)
            .with_stage(ConstraintPropagation)
            .with_stage(GraphColoring)
            .with_stage(GeneticSearch)
    }

    /// Appends a stage.
    pub fn with_stage<S: ScheduleStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Stage names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in order.
    pub fn run(&self, schedule: FacultySchedule, constraints: &[Constraint]) -> FacultySchedule {
        self.stages
            .iter()
            .fold(schedule, |acc, stage| stage.apply(acc, constraints))
    }
}

impl Default for StagePipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for StagePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagePipeline")
            .field("stages", &self.names())
            .finish()
    }
}
