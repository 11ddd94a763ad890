//! Named timetable constraints.
//!
//! Constraints are labels handed to every pipeline stage. None of the
//! current stages enforce them; slot exclusivity is guaranteed by the
//! grid itself. They exist so that a future stage can opt in without a
//! change to the stage signature.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimetableKind;

/// A named timetable constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// A resource holds at most one assignment per slot.
    NoOverlaps,
    /// A room seats no more students than its capacity.
    RoomCapacity,
    /// Lab sessions occupy consecutive periods.
    ContinuousSlots,
    /// Required lab equipment is available.
    EquipmentAvailability,
    /// Labs are not booked during maintenance.
    MaintenanceWindows,
    /// Prerequisites run before dependent courses.
    PrerequisiteSequencing,
    /// Shared courses do not clash across departments.
    InterDepartmentalClashes,
}

/// Constraint families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintGroup {
    General,
    Lab,
    Course,
}

impl ConstraintGroup {
    /// Constraints in this family.
    pub fn constraints(self) -> &'static [Constraint] {
        match self {
            ConstraintGroup::General => &[Constraint::NoOverlaps, Constraint::RoomCapacity],
            ConstraintGroup::Lab => &[
                Constraint::ContinuousSlots,
                Constraint::EquipmentAvailability,
                Constraint::MaintenanceWindows,
            ],
            ConstraintGroup::Course => &[
                Constraint::PrerequisiteSequencing,
                Constraint::InterDepartmentalClashes,
            ],
        }
    }
}

impl Constraint {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Constraint::NoOverlaps => "no overlaps",
            Constraint::RoomCapacity => "room capacity",
            Constraint::ContinuousSlots => "continuous slots",
            Constraint::EquipmentAvailability => "equipment availability",
            Constraint::MaintenanceWindows => "maintenance windows",
            Constraint::PrerequisiteSequencing => "prerequisite sequencing",
            Constraint::InterDepartmentalClashes => "inter-departmental clashes",
        }
    }

    /// Constraints passed to the stages that build a schedule kind.
    ///
    /// Faculty and class schedules get general + course; lab schedules
    /// get general + lab.
    pub fn for_kind(kind: TimetableKind) -> Vec<Constraint> {
        let extra = match kind {
            TimetableKind::Faculty | TimetableKind::Class => ConstraintGroup::Course,
            TimetableKind::Lab => ConstraintGroup::Lab,
        };
        ConstraintGroup::General
            .constraints()
            .iter()
            .chain(extra.constraints())
            .copied()
            .collect()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
