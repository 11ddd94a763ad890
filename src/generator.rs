//! End-to-end timetable generation.
//!
//! # Pipeline
//!
//! 1. Load the dataset; an incomplete one ends the run with a load error.
//! 2. Select faculty rows: by name when a faculty is requested (ignoring
//!    the department), otherwise by department.
//! 3. Place subjects at random, then run the stage pipeline.
//! 4. Derive the class schedule, then the lab schedule, scanning each.
//! 5. Persist faculty, class and lab schedules in that order.
//!
//! Every failure is caught at [`TimetableGenerator::generate`] and turned
//! into a diagnostic; nothing is retried.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Settings;
use crate::department::{filter_rows, Department};
use crate::error::TimetableError;
use crate::models::{
    ClassSchedule, Constraint, FacultyRow, FacultySchedule, LabSchedule, Timetable, TimetableKind,
};
use crate::scheduler::{DerivedScheduleBuilder, RandomSlotAssigner, StagePipeline};
use crate::source::DataSource;
use crate::storage::{BlobStore, TimetableStore};
use crate::validation;

/// Diagnostic for a completed run.
pub const NO_SUGGESTIONS: &str = "No suggestions";

/// Diagnostic when the source could not supply a complete dataset.
pub const LOAD_ERROR: &str = "Error: No data loaded";

/// Output of one generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    pub faculty_timetable: FacultySchedule,
    pub class_timetable: ClassSchedule,
    pub lab_timetable: LabSchedule,
    pub diagnostic: String,
}

impl GenerationReport {
    /// A report with empty schedules and the given diagnostic.
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
            ..Default::default()
        }
    }

    /// Whether the run completed.
    pub fn is_success(&self) -> bool {
        self.diagnostic == NO_SUGGESTIONS
    }
}

/// Runs the generation pipeline against a source and a store.
///
/// Concurrent requests for the same department are not coordinated;
/// the last write to a stored key wins.
#[derive(Debug)]
pub struct TimetableGenerator<S, B> {
    source: S,
    store: TimetableStore<B>,
    assigner: RandomSlotAssigner,
    stages: StagePipeline,
}

impl<S: DataSource, B: BlobStore> TimetableGenerator<S, B> {
    /// Creates a generator with default placement and the standard stages.
    pub fn new(source: S, store: TimetableStore<B>) -> Self {
        Self {
            source,
            store,
            assigner: RandomSlotAssigner::new(),
            stages: StagePipeline::standard(),
        }
    }

    /// Creates a generator configured from settings.
    pub fn from_settings(source: S, backend: B, settings: &Settings) -> Self {
        Self::new(source, TimetableStore::from_config(backend, &settings.storage)).with_assigner(
            RandomSlotAssigner::new().with_max_attempts(settings.generation.max_attempts),
        )
    }

    /// Replaces the slot assigner.
    pub fn with_assigner(mut self, assigner: RandomSlotAssigner) -> Self {
        self.assigner = assigner;
        self
    }

    /// Persistence gateway.
    pub fn store(&self) -> &TimetableStore<B> {
        &self.store
    }

    /// Generates and stores all three schedules using a fresh thread RNG.
    pub fn generate(&self, department: &Department, faculty: Option<&str>) -> GenerationReport {
        self.generate_with_rng(department, faculty, &mut rand::rng())
    }

    /// Like [`generate`](Self::generate) with a caller-supplied RNG.
    #[instrument(skip(self, department, rng), fields(department = %department))]
    pub fn generate_with_rng<R: Rng>(
        &self,
        department: &Department,
        faculty: Option<&str>,
        rng: &mut R,
    ) -> GenerationReport {
        match self.try_generate(department, faculty, rng) {
            Ok(report) => report,
            Err(TimetableError::Source(e)) => {
                error!(error = %e, "No data loaded; cannot generate timetables");
                GenerationReport::failed(LOAD_ERROR)
            }
            Err(e) => {
                error!(error = %e, faculty = faculty.unwrap_or("all"), "Timetable generation failed");
                GenerationReport::failed(format!("Error: Failed to generate timetable: {e}"))
            }
        }
    }

    /// Runs the pipeline, propagating the first failure.
    pub fn try_generate<R: Rng>(
        &self,
        department: &Department,
        faculty: Option<&str>,
        rng: &mut R,
    ) -> Result<GenerationReport, TimetableError> {
        let data = self.source.load()?;

        let faculty_rows: Vec<FacultyRow> = match faculty {
            Some(name) => data
                .faculty
                .iter()
                .filter(|r| r.is_taught_by(name))
                .cloned()
                .collect(),
            None => filter_rows(&data.faculty, department),
        };
        let courses = filter_rows(&data.courses, department);
        let labs = filter_rows(&data.labs, department);
        info!(
            faculty_rows = faculty_rows.len(),
            courses = courses.len(),
            labs = labs.len(),
            "Rows selected"
        );

        let faculty_constraints = Constraint::for_kind(TimetableKind::Faculty);
        let faculty_schedule = self.assigner.assign(&faculty_rows, faculty, rng);
        let faculty_schedule = self.stages.run(faculty_schedule, &faculty_constraints);
        if faculty_schedule.is_empty() {
            warn!(faculty = faculty.unwrap_or("all"), "Faculty timetable empty");
        }

        let builder = DerivedScheduleBuilder::new(&courses, &labs);

        debug!(constraints = ?Constraint::for_kind(TimetableKind::Class), "Deriving class timetable");
        let class_schedule = validation::check(builder.class_schedule(&faculty_rows, &faculty_schedule));
        if class_schedule.is_empty() {
            warn!("Class timetable empty");
        }

        debug!(constraints = ?Constraint::for_kind(TimetableKind::Lab), "Deriving lab timetable");
        let lab_schedule = validation::check(builder.lab_schedule(&class_schedule));
        if lab_schedule.is_empty() {
            warn!("Lab timetable empty");
        }

        self.store.put(department, &faculty_schedule, faculty)?;
        self.store.put(department, &class_schedule, None)?;
        self.store.put(department, &lab_schedule, None)?;

        info!(
            placed = faculty_schedule.placed_count(),
            class_entries = class_schedule.entry_count(),
            lab_entries = lab_schedule.entry_count(),
            "Timetables generated"
        );

        Ok(GenerationReport {
            faculty_timetable: faculty_schedule,
            class_timetable: class_schedule,
            lab_timetable: lab_schedule,
            diagnostic: NO_SUGGESTIONS.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{CourseRow, Dataset, LabRow};
    use crate::storage::MemoryBlobStore;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                FacultyRow::new("A. Rao", "CS301", "2ND").with_subject("DBMS"),
                FacultyRow::new("A. Rao", "CS302", "2ND").with_subject("OS"),
                FacultyRow::new("B. Iyer", "CS401", "3RD").with_subject("Compilers"),
            ],
            vec![
                CourseRow::new("CS301", "DBMS", "2ND", "1"),
                CourseRow::new("CS302", "OS", "2ND", "1"),
                CourseRow::new("CS401", "Compilers", "3RD", "2"),
            ],
            vec![LabRow::new("L1", "CS301", "2ND")],
        )
    }

    fn generator(data: Dataset) -> TimetableGenerator<Dataset, MemoryBlobStore> {
        TimetableGenerator::new(data, TimetableStore::new(MemoryBlobStore::new()))
    }

    #[derive(Debug)]
    struct FailingStore;

    impl BlobStore for FailingStore {
        fn put(&self, key: &str, _body: &[u8], _content_type: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend {
                key: key.to_string(),
                reason: "access denied".to_string(),
            })
        }

        fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
            Err(StoreError::NotFound(key.to_string()))
        }

        fn list(&self, _prefix: &str) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        fn delete(&self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::NotFound(key.to_string()))
        }
    }

    #[test]
    fn test_department_run_persists_three_schedules() {
        let generator = generator(dataset());
        let dept = Department::new("2nd Year");
        let report = generator.generate_with_rng(&dept, None, &mut SmallRng::seed_from_u64(1));

        assert!(report.is_success());
        assert_eq!(report.faculty_timetable.len(), 1);
        assert_eq!(report.faculty_timetable.placed_count(), 2);
        assert_eq!(report.class_timetable.entry_count(), 2);
        assert_eq!(report.lab_timetable.entry_count(), 1);
        assert_eq!(
            generator.store().list(&dept).unwrap(),
            vec![
                "timetable_generation/2nd Year/class_timetable.json",
                "timetable_generation/2nd Year/faculty_timetable.json",
                "timetable_generation/2nd Year/lab_timetable.json",
            ]
        );
    }

    #[test]
    fn test_faculty_request_ignores_department() {
        let generator = generator(dataset());
        let dept = Department::new("2nd Year");
        let report = generator.generate_with_rng(&dept, Some("b. iyer"), &mut SmallRng::seed_from_u64(2));

        assert!(report.is_success());
        assert_eq!(report.faculty_timetable.grid("b. iyer").unwrap().occupied_count(), 1);
        // Compilers is a 3RD year course, so the 2nd-year class view stays empty.
        assert_eq!(report.class_timetable.entry_count(), 0);
        assert!(generator
            .store()
            .list(&dept)
            .unwrap()
            .contains(&"timetable_generation/2nd Year/faculty_timetable_b__iyer.json".to_string()));
    }

    #[test]
    fn test_load_error() {
        let generator = generator(Dataset::default());
        let report = generator.generate(&Department::default_department(), None);
        assert_eq!(report.diagnostic, LOAD_ERROR);
        assert!(report.faculty_timetable.is_empty());
        assert!(generator.store().backend().is_empty().unwrap());
    }

    #[test]
    fn test_store_failure_surfaces_as_diagnostic() {
        let generator = TimetableGenerator::new(dataset(), TimetableStore::new(FailingStore));
        let report = generator.generate(&Department::default_department(), None);
        assert!(!report.is_success());
        assert!(report
            .diagnostic
            .starts_with("Error: Failed to generate timetable:"));
        assert!(report.class_timetable.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.generation.max_attempts = 0;
        settings.storage.key_prefix = "tt".into();
        let generator = TimetableGenerator::from_settings(dataset(), MemoryBlobStore::new(), &settings);
        let dept = Department::new("2nd Year");
        let report = generator.generate_with_rng(&dept, None, &mut SmallRng::seed_from_u64(3));

        // Zero draws places nothing, so only the faculty grid and empty cohorts are stored.
        assert_eq!(report.faculty_timetable.placed_count(), 0);
        assert!(generator.store().list(&dept).unwrap()[0].starts_with("tt/2nd Year/"));
    }
}
