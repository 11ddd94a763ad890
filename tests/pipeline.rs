//! End-to-end generation scenarios.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use u_timetable::generator::{LOAD_ERROR, NO_SUGGESTIONS};
use u_timetable::models::{
    ClassSchedule, CourseRow, Dataset, FacultyRow, FacultySchedule, LabRow, LabSchedule, Timetable,
    SLOTS_PER_GRID,
};
use u_timetable::source::JsonWorkbookSource;
use u_timetable::storage::{FsBlobStore, MemoryBlobStore, TimetableStore};
use u_timetable::{Department, TimetableGenerator};

fn rao_dataset() -> Dataset {
    Dataset::new(
        vec![
            FacultyRow::new("A. Rao", "CS301", "2ND").with_subject("DBMS"),
            FacultyRow::new("A. Rao", "CS302", "2ND").with_subject("OS"),
        ],
        vec![
            CourseRow::new("CS301", "DBMS", "2ND", "1"),
            CourseRow::new("CS302", "OS", "2ND", "1"),
        ],
        vec![LabRow::new("L1", "CS301", "2ND")],
    )
}

fn memory_generator(data: Dataset) -> TimetableGenerator<Dataset, MemoryBlobStore> {
    TimetableGenerator::new(data, TimetableStore::new(MemoryBlobStore::new()))
}

#[test]
fn rao_gets_exactly_two_slots() {
    let generator = memory_generator(rao_dataset());
    let report = generator.generate_with_rng(&Department::new("2nd Year"), None, &mut SmallRng::seed_from_u64(2024));

    assert_eq!(report.diagnostic, NO_SUGGESTIONS);
    let grid = report.faculty_timetable.grid("A. Rao").expect("A. Rao scheduled");
    let mut texts: Vec<&str> = grid.occupied().map(|(_, t)| t).collect();
    texts.sort();
    assert_eq!(texts, vec!["DBMS (CS301)", "OS (CS302)"]);
    assert_eq!(grid.free_count(), SLOTS_PER_GRID - 2);
}

#[test]
fn other_department_is_empty_not_an_error() {
    let generator = memory_generator(rao_dataset());
    let report = generator.generate_with_rng(&Department::new("3rd Year"), None, &mut SmallRng::seed_from_u64(1));

    assert_eq!(report.diagnostic, NO_SUGGESTIONS);
    assert!(report.faculty_timetable.is_empty());
    assert!(report.class_timetable.is_empty());
    assert!(report.lab_timetable.is_empty());
    // Empty payloads are never written.
    assert!(generator.store().backend().is_empty().unwrap());
}

#[test]
fn lab_mirrors_class_slot() {
    let generator = memory_generator(rao_dataset());
    let report = generator.generate_with_rng(&Department::new("2nd Year"), None, &mut SmallRng::seed_from_u64(99));

    let grid = report.faculty_timetable.grid("A. Rao").unwrap();
    let (dbms_slot, dbms_text) = grid
        .occupied()
        .find(|(_, t)| t.contains("DBMS"))
        .expect("DBMS placed");

    let cohort = report.class_timetable.cohort("2ND", "1").unwrap();
    assert_eq!(cohort.get(&dbms_slot.key()).map(String::as_str), Some(dbms_text));

    let lab = report.lab_timetable.lab("L1").unwrap();
    assert_eq!(lab.len(), 1);
    assert_eq!(lab.get(&dbms_slot.key()).map(String::as_str), Some(dbms_text));
}

#[test]
fn class_entries_trace_back_to_faculty_grids() {
    let data = Dataset::new(
        vec![
            FacultyRow::new("A. Rao", "CS301", "2ND").with_subject("DBMS"),
            FacultyRow::new("C. Das", "CS301", "2ND").with_subject("DBMS"),
            FacultyRow::new("C. Das", "CS303", "2ND").with_subject("Networks"),
            FacultyRow::new("B. Iyer", "CS401", "3RD").with_subject("Compilers"),
        ],
        vec![
            CourseRow::new("CS301", "DBMS", "2ND", "1"),
            CourseRow::new("CS303", "Networks", "2ND", "2"),
            CourseRow::new("CS401", "Compilers", "3RD", "1"),
        ],
        vec![LabRow::new("L1", "CS303", "2ND")],
    );
    let generator = memory_generator(data.clone());
    let report = generator.generate_with_rng(&Department::default_department(), None, &mut SmallRng::seed_from_u64(5));

    for (year, semester, entries) in report.class_timetable.iter() {
        for (slot_key, text) in entries {
            let course = data
                .courses
                .iter()
                .find(|c| c.year == year && c.semester == semester && text.contains(&c.course_name))
                .expect("entry belongs to a known course");
            let traced = data
                .faculty
                .iter()
                .filter(|r| r.course_code == course.course_code)
                .filter_map(|r| report.faculty_timetable.grid_for(&r.faculty_name))
                .any(|grid| grid.occupied().any(|(slot, t)| slot.key() == *slot_key && t == text));
            assert!(traced, "{slot_key} = {text} has no faculty source");
        }
    }
}

#[test]
fn per_faculty_request_uses_faculty_key() {
    let generator = memory_generator(rao_dataset());
    let dept = Department::new("3rd Year");
    let report = generator.generate_with_rng(&dept, Some("A. RAO"), &mut SmallRng::seed_from_u64(8));

    // Department filtering does not apply to the faculty grid.
    assert_eq!(report.faculty_timetable.placed_count(), 2);
    let stored: FacultySchedule = generator.store().get(&dept, Some("A. RAO")).unwrap();
    assert_eq!(stored, report.faculty_timetable);
    let shared: FacultySchedule = generator.store().get(&dept, None).unwrap();
    assert!(shared.is_empty());
}

#[test]
fn unknown_faculty_gets_blank_grid() {
    let generator = memory_generator(rao_dataset());
    let report = generator.generate_with_rng(&Department::default_department(), Some("Nobody"), &mut SmallRng::seed_from_u64(3));

    assert_eq!(report.diagnostic, NO_SUGGESTIONS);
    assert!(report.faculty_timetable.grid("Nobody").unwrap().is_blank());
}

#[test]
fn missing_sheet_reports_load_error() {
    let data = Dataset::new(rao_dataset().faculty, rao_dataset().courses, Vec::new());
    let generator = memory_generator(data);
    let report = generator.generate(&Department::default_department(), None);

    assert_eq!(report.diagnostic, LOAD_ERROR);
    assert!(report.faculty_timetable.is_empty());
    assert!(generator.store().backend().is_empty().unwrap());
}

#[test]
fn workbook_to_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = dir.path().join("timetable_data.json");
    std::fs::write(
        &workbook,
        r#"{
            "Sheet1": [
                {"Faculty_Name": "A. Rao", "Course_Code": "CS301", "Subject": "", "Year": "2ND"},
                {"Faculty_Name": "A. Rao", "Course_Code": "CS302", "Subject": "OS", "Year": "2ND"}
            ],
            "Sheet2": [
                {"Course_Code": "CS301", "Course_Name": "DBMS", "Year": "2ND", "Semester": 1},
                {"Course_Code": "CS302", "Course_Name": "OS", "Year": "2ND", "Semester": 1}
            ],
            "Sheet3": [
                {"Lab_Name": "L1", "Course_Code": "CS301", "Type": "Lab", "Year": "2ND", "Capacity": 30}
            ]
        }"#,
    )
    .unwrap();

    let store = TimetableStore::new(FsBlobStore::new(dir.path().join("blobs")));
    let generator = TimetableGenerator::new(JsonWorkbookSource::new(&workbook), store);
    let dept = Department::new("2nd Year");
    let report = generator.generate_with_rng(&dept, None, &mut SmallRng::seed_from_u64(12));
    assert_eq!(report.diagnostic, NO_SUGGESTIONS);

    let faculty: FacultySchedule = generator.store().get(&dept, None).unwrap();
    let class: ClassSchedule = generator.store().get(&dept, None).unwrap();
    let lab: LabSchedule = generator.store().get(&dept, None).unwrap();
    assert_eq!(faculty, report.faculty_timetable);
    assert_eq!(class, report.class_timetable);
    assert_eq!(lab, report.lab_timetable);
    assert!(dir
        .path()
        .join("blobs/timetable_generation/2nd Year/faculty_timetable.json")
        .is_file());
}
