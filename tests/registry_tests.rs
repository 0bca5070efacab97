mod common;

use std::fs;

use serde_json::json;
use studymate::curriculum::{ProgramRegistry, INDEX_FILE};
use studymate::Error;

fn programs_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("2021")).unwrap();

    let mut doc = common::curriculum_json();
    // year and department come from the index when the document omits them
    doc.as_object_mut().unwrap().remove("academic_year");
    doc.as_object_mut().unwrap().remove("department");
    fs::write(dir.path().join("2021/Cntt-2021.json"), doc.to_string()).unwrap();
    fs::write(dir.path().join("2021/Broken.json"), "{ not json").unwrap();

    let index = json!({
        "2021": [
            {"key": "cntt-2021", "department": "Công nghệ thông tin", "file": "2021/Cntt-2021.json"},
            {"key": "broken-2021", "department": "Ngôn ngữ Anh", "file": "2021/Broken.json"},
            {"key": "escape", "department": "Khác", "file": "../secret.json"}
        ],
        "2022": []
    });
    fs::write(dir.path().join(INDEX_FILE), index.to_string()).unwrap();
    dir
}

#[test]
fn loads_index_and_program() {
    let dir = programs_dir();
    let registry = ProgramRegistry::load(dir.path()).unwrap();
    assert_eq!(registry.years(), vec!["2021".to_string(), "2022".to_string()]);
    assert_eq!(registry.entries("2021").len(), 3);
    assert!(registry.entries("1999").is_empty());

    let entry = registry.resolve("2021", Some("cntt-2021"), None).unwrap();
    let program = registry.load_program("2021", entry).unwrap();
    assert_eq!(program.year, "2021");
    assert_eq!(program.department, "Công nghệ thông tin");
    assert_eq!(program.course_catalog.len(), 11);
}

#[test]
fn department_lookup_tolerates_small_differences() {
    let dir = programs_dir();
    let registry = ProgramRegistry::load(dir.path()).unwrap();

    let exact = registry.resolve("2021", None, Some("Công nghệ thông tin")).unwrap();
    assert_eq!(exact.key, "cntt-2021");

    let typo = registry.resolve("2021", None, Some("Công nghệ thông tín")).unwrap();
    assert_eq!(typo.key, "cntt-2021");

    // three stripped accents fall below the similarity threshold
    assert!(registry.find_by_department("2021", "Cong nghe thong tin").is_none());
    assert!(matches!(registry.resolve("2021", None, Some("Dược học")), Err(Error::UnknownProgram { .. })));
}

#[test]
fn selection_errors() {
    let dir = programs_dir();
    let registry = ProgramRegistry::load(dir.path()).unwrap();
    assert!(matches!(registry.resolve("2021", None, None), Err(Error::MissingCurriculum)));
    assert!(matches!(registry.resolve("2021", Some("nope"), None), Err(Error::UnknownProgram { .. })));

    let broken = registry.find("2021", "broken-2021").unwrap().clone();
    assert!(matches!(registry.load_program("2021", &broken), Err(Error::CurriculumLoad(_))));

    let escape = registry.find("2021", "escape").unwrap().clone();
    assert!(matches!(registry.load_program("2021", &escape), Err(Error::InvalidInput(_))));
}

#[test]
fn missing_index_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(ProgramRegistry::load(dir.path()), Err(Error::CurriculumLoad(_))));
}

#[test]
fn documents_are_reread_on_every_load() {
    let dir = programs_dir();
    let registry = ProgramRegistry::load(dir.path()).unwrap();
    let entry = registry.find("2021", "cntt-2021").unwrap().clone();
    assert_eq!(registry.load_program("2021", &entry).unwrap().course_catalog.len(), 11);

    let smaller = json!({"courses": [{"category": "Bắt buộc", "subjects": [{"code": "A1", "name": "a", "credits": 3}]}]});
    fs::write(dir.path().join("2021/Cntt-2021.json"), smaller.to_string()).unwrap();
    assert_eq!(registry.load_program("2021", &entry).unwrap().course_catalog.len(), 1);
}
