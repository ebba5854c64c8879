//! Integration tests for loading registries from disk and generating the
//! datasets they describe.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use example_data::{RegistryError, SeedRegistry, generate_example_dataset, is_valid_student_name};
use rstest::rstest;

const VALID_JSON: &str = r#"{
    "version": 1,
    "seeds": [
        {"name": "mossy-owl", "seed": 2026, "studentCount": 12, "courseCount": 5},
        {"name": "snowy-penguin", "seed": 1234, "studentCount": 5, "courseCount": 3, "feedbackPerStudent": 1}
    ]
}"#;

fn unique_temp_path(file_name: &str) -> PathBuf {
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir()
        .join("example-data-tests")
        .join(format!("seed-registry-{suffix}-{counter}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir.join(file_name)
}

#[test]
fn loads_registry_from_file() {
    let path = unique_temp_path("seeds.json");
    fs::write(&path, VALID_JSON).expect("write registry");

    let registry = SeedRegistry::from_file(&path).expect("load registry");

    assert_eq!(registry, SeedRegistry::from_json(VALID_JSON).expect("parse"));
    if let Some(parent) = path.parent() {
        #[expect(
            clippy::let_underscore_must_use,
            reason = "explicitly ignore cleanup failures in test teardown"
        )]
        let _ = fs::remove_dir_all(parent);
    }
}

#[test]
fn missing_file_reports_its_path() {
    let path = unique_temp_path("absent.json");

    let result = SeedRegistry::from_file(&path);

    assert!(matches!(
        result,
        Err(RegistryError::IoError { path: reported, .. }) if reported == path
    ));
}

#[rstest]
#[case("mossy-owl", 12, 5)]
#[case("snowy-penguin", 5, 3)]
fn seeds_generate_their_declared_shape(
    #[case] name: &str,
    #[case] students: usize,
    #[case] courses: usize,
) {
    let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");
    let seed = registry.find_seed(name).expect("seed found");

    let dataset = generate_example_dataset(seed).expect("generated");

    assert_eq!(dataset.students.len(), students);
    assert_eq!(dataset.courses.len(), courses);
    assert!(dataset.students.iter().all(|s| is_valid_student_name(&s.name)));
}

#[test]
fn feedback_per_student_bounds_each_author() {
    let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");
    let seed = registry.find_seed("snowy-penguin").expect("seed found");

    let dataset = generate_example_dataset(seed).expect("generated");
    let authors: HashSet<_> = dataset.feedback.iter().map(|f| f.student_id).collect();

    assert_eq!(authors.len(), dataset.feedback.len());
}

#[test]
fn student_count_override_changes_only_the_roster() {
    let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");
    let seed = registry
        .find_seed("mossy-owl")
        .expect("seed found")
        .clone()
        .with_student_count(2);

    let dataset = generate_example_dataset(&seed).expect("generated");

    assert_eq!(dataset.students.len(), 2);
    assert_eq!(dataset.courses.len(), 5);
}
