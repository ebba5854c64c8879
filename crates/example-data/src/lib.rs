//! Deterministic example data for the course feedback service.
//!
//! The crate turns a named seed from a JSON registry into a reproducible
//! dataset of students, courses and feedback that satisfies the backend's
//! validation rules and relational constraints. It does not depend on the
//! backend's domain types; the backend converts the records when seeding.
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_dataset};
//!
//! let json = r#"{
//!     "version": 1,
//!     "seeds": [{"name": "demo", "seed": 2026, "studentCount": 8, "courseCount": 5}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("demo").expect("seed exists");
//! let dataset = generate_example_dataset(seed_def).expect("generation succeeds");
//!
//! assert_eq!(dataset.students.len(), 8);
//! assert_eq!(dataset.courses.len(), 5);
//! ```

mod catalogue;
mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use catalogue::{COURSE_CATALOGUE, CatalogueEntry};
pub use error::{GenerationError, RegistryError};
pub use generator::generate_example_dataset;
pub use registry::{SeedDefinition, SeedRegistry};
pub use seed::{ExampleCourseSeed, ExampleDataset, ExampleFeedbackSeed, ExampleStudentSeed};
pub use validation::{STUDENT_NAME_MAX, STUDENT_NAME_MIN, is_valid_student_name};
