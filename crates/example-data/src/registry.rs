//! Seed registry types and JSON parsing.
//!
//! A registry names reproducible datasets. Each seed fixes the RNG seed and
//! the dataset's shape, so the same name always yields the same students,
//! courses and feedback.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalogue::COURSE_CATALOGUE;
use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// Submissions per student when a seed does not say.
const DEFAULT_FEEDBACK_PER_STUDENT: usize = 3;

/// A parsed seed registry.
///
/// # Example
///
/// ```
/// use example_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "seeds": [{"name": "test", "seed": 42, "studentCount": 5, "courseCount": 3}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the JSON is malformed, the version is
    /// unsupported, there are no seeds, or a seed's course count cannot be
    /// served from the built-in catalogue.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }
        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(SeedDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: raw.version,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named recipe for one deterministic dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    student_count: usize,
    course_count: usize,
    feedback_per_student: usize,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of students to generate.
    #[must_use]
    pub const fn student_count(&self) -> usize {
        self.student_count
    }

    /// Number of catalogue courses to include.
    #[must_use]
    pub const fn course_count(&self) -> usize {
        self.course_count
    }

    /// Upper bound on submissions per student; never exceeds the course count.
    #[must_use]
    pub fn feedback_per_student(&self) -> usize {
        self.feedback_per_student.min(self.course_count)
    }

    /// Replace the student count, as an operator override would.
    #[must_use]
    pub fn with_student_count(mut self, student_count: usize) -> Self {
        self.student_count = student_count;
        self
    }
}

impl TryFrom<RawSeedDefinition> for SeedDefinition {
    type Error = RegistryError;

    fn try_from(raw: RawSeedDefinition) -> Result<Self, Self::Error> {
        let available = COURSE_CATALOGUE.len();
        if !(1..=available).contains(&raw.course_count) {
            return Err(RegistryError::CourseCountOutOfRange {
                name: raw.name,
                requested: raw.course_count,
                available,
            });
        }
        Ok(Self {
            name: raw.name,
            seed: raw.seed,
            student_count: raw.student_count,
            course_count: raw.course_count,
            feedback_per_student: raw
                .feedback_per_student
                .unwrap_or(DEFAULT_FEEDBACK_PER_STUDENT),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    seeds: Vec<RawSeedDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    student_count: usize,
    course_count: usize,
    feedback_per_student: Option<usize>,
}
