//! Error types for registry parsing and dataset generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or querying a seed registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// A seed asks for more courses than the catalogue offers, or none.
    #[error("seed '{name}' requests {requested} courses; between 1 and {available} are available")]
    CourseCountOutOfRange {
        /// Seed name.
        name: String,
        /// Requested course count.
        requested: usize,
        /// Size of the built-in catalogue.
        available: usize,
    },

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors raised while generating a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No valid student name came out of the faker within the retry budget.
    #[error("failed to generate valid student name after {max_attempts} attempts")]
    StudentNameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_io_formats_correctly() {
        let err = RegistryError::IoError {
            path: PathBuf::from("/tmp/seeds.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read registry file at '/tmp/seeds.json': file not found"
        );
    }

    #[test]
    fn registry_error_course_count_formats_correctly() {
        let err = RegistryError::CourseCountOutOfRange {
            name: "campus".to_owned(),
            requested: 40,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "seed 'campus' requests 40 courses; between 1 and 10 are available"
        );
    }

    #[test]
    fn registry_error_seed_not_found_formats_correctly() {
        let err = RegistryError::SeedNotFound {
            name: "mossy-owl".to_owned(),
        };
        assert_eq!(err.to_string(), "seed 'mossy-owl' not found in registry");
    }

    #[test]
    fn generation_error_formats_correctly() {
        let err = GenerationError::StudentNameGenerationFailed { max_attempts: 100 };
        assert_eq!(
            err.to_string(),
            "failed to generate valid student name after 100 attempts"
        );
    }
}
