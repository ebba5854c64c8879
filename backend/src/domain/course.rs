//! Courses offered for feedback.
//!
//! [`CourseDraft`] and [`CoursePatch`] are the raw inputs accepted from
//! callers. Validation turns them into [`NewCourse`] and [`CourseChanges`],
//! which can only hold values that satisfy the course rules.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldErrors, FieldViolation, trimmed_len};
use super::{CourseId, CourseStats};

/// Lower bound on a course name, in characters after trimming.
pub const COURSE_NAME_MIN: usize = 2;
/// Upper bound on a course name.
pub const COURSE_NAME_MAX: usize = 100;
/// Lower bound on a course code.
pub const COURSE_CODE_MIN: usize = 2;
/// Upper bound on a course code.
pub const COURSE_CODE_MAX: usize = 20;
/// Upper bound on a description.
pub const DESCRIPTION_MAX: usize = 500;
/// Upper bound on an instructor name.
pub const INSTRUCTOR_MAX: usize = 100;

/// Validation failures for course fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseValidationError {
    NameLength,
    CodeLength,
    CodeCharacters,
    DescriptionTooLong,
    InstructorTooLong,
    CreditsOutOfRange,
    /// Raised under [`CodeEditPolicy::Immutable`] when a patch changes the code.
    CodeImmutable,
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameLength => write!(
                f,
                "Course name must be between {COURSE_NAME_MIN} and {COURSE_NAME_MAX} characters"
            ),
            Self::CodeLength => write!(
                f,
                "Course code must be between {COURSE_CODE_MIN} and {COURSE_CODE_MAX} characters"
            ),
            Self::CodeCharacters => write!(
                f,
                "Course code must contain only uppercase letters and numbers"
            ),
            Self::DescriptionTooLong => {
                write!(f, "Description cannot exceed {DESCRIPTION_MAX} characters")
            }
            Self::InstructorTooLong => {
                write!(f, "Instructor name cannot exceed {INSTRUCTOR_MAX} characters")
            }
            Self::CreditsOutOfRange => write!(f, "Credits must be between 1 and 10"),
            Self::CodeImmutable => write!(f, "Course code cannot be changed"),
        }
    }
}

impl std::error::Error for CourseValidationError {}

impl FieldViolation for CourseValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::NameLength => "name",
            Self::CodeLength | Self::CodeCharacters | Self::CodeImmutable => "code",
            Self::DescriptionTooLong => "description",
            Self::InstructorTooLong => "instructor",
            Self::CreditsOutOfRange => "credits",
        }
    }
}

/// Unique, trimmed course name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CourseName(String);

impl CourseName {
    /// Validate and trim a course name.
    pub fn new(raw: &str) -> Result<Self, CourseValidationError> {
        let len = trimmed_len(raw);
        if !(COURSE_NAME_MIN..=COURSE_NAME_MAX).contains(&len) {
            return Err(CourseValidationError::NameLength);
        }
        Ok(Self(raw.trim().to_owned()))
    }
}

impl AsRef<str> for CourseName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Unique, upper-cased alphanumeric course code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CourseCode(String);

impl CourseCode {
    /// Trim, upper-case and validate a code.
    ///
    /// # Examples
    /// ```
    /// use course_feedback::domain::CourseCode;
    ///
    /// assert_eq!(CourseCode::new(" cs101 ").unwrap().as_ref(), "CS101");
    /// assert!(CourseCode::new("CS-101").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, CourseValidationError> {
        let code = raw.trim().to_uppercase();
        let len = code.chars().count();
        if !(COURSE_CODE_MIN..=COURSE_CODE_MAX).contains(&len) {
            return Err(CourseValidationError::CodeLength);
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(CourseValidationError::CodeCharacters);
        }
        Ok(Self(code))
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Credit weighting between 1 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Credits(u8);

impl Credits {
    /// Validate a credit count.
    pub fn new(raw: i64) -> Result<Self, CourseValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (1..=10).contains(value))
            .map(Self)
            .ok_or(CourseValidationError::CreditsOutOfRange)
    }

    /// Numeric value.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Whether course codes may change after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeEditPolicy {
    /// Codes may be edited, subject to uniqueness.
    #[default]
    Mutable,
    /// Codes are fixed once a course exists.
    Immutable,
}

/// A stored course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[schema(value_type = String, example = "Data Structures")]
    pub name: CourseName,
    #[schema(value_type = String, example = "CS201")]
    pub code: CourseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<u8>, example = 4)]
    pub credits: Option<Credits>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A course together with statistics that only administrators receive.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub course: Course,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CourseStats>,
}

fn optional_text(
    raw: Option<&str>,
    max: usize,
    violation: CourseValidationError,
) -> Result<Option<String>, CourseValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(violation),
        Some(text) => Ok(Some(text.to_owned())),
    }
}

/// Raw input for creating a course.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    #[schema(example = "Data Structures")]
    pub name: String,
    #[schema(example = "cs201")]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub credits: Option<i64>,
}

/// A validated course awaiting an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: CourseName,
    pub code: CourseCode,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub credits: Option<Credits>,
}

impl CourseDraft {
    /// Validate every field, reporting all failures together.
    pub fn validate(&self) -> Result<NewCourse, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.capture(CourseName::new(&self.name));
        let code = errors.capture(CourseCode::new(&self.code));
        let description = errors.capture(optional_text(
            self.description.as_deref(),
            DESCRIPTION_MAX,
            CourseValidationError::DescriptionTooLong,
        ));
        let instructor = errors.capture(optional_text(
            self.instructor.as_deref(),
            INSTRUCTOR_MAX,
            CourseValidationError::InstructorTooLong,
        ));
        let credits = errors.capture(self.credits.map(Credits::new).transpose());

        match (name, code, description, instructor, credits) {
            (Some(name), Some(code), Some(description), Some(instructor), Some(credits))
                if errors.is_empty() =>
            {
                Ok(NewCourse {
                    name,
                    code,
                    description,
                    instructor,
                    credits,
                })
            }
            _ => Err(errors),
        }
    }
}

impl NewCourse {
    /// Materialise an active course.
    pub fn into_course(self, id: CourseId, created_at: DateTime<Utc>) -> Course {
        Course {
            id,
            name: self.name,
            code: self.code,
            description: self.description,
            instructor: self.instructor,
            credits: self.credits,
            is_active: true,
            created_at,
        }
    }
}

/// Raw partial update for a course. Absent fields are left untouched; an
/// empty description or instructor clears it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub credits: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseChanges {
    pub name: Option<CourseName>,
    pub code: Option<CourseCode>,
    pub description: Option<Option<String>>,
    pub instructor: Option<Option<String>>,
    pub credits: Option<Credits>,
    pub is_active: Option<bool>,
}

impl CoursePatch {
    /// Validate the provided fields.
    pub fn validate(&self) -> Result<CourseChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.capture(self.name.as_deref().map(CourseName::new).transpose());
        let code = errors.capture(self.code.as_deref().map(CourseCode::new).transpose());
        let description = errors.capture(
            self.description
                .as_deref()
                .map(|text| {
                    optional_text(
                        Some(text),
                        DESCRIPTION_MAX,
                        CourseValidationError::DescriptionTooLong,
                    )
                })
                .transpose(),
        );
        let instructor = errors.capture(
            self.instructor
                .as_deref()
                .map(|text| {
                    optional_text(
                        Some(text),
                        INSTRUCTOR_MAX,
                        CourseValidationError::InstructorTooLong,
                    )
                })
                .transpose(),
        );
        let credits = errors.capture(self.credits.map(Credits::new).transpose());

        match (name, code, description, instructor, credits) {
            (Some(name), Some(code), Some(description), Some(instructor), Some(credits))
                if errors.is_empty() =>
            {
                Ok(CourseChanges {
                    name,
                    code,
                    description,
                    instructor,
                    credits,
                    is_active: self.is_active,
                })
            }
            _ => Err(errors),
        }
    }
}

impl CourseChanges {
    /// Reject a code change when codes are immutable.
    pub fn check_code_policy(
        &self,
        current: &Course,
        policy: CodeEditPolicy,
    ) -> Result<(), CourseValidationError> {
        match (&self.code, policy) {
            (Some(code), CodeEditPolicy::Immutable) if *code != current.code => {
                Err(CourseValidationError::CodeImmutable)
            }
            _ => Ok(()),
        }
    }

    /// Apply the changes in place.
    pub fn apply(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(code) = self.code {
            course.code = code;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
        if let Some(instructor) = self.instructor {
            course.instructor = instructor;
        }
        if let Some(credits) = self.credits {
            course.credits = Some(credits);
        }
        if let Some(is_active) = self.is_active {
            course.is_active = is_active;
        }
    }
}
