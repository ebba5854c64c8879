//! Feedback submissions and their joined read views.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldErrors, FieldViolation, trimmed_len};
use super::{Course, CourseId, FeedbackId, User, UserId};

/// Shortest accepted message, in characters after trimming.
pub const MESSAGE_MIN: usize = 10;
/// Longest accepted message.
pub const MESSAGE_MAX: usize = 1000;

/// Validation failures for feedback fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackValidationError {
    RatingOutOfRange,
    MessageLength,
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange => write!(f, "Rating must be between 1 and 5"),
            Self::MessageLength => write!(
                f,
                "Feedback message must be between {MESSAGE_MIN} and {MESSAGE_MAX} characters"
            ),
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

impl FieldViolation for FeedbackValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::RatingOutOfRange => "rating",
            Self::MessageLength => "message",
        }
    }
}

/// Star rating from 1 to 5.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Validate a rating.
    ///
    /// # Examples
    /// ```
    /// use course_feedback::domain::Rating;
    ///
    /// assert_eq!(Rating::new(4).unwrap().get(), 4);
    /// assert!(Rating::new(6).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, FeedbackValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (1..=5).contains(value))
            .map(Self)
            .ok_or(FeedbackValidationError::RatingOutOfRange)
    }

    /// Numeric value.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Trimmed feedback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FeedbackMessage(String);

impl FeedbackMessage {
    /// Trim and length-check a message.
    pub fn new(raw: &str) -> Result<Self, FeedbackValidationError> {
        let len = trimmed_len(raw);
        if !(MESSAGE_MIN..=MESSAGE_MAX).contains(&len) {
            return Err(FeedbackValidationError::MessageLength);
        }
        Ok(Self(raw.trim().to_owned()))
    }
}

impl AsRef<str> for FeedbackMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub student_id: UserId,
    pub course_id: CourseId,
    #[schema(value_type = u8, example = 5)]
    pub rating: Rating,
    #[schema(value_type = String, example = "Clear lectures and fair assignments.")]
    pub message: FeedbackMessage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw input for submitting feedback.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDraft {
    pub course_id: CourseId,
    #[schema(example = 5)]
    pub rating: i64,
    #[schema(example = "Clear lectures and fair assignments.")]
    pub message: String,
}

/// Validated submission awaiting an id and an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub course_id: CourseId,
    pub rating: Rating,
    pub message: FeedbackMessage,
}

impl FeedbackDraft {
    /// Validate rating and message together.
    pub fn validate(&self) -> Result<NewFeedback, FieldErrors> {
        let mut errors = FieldErrors::new();
        let rating = errors.capture(Rating::new(self.rating));
        let message = errors.capture(FeedbackMessage::new(&self.message));
        match (rating, message) {
            (Some(rating), Some(message)) if errors.is_empty() => Ok(NewFeedback {
                course_id: self.course_id,
                rating,
                message,
            }),
            _ => Err(errors),
        }
    }
}

impl NewFeedback {
    /// Materialise a submission authored by `student_id`.
    pub fn into_feedback(self, student_id: UserId, now: DateTime<Utc>) -> Feedback {
        Feedback {
            id: FeedbackId::random(),
            student_id,
            course_id: self.course_id,
            rating: self.rating,
            message: self.message,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw partial update for a submission.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPatch {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackChanges {
    pub rating: Option<Rating>,
    pub message: Option<FeedbackMessage>,
}

impl FeedbackPatch {
    /// Validate the provided fields.
    pub fn validate(&self) -> Result<FeedbackChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let rating = errors.capture(self.rating.map(Rating::new).transpose());
        let message = errors.capture(self.message.as_deref().map(FeedbackMessage::new).transpose());
        match (rating, message) {
            (Some(rating), Some(message)) if errors.is_empty() => {
                Ok(FeedbackChanges { rating, message })
            }
            _ => Err(errors),
        }
    }
}

impl FeedbackChanges {
    /// Apply the changes and bump `updated_at`.
    pub fn apply(self, feedback: &mut Feedback, now: DateTime<Utc>) {
        if let Some(rating) = self.rating {
            feedback.rating = rating;
        }
        if let Some(message) = self.message {
            feedback.message = message;
        }
        feedback.updated_at = now;
    }
}

/// Filters accepted by feedback listings and exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub course_id: Option<CourseId>,
    pub rating: Option<Rating>,
    pub student_id: Option<UserId>,
}

impl FeedbackFilter {
    /// Whether `feedback` satisfies every provided criterion.
    pub fn matches(&self, feedback: &Feedback) -> bool {
        self.course_id.is_none_or(|id| feedback.course_id == id)
            && self.rating.is_none_or(|rating| feedback.rating == rating)
            && self.student_id.is_none_or(|id| feedback.student_id == id)
    }
}

/// Student fields joined onto feedback listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl From<&User> for StudentRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            profile_picture_url: user.profile_picture_url.clone(),
        }
    }
}

/// Course fields joined onto feedback listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u8>,
}

impl From<&Course> for CourseRef {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.as_ref().to_owned(),
            code: course.code.as_ref().to_owned(),
            instructor: course.instructor.clone(),
            credits: course.credits.map(|c| c.get()),
        }
    }
}

/// Feedback joined with its author and course, as listed to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub id: FeedbackId,
    pub rating: u8,
    pub message: String,
    pub student: StudentRef,
    pub course: CourseRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedbackView {
    /// Join a submission with resolved references.
    pub fn new(feedback: &Feedback, student: &User, course: &Course) -> Self {
        Self {
            id: feedback.id,
            rating: feedback.rating.get(),
            message: feedback.message.as_ref().to_owned(),
            student: StudentRef::from(student),
            course: CourseRef::from(course),
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        }
    }
}

/// Feedback joined with its course, as shown to its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithCourse {
    pub id: FeedbackId,
    pub rating: u8,
    pub message: String,
    pub course: CourseRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedbackWithCourse {
    /// Join a submission with its course.
    pub fn new(feedback: &Feedback, course: &Course) -> Self {
        Self {
            id: feedback.id,
            rating: feedback.rating.get(),
            message: feedback.message.as_ref().to_owned(),
            course: CourseRef::from(course),
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        }
    }
}
