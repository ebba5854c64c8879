//! Generated dataset records.
//!
//! These types stay independent of the backend's domain types; the backend
//! converts them at the point of use. Times are expressed as whole days
//! before "now" so the dataset does not depend on when it was generated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated student account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleStudentSeed {
    /// Stable identifier.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Lower-case, unique email address.
    pub email: String,
    /// Ten-digit phone number, when the student provided one.
    pub phone: Option<String>,
    /// Days between registration and now.
    pub joined_days_ago: u32,
    /// Whether an administrator has blocked the account.
    pub is_blocked: bool,
}

/// A generated course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleCourseSeed {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique course name.
    pub name: String,
    /// Unique upper-case code.
    pub code: String,
    /// Short description.
    pub description: String,
    /// Instructor's display name.
    pub instructor: String,
    /// Credit weighting.
    pub credits: u8,
    /// Days between creation and now.
    pub created_days_ago: u32,
}

/// A generated feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleFeedbackSeed {
    /// Stable identifier.
    pub id: Uuid,
    /// Author; always one of the dataset's students.
    pub student_id: Uuid,
    /// Rated course; always one of the dataset's courses.
    pub course_id: Uuid,
    /// Rating from 1 to 5.
    pub rating: u8,
    /// Review text.
    pub message: String,
    /// Days between submission and now; never earlier than the author joined.
    pub submitted_days_ago: u32,
}

/// Everything one seed produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleDataset {
    /// Student accounts.
    pub students: Vec<ExampleStudentSeed>,
    /// Courses drawn from the built-in catalogue.
    pub courses: Vec<ExampleCourseSeed>,
    /// Submissions; at most one per student and course.
    pub feedback: Vec<ExampleFeedbackSeed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_seed_serializes_to_camel_case() {
        let feedback = ExampleFeedbackSeed {
            id: Uuid::nil(),
            student_id: Uuid::nil(),
            course_id: Uuid::nil(),
            rating: 4,
            message: "Well structured labs.".to_owned(),
            submitted_days_ago: 3,
        };
        let json = serde_json::to_string(&feedback).expect("serialize");
        assert!(json.contains("studentId"));
        assert!(json.contains("courseId"));
        assert!(json.contains("submittedDaysAgo"));
    }
}
