//! Tabular export port for feedback listings.

use chrono::NaiveDate;

use crate::domain::FeedbackView;

use super::define_port_error;

define_port_error! {
    /// Errors raised by export adapters.
    pub enum FeedbackExportError {
        /// Rendering the document failed.
        Render { message: String } => "feedback export failed: {message}",
    }
}

/// One exported row, already flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackExportRow {
    pub student_name: String,
    pub student_email: String,
    pub course_name: String,
    pub course_code: String,
    pub instructor: Option<String>,
    pub rating: u8,
    pub message: String,
    pub submitted: NaiveDate,
}

impl From<&FeedbackView> for FeedbackExportRow {
    fn from(view: &FeedbackView) -> Self {
        Self {
            student_name: view.student.name.clone(),
            student_email: view.student.email.clone(),
            course_name: view.course.name.clone(),
            course_code: view.course.code.clone(),
            instructor: view.course.instructor.clone(),
            rating: view.rating,
            message: view.message.clone(),
            submitted: view.created_at.date_naive(),
        }
    }
}

/// Renders feedback rows into a downloadable document.
#[cfg_attr(test, mockall::automock)]
pub trait FeedbackExporter: Send + Sync {
    /// MIME type of the rendered document.
    fn content_type(&self) -> &'static str;

    /// File extension of the rendered document, without the dot.
    fn extension(&self) -> &'static str;

    /// Render rows in the given order.
    fn render(&self, rows: &[FeedbackExportRow]) -> Result<Vec<u8>, FeedbackExportError>;
}
