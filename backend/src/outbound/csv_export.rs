//! CSV adapter for the `FeedbackExporter` port.

use crate::domain::ports::{FeedbackExportError, FeedbackExportRow, FeedbackExporter};

const HEADER: [&str; 8] = [
    "Student Name",
    "Student Email",
    "Course Name",
    "Course Code",
    "Instructor",
    "Rating",
    "Message",
    "Submitted Date",
];

/// Renders feedback rows as RFC 4180 CSV with a header line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFeedbackExporter;

impl FeedbackExporter for CsvFeedbackExporter {
    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, rows: &[FeedbackExportRow]) -> Result<Vec<u8>, FeedbackExportError> {
        let fail = |err: csv::Error| FeedbackExportError::render(err.to_string());
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER).map_err(fail)?;
        for row in rows {
            let rating = row.rating.to_string();
            let submitted = row.submitted.format("%Y-%m-%d").to_string();
            writer
                .write_record([
                    row.student_name.as_str(),
                    row.student_email.as_str(),
                    row.course_name.as_str(),
                    row.course_code.as_str(),
                    row.instructor.as_deref().unwrap_or("N/A"),
                    rating.as_str(),
                    row.message.as_str(),
                    submitted.as_str(),
                ])
                .map_err(fail)?;
        }
        writer
            .into_inner()
            .map_err(|err| FeedbackExportError::render(err.to_string()))
    }
}
