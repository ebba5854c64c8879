//! Query-string parsing shared by the listing handlers.
//!
//! Query values arrive as strings so a malformed filter can be reported on
//! its own field, using the same `details.fields` shape as body validation.

use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::ports::StudentFilter;
use crate::domain::{CourseId, Error, FeedbackFilter, Rating, UserId};

/// Newtype wrapper for query parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

const COURSE: FieldName = FieldName::new("course");
const RATING: FieldName = FieldName::new("rating");
const STUDENT: FieldName = FieldName::new("student");
const BLOCKED: FieldName = FieldName::new("blocked");

pub(crate) fn invalid_field(field: FieldName, message: &str) -> Error {
    Error::invalid_request(message.to_owned())
        .with_details(json!({ "fields": { field.as_str(): message } }))
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_uuid_field<T: std::str::FromStr>(
    raw: Option<&str>,
    field: FieldName,
    message: &str,
) -> Result<Option<T>, Error> {
    non_blank(raw)
        .map(|value| value.parse::<T>().map_err(|_| invalid_field(field, message)))
        .transpose()
}

/// `page` and `limit` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Page size, capped by configuration.
    pub limit: Option<u32>,
}

/// Filters accepted by the admin feedback listing and export.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedbackFilterQuery {
    /// Course id to restrict to.
    pub course: Option<String>,
    /// Exact star rating (1 to 5).
    pub rating: Option<String>,
    /// Student id to restrict to.
    pub student: Option<String>,
}

impl FeedbackFilterQuery {
    /// Parse into a domain filter; blank values are ignored.
    pub(crate) fn parse(&self) -> Result<FeedbackFilter, Error> {
        let course_id =
            parse_uuid_field::<CourseId>(self.course.as_deref(), COURSE, "Invalid course id")?;
        let student_id =
            parse_uuid_field::<UserId>(self.student.as_deref(), STUDENT, "Invalid student id")?;
        let rating = non_blank(self.rating.as_deref())
            .map(|value| {
                value
                    .parse::<i64>()
                    .ok()
                    .and_then(|number| Rating::new(number).ok())
                    .ok_or_else(|| invalid_field(RATING, "Rating must be between 1 and 5"))
            })
            .transpose()?;
        Ok(FeedbackFilter {
            course_id,
            rating,
            student_id,
        })
    }
}

/// Filters accepted by the admin student listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterQuery {
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
    /// `true` for blocked accounts only, `false` for active ones.
    pub blocked: Option<String>,
}

impl StudentFilterQuery {
    pub(crate) fn parse(&self) -> Result<StudentFilter, Error> {
        let blocked = match non_blank(self.blocked.as_deref()) {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => return Err(invalid_field(BLOCKED, "blocked must be true or false")),
        };
        Ok(StudentFilter {
            search: self.search.clone(),
            blocked,
        })
    }
}

/// Window for the analytics report.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// Trailing window in days (default 30).
    pub period: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn field_message(error: &Error, field: &str) -> Option<String> {
        error
            .details()
            .and_then(|details| details.get("fields"))
            .and_then(|fields| fields.get(field))
            .and_then(|value| value.as_str())
            .map(str::to_owned)
    }

    #[rstest]
    fn blank_feedback_filters_are_ignored() {
        let query = FeedbackFilterQuery {
            course: Some("  ".to_owned()),
            rating: Some(String::new()),
            student: None,
        };
        assert_eq!(query.parse().expect("filter"), FeedbackFilter::default());
    }

    #[rstest]
    fn feedback_filters_parse_ids_and_rating() {
        let course = CourseId::random();
        let query = FeedbackFilterQuery {
            course: Some(course.to_string()),
            rating: Some("4".to_owned()),
            student: None,
        };
        let filter = query.parse().expect("filter");
        assert_eq!(filter.course_id, Some(course));
        assert_eq!(filter.rating.map(Rating::get), Some(4));
    }

    #[rstest]
    #[case(Some("abc"), None, "course")]
    #[case(None, Some("9"), "rating")]
    #[case(None, Some("four"), "rating")]
    fn malformed_feedback_filters_name_the_field(
        #[case] course: Option<&str>,
        #[case] rating: Option<&str>,
        #[case] field: &str,
    ) {
        let query = FeedbackFilterQuery {
            course: course.map(str::to_owned),
            rating: rating.map(str::to_owned),
            student: None,
        };
        let err = query.parse().expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(field_message(&err, field).is_some());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("true"), Some(true))]
    #[case(Some("false"), Some(false))]
    fn blocked_flag_parses(#[case] raw: Option<&str>, #[case] expected: Option<bool>) {
        let query = StudentFilterQuery {
            search: Some("JANE".to_owned()),
            blocked: raw.map(str::to_owned),
        };
        let filter = query.parse().expect("filter");
        assert_eq!(filter.blocked, expected);
        assert_eq!(filter.search.as_deref(), Some("JANE"));
    }

    #[rstest]
    fn unknown_blocked_flag_is_rejected() {
        let query = StudentFilterQuery {
            search: None,
            blocked: Some("maybe".to_owned()),
        };
        let err = query.parse().expect_err("invalid");
        assert_eq!(
            field_message(&err, "blocked").as_deref(),
            Some("blocked must be true or false")
        );
    }
}
