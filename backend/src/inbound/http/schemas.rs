//! OpenAPI schema definitions for types that live outside the backend crate.
//!
//! The `pagination` crate stays framework-agnostic and does not derive
//! `ToSchema`, so the envelope shapes returned by listing endpoints are
//! described here. Each wrapper mirrors `pagination::Paginated<T>` for one
//! concrete item type.

use utoipa::ToSchema;

use crate::domain::ports::StudentSummary;
use crate::domain::{Course, FeedbackView, FeedbackWithCourse};

/// OpenAPI schema for [`pagination::PageInfo`].
#[derive(ToSchema)]
#[schema(as = PageInfo, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageInfoSchema {
    /// One-based page number that was served.
    #[schema(example = 1)]
    current_page: u32,
    /// Number of pages needed to show every matching item.
    #[schema(example = 3)]
    total_pages: u64,
    /// Number of matching items before pagination.
    #[schema(example = 25)]
    total_items: u64,
    /// Page size used for this response.
    #[schema(example = 10)]
    items_per_page: u32,
}

macro_rules! page_schema {
    ($(#[$meta:meta])* $name:ident, $item:ident) => {
        $(#[$meta])*
        #[derive(ToSchema)]
        #[expect(
            dead_code,
            reason = "Used only for OpenAPI schema generation via utoipa"
        )]
        pub struct $name {
            /// Items on this page.
            items: Vec<$item>,
            /// Navigation metadata.
            pagination: PageInfoSchema,
        }
    };
}

page_schema!(
    /// A page of courses.
    CoursePage,
    Course
);
page_schema!(
    /// A page of feedback joined with student and course.
    FeedbackPage,
    FeedbackView
);
page_schema!(
    /// A page of the requester's own feedback joined with course.
    MyFeedbackPage,
    FeedbackWithCourse
);
page_schema!(
    /// A page of students with their feedback counts.
    StudentPage,
    StudentSummary
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn page_info_uses_wire_names() {
        let schema_json = schema_to_json::<PageInfoSchema>();
        assert_eq!(PageInfoSchema::name(), "PageInfo");
        for field in ["currentPage", "totalPages", "totalItems", "itemsPerPage"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }

    #[rstest]
    fn page_wrappers_reference_items_and_pagination() {
        let schema_json = schema_to_json::<CoursePage>();
        assert_eq!(CoursePage::name(), "CoursePage");
        assert!(schema_json.contains("items"));
        assert!(schema_json.contains("pagination"));
    }
}
