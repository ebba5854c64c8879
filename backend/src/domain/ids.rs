//! Entity identifiers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse a path or query segment, reporting malformed input as an
            /// `invalid_request` on the `id` field.
            pub fn parse(raw: &str) -> Result<Self, Error> {
                raw.trim().parse().map_err(|_| {
                    Error::invalid_request(concat!("Invalid ", $label, " id")).with_details(
                        serde_json::json!({ "fields": { "id": concat!("Invalid ", $label, " id") } }),
                    )
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user (student or admin).
    UserId,
    "user"
);
entity_id!(
    /// Identifier of a course.
    CourseId,
    "course"
);
entity_id!(
    /// Identifier of a feedback submission.
    FeedbackId,
    "feedback"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn parse_accepts_padded_uuid() {
        let id = CourseId::parse(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn parse_rejects_garbage_as_invalid_request() {
        let err = FeedbackId::parse("abc").expect_err("malformed id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Invalid feedback id");
    }

    #[rstest]
    fn serialises_as_plain_uuid_string() {
        let id = UserId::from_uuid(Uuid::nil());
        assert_eq!(
            serde_json::to_value(id).expect("serialise"),
            serde_json::json!("00000000-0000-0000-0000-000000000000")
        );
    }
}
