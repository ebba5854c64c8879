//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every column so a hand-edited row cannot smuggle invalid data
//! past the value constructors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Address, Course, CourseCode, CourseId, CourseName, Credits, Email, Feedback, FeedbackId,
    FeedbackMessage, PasswordHash, PhoneNumber, Rating, Role, User, UserId, UserName,
};

use super::schema::{courses, feedback, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable and changeset view of a domain user.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub phone: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for UserRecord<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
            phone: user.phone.as_ref().map(AsRef::as_ref),
            date_of_birth: user.date_of_birth,
            address: user.address.as_ref().map(AsRef::as_ref),
            profile_picture_url: user.profile_picture_url.as_deref(),
            is_blocked: user.is_blocked,
            created_at: user.created_at,
        }
    }
}

fn corrupt(table: &str, column: &str, id: Uuid, detail: impl std::fmt::Display) -> String {
    format!("stored {table}.{column} for {id} is invalid: {detail}")
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let bad =
            |column: &str, detail: &dyn std::fmt::Display| corrupt("users", column, id, detail);
        Ok(Self {
            id: UserId::from_uuid(id),
            name: UserName::new(&row.name).map_err(|e| bad("name", &e))?,
            email: Email::new(&row.email).map_err(|e| bad("email", &e))?,
            password_hash: PasswordHash::new(row.password_hash),
            role: row.role.parse::<Role>().map_err(|e| bad("role", &e))?,
            phone: row
                .phone
                .as_deref()
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|e| bad("phone", &e))?,
            date_of_birth: row.date_of_birth,
            address: row
                .address
                .as_deref()
                .map(Address::new)
                .transpose()
                .map_err(|e| bad("address", &e))?,
            profile_picture_url: row.profile_picture_url,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
        })
    }
}

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub credits: Option<i16>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable and changeset view of a domain course.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = courses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CourseRecord<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub code: &'a str,
    pub description: Option<&'a str>,
    pub instructor: Option<&'a str>,
    pub credits: Option<i16>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Course> for CourseRecord<'a> {
    fn from(course: &'a Course) -> Self {
        Self {
            id: *course.id.as_uuid(),
            name: course.name.as_ref(),
            code: course.code.as_ref(),
            description: course.description.as_deref(),
            instructor: course.instructor.as_deref(),
            credits: course.credits.map(|credits| i16::from(credits.get())),
            is_active: course.is_active,
            created_at: course.created_at,
        }
    }
}

impl TryFrom<CourseRow> for Course {
    type Error = String;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let bad =
            |column: &str, detail: &dyn std::fmt::Display| corrupt("courses", column, id, detail);
        Ok(Self {
            id: CourseId::from_uuid(id),
            name: CourseName::new(&row.name).map_err(|e| bad("name", &e))?,
            code: CourseCode::new(&row.code).map_err(|e| bad("code", &e))?,
            description: row.description,
            instructor: row.instructor,
            credits: row
                .credits
                .map(|credits| Credits::new(i64::from(credits)))
                .transpose()
                .map_err(|e| bad("credits", &e))?,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// Row struct for reading from the feedback table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub rating: i16,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new submissions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub rating: i16,
    pub message: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Feedback> for NewFeedbackRow<'a> {
    fn from(item: &'a Feedback) -> Self {
        Self {
            id: *item.id.as_uuid(),
            student_id: *item.student_id.as_uuid(),
            course_id: *item.course_id.as_uuid(),
            rating: i16::from(item.rating.get()),
            message: item.message.as_ref(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Changeset for the editable submission columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = feedback)]
pub(crate) struct FeedbackUpdate<'a> {
    pub rating: i16,
    pub message: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Feedback> for FeedbackUpdate<'a> {
    fn from(item: &'a Feedback) -> Self {
        Self {
            rating: i16::from(item.rating.get()),
            message: item.message.as_ref(),
            updated_at: item.updated_at,
        }
    }
}

impl TryFrom<FeedbackRow> for Feedback {
    type Error = String;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let bad =
            |column: &str, detail: &dyn std::fmt::Display| corrupt("feedback", column, id, detail);
        Ok(Self {
            id: FeedbackId::from_uuid(id),
            student_id: UserId::from_uuid(row.student_id),
            course_id: CourseId::from_uuid(row.course_id),
            rating: Rating::new(i64::from(row.rating)).map_err(|e| bad("rating", &e))?,
            message: FeedbackMessage::new(&row.message).map_err(|e| bad("message", &e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_row() -> UserRow {
        UserRow {
            id: Uuid::nil(),
            name: "Jane Smith".to_owned(),
            email: "jane@example.com".to_owned(),
            password_hash: "$argon2id$hash".to_owned(),
            role: "student".to_owned(),
            phone: Some("5551234567".to_owned()),
            date_of_birth: None,
            address: None,
            profile_picture_url: None,
            is_blocked: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn user_row_round_trips_through_record() {
        let user = User::try_from(user_row()).expect("valid row");
        let record = UserRecord::from(&user);
        assert_eq!(record.email, "jane@example.com");
        assert_eq!(record.role, "student");
        assert_eq!(record.phone, Some("5551234567"));
    }

    #[rstest]
    fn unknown_role_is_reported_with_column() {
        let row = UserRow {
            role: "teacher".to_owned(),
            ..user_row()
        };
        let error = User::try_from(row).expect_err("bad role");
        assert!(error.contains("users.role"), "{error}");
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn out_of_range_rating_is_rejected(#[case] rating: i16) {
        let row = FeedbackRow {
            id: Uuid::nil(),
            student_id: Uuid::nil(),
            course_id: Uuid::nil(),
            rating,
            message: "Clear lectures and fair assignments.".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Feedback::try_from(row).is_err());
    }
}
