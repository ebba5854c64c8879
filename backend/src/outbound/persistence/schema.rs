//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Student and administrator accounts.
    ///
    /// `email` is stored lower-cased and guarded by the unique index
    /// `users_email_key` on `LOWER(email)`.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name, 2 to 50 characters.
        name -> Varchar,
        /// Normalised email address.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `student` or `admin`.
        role -> Varchar,
        /// Ten-digit phone number.
        phone -> Nullable<Varchar>,
        date_of_birth -> Nullable<Date>,
        address -> Nullable<Varchar>,
        /// Public URL of the stored avatar.
        profile_picture_url -> Nullable<Text>,
        /// Blocked accounts may sign in to read but never mutate.
        is_blocked -> Bool,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Course catalogue. Names and codes are unique.
    courses (id) {
        id -> Uuid,
        name -> Varchar,
        /// Upper-cased alphanumeric code.
        code -> Varchar,
        description -> Nullable<Varchar>,
        instructor -> Nullable<Varchar>,
        /// Between 1 and 10 when present.
        credits -> Nullable<Int2>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Feedback submissions, unique per `(student_id, course_id)`.
    ///
    /// Deleting a user cascades to their feedback; deleting a referenced
    /// course is restricted.
    feedback (id) {
        id -> Uuid,
        student_id -> Uuid,
        course_id -> Uuid,
        /// Between 1 and 5.
        rating -> Int2,
        message -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(feedback -> users (student_id));
diesel::joinable!(feedback -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(users, courses, feedback);
