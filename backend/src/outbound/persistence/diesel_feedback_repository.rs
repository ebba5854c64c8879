//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};
use crate::domain::{CourseId, Feedback, FeedbackFilter, FeedbackId, UserId};

use super::diesel_error_mapping::{DbFailure, FEEDBACK_STUDENT_COURSE_KEY};
use super::models::{FeedbackRow, FeedbackUpdate, NewFeedbackRow};
use super::pool::DbPool;
use super::schema::feedback;

/// Diesel-backed implementation of the feedback repository port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(
    failure: impl Into<DbFailure>,
    item: Option<&Feedback>,
) -> FeedbackRepositoryError {
    match (failure.into(), item) {
        (DbFailure::Connection(message), _) => FeedbackRepositoryError::connection(message),
        (failure, Some(item)) if failure.is_unique(FEEDBACK_STUDENT_COURSE_KEY) => {
            FeedbackRepositoryError::duplicate(item.student_id, item.course_id)
        }
        (failure @ DbFailure::ForeignKey { .. }, _) => {
            FeedbackRepositoryError::missing_reference(failure.message())
        }
        (failure, _) => FeedbackRepositoryError::query(failure.message()),
    }
}

fn map_read(failure: impl Into<DbFailure>) -> FeedbackRepositoryError {
    map_failure(failure, None)
}

fn to_domain_all(rows: Vec<FeedbackRow>) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
    rows.into_iter()
        .map(|row| Feedback::try_from(row).map_err(FeedbackRepositoryError::query))
        .collect()
}

fn matching(filter: &FeedbackFilter) -> feedback::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = feedback::table.into_boxed();
    if let Some(course_id) = filter.course_id {
        query = query.filter(feedback::course_id.eq(*course_id.as_uuid()));
    }
    if let Some(rating) = filter.rating {
        query = query.filter(feedback::rating.eq(i16::from(rating.get())));
    }
    if let Some(student_id) = filter.student_id {
        query = query.filter(feedback::student_id.eq(*student_id.as_uuid()));
    }
    query
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, item: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        diesel::insert_into(feedback::table)
            .values(NewFeedbackRow::from(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(err, Some(item)))
    }

    async fn update(&self, item: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let updated = diesel::update(feedback::table.find(item.id.as_uuid()))
            .set(FeedbackUpdate::from(item))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(err, Some(item)))?;
        if updated == 0 {
            return Err(FeedbackRepositoryError::query("feedback not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let row = feedback::table
            .find(id.as_uuid())
            .select(FeedbackRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;
        row.map(|row| Feedback::try_from(row).map_err(FeedbackRepositoryError::query))
            .transpose()
    }

    async fn delete(&self, id: &FeedbackId) -> Result<bool, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let deleted = diesel::delete(feedback::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read)?;
        Ok(deleted > 0)
    }

    async fn delete_by_student(&self, student_id: &UserId) -> Result<u64, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let deleted =
            diesel::delete(feedback::table.filter(feedback::student_id.eq(*student_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_read)?;
        Ok(deleted as u64)
    }

    async fn count_by_course(&self, course_id: &CourseId) -> Result<u64, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let total: i64 = feedback::table
            .filter(feedback::course_id.eq(*course_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read)?;
        Ok(to_count(total))
    }

    async fn count_by_students(
        &self,
        student_ids: &[UserId],
    ) -> Result<HashMap<UserId, u64>, FeedbackRepositoryError> {
        let uuids: Vec<Uuid> = student_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let rows: Vec<(Uuid, i64)> = feedback::table
            .filter(feedback::student_id.eq_any(uuids))
            .group_by(feedback::student_id)
            .select((feedback::student_id, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        Ok(rows
            .into_iter()
            .map(|(id, count)| (UserId::from_uuid(id), to_count(count)))
            .collect())
    }

    async fn list_page(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> Result<(Vec<Feedback>, u64), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let total: i64 = matching(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read)?;
        let rows = matching(filter)
            .order((feedback::created_at.desc(), feedback::id.asc()))
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        Ok((to_domain_all(rows)?, to_count(total)))
    }

    async fn list_matching(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let rows = matching(filter)
            .order((feedback::created_at.desc(), feedback::id.asc()))
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        to_domain_all(rows)
    }

    async fn list_all(&self) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        self.list_matching(&FeedbackFilter::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedbackMessage, Rating};
    use chrono::Utc;
    use rstest::rstest;

    fn submission() -> Feedback {
        Feedback {
            id: FeedbackId::random(),
            student_id: UserId::random(),
            course_id: CourseId::random(),
            rating: Rating::new(4).expect("rating"),
            message: FeedbackMessage::new("Clear lectures and fair assignments.").expect("message"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn pair_violation_maps_to_duplicate() {
        let item = submission();
        let failure = DbFailure::Unique {
            constraint: Some(FEEDBACK_STUDENT_COURSE_KEY.to_owned()),
        };
        assert_eq!(
            map_failure(failure, Some(&item)),
            FeedbackRepositoryError::duplicate(item.student_id, item.course_id)
        );
    }

    #[rstest]
    fn foreign_key_violation_maps_to_missing_reference() {
        let failure = DbFailure::ForeignKey {
            constraint: Some("feedback_student_id_fkey".to_owned()),
        };
        assert!(matches!(
            map_failure(failure, Some(&submission())),
            FeedbackRepositoryError::MissingReference { .. }
        ));
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(0, 0)]
    #[case(7, 7)]
    fn counts_never_go_negative(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(to_count(raw), expected);
    }
}
