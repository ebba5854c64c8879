//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{CourseRepository, CourseRepositoryError, CourseVisibility};
use crate::domain::{Course, CourseCode, CourseId, CourseName};

use super::diesel_error_mapping::{
    COURSES_CODE_KEY, COURSES_NAME_KEY, DbFailure, FEEDBACK_COURSE_FKEY,
};
use super::models::{CourseRecord, CourseRow};
use super::pool::DbPool;
use super::schema::{courses, feedback};

/// Diesel-backed implementation of the course repository port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Translate a failure, naming the course that triggered a unique violation.
fn map_failure(failure: impl Into<DbFailure>, course: Option<&Course>) -> CourseRepositoryError {
    let failure = failure.into();
    match (failure, course) {
        (DbFailure::Connection(message), _) => CourseRepositoryError::connection(message),
        (failure, Some(course)) if failure.is_unique(COURSES_NAME_KEY) => {
            CourseRepositoryError::duplicate_name(course.name.as_ref())
        }
        (failure, Some(course)) if failure.is_unique(COURSES_CODE_KEY) => {
            CourseRepositoryError::duplicate_code(course.code.as_ref())
        }
        (failure, _) => CourseRepositoryError::query(failure.message()),
    }
}

fn map_read(failure: impl Into<DbFailure>) -> CourseRepositoryError {
    map_failure(failure, None)
}

fn to_domain_all(rows: Vec<CourseRow>) -> Result<Vec<Course>, CourseRepositoryError> {
    rows.into_iter()
        .map(|row| Course::try_from(row).map_err(CourseRepositoryError::query))
        .collect()
}

fn visible(visibility: CourseVisibility) -> courses::BoxedQuery<'static, diesel::pg::Pg> {
    match visibility {
        CourseVisibility::ActiveOnly => courses::table
            .filter(courses::is_active.eq(true))
            .into_boxed(),
        CourseVisibility::All => courses::table.into_boxed(),
    }
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        diesel::insert_into(courses::table)
            .values(CourseRecord::from(course))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(err, Some(course)))
    }

    async fn update(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let updated = diesel::update(courses::table.find(course.id.as_uuid()))
            .set(CourseRecord::from(course))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(err, Some(course)))?;
        if updated == 0 {
            return Err(CourseRepositoryError::query("course not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let row = courses::table
            .find(id.as_uuid())
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;
        row.map(|row| Course::try_from(row).map_err(CourseRepositoryError::query))
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[CourseId]) -> Result<Vec<Course>, CourseRepositoryError> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let rows = courses::table
            .filter(courses::id.eq_any(uuids))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        to_domain_all(rows)
    }

    async fn find_conflicting(
        &self,
        name: &CourseName,
        code: &CourseCode,
        excluding: Option<CourseId>,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let mut query = courses::table
            .filter(
                courses::name
                    .eq(name.as_ref().to_owned())
                    .or(courses::code.eq(code.as_ref().to_owned())),
            )
            .into_boxed();
        if let Some(id) = excluding {
            query = query.filter(courses::id.ne(*id.as_uuid()));
        }
        let rows = query
            .order(courses::name.asc())
            .select(CourseRow::as_select())
            .limit(1)
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        Ok(to_domain_all(rows)?.into_iter().next())
    }

    async fn list(
        &self,
        visibility: CourseVisibility,
        page: PageRequest,
    ) -> Result<(Vec<Course>, u64), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let total: i64 = visible(visibility)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read)?;
        let rows = visible(visibility)
            .order((courses::name.asc(), courses::id.asc()))
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        Ok((to_domain_all(rows)?, u64::try_from(total).unwrap_or(0)))
    }

    async fn list_all(&self) -> Result<Vec<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let rows = courses::table
            .order(courses::name.asc())
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        to_domain_all(rows)
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let outcome = diesel::delete(courses::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await;
        match outcome {
            Ok(deleted) => Ok(deleted > 0),
            Err(err) => {
                let failure = DbFailure::from(err);
                if !failure.is_foreign_key(FEEDBACK_COURSE_FKEY) {
                    return Err(map_read(failure));
                }
                // Feedback raced in after the service's pre-check; report
                // the current count.
                let remaining: i64 = feedback::table
                    .filter(feedback::course_id.eq(*id.as_uuid()))
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_read)?;
                Err(CourseRepositoryError::referenced(
                    u64::try_from(remaining).unwrap_or(0),
                ))
            }
        }
    }
}
