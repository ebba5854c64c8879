//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{StudentFilter, UserPersistenceError, UserRepository};
use crate::domain::{Email, Role, User, UserId};

use super::diesel_error_mapping::{DbFailure, USERS_EMAIL_KEY};
use super::models::{UserRecord, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>, email: &str) -> UserPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => UserPersistenceError::connection(message),
        failure if failure.is_unique(USERS_EMAIL_KEY) => {
            UserPersistenceError::duplicate_email(email)
        }
        failure => UserPersistenceError::query(failure.message()),
    }
}

fn map_read(failure: impl Into<DbFailure>) -> UserPersistenceError {
    map_failure(failure, "")
}

fn to_domain(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(UserPersistenceError::query)
}

fn to_domain_all(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(to_domain).collect()
}

/// Escape `LIKE` wildcards so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn students_matching(filter: &StudentFilter) -> users::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = users::table
        .filter(users::role.eq(Role::Student.as_str()))
        .into_boxed();
    if let Some(blocked) = filter.blocked {
        query = query.filter(users::is_blocked.eq(blocked));
    }
    if let Some(needle) = filter.needle() {
        let pattern = like_pattern(&needle);
        query = query.filter(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let email = user.email.as_ref();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, email))?;
        diesel::insert_into(users::table)
            .values(UserRecord::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(err, email))
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let email = user.email.as_ref();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(err, email))?;
        let updated = diesel::update(users::table.find(user.id.as_uuid()))
            .set(UserRecord::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(err, email))?;
        if updated == 0 {
            return Err(UserPersistenceError::query("user not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;
        row.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;
        row.map(to_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let rows = users::table
            .filter(users::id.eq_any(uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        to_domain_all(rows)
    }

    async fn list_students(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let total: i64 = students_matching(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read)?;
        let rows = students_matching(filter)
            .order((users::created_at.desc(), users::id.asc()))
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        Ok((to_domain_all(rows)?, u64::try_from(total).unwrap_or(0)))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let rows = users::table
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read)?;
        to_domain_all(rows)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_read)?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jane", "%jane%")]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_pattern_escapes_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }

    #[rstest]
    fn duplicate_email_constraint_maps_to_duplicate_error() {
        let failure = DbFailure::Unique {
            constraint: Some(USERS_EMAIL_KEY.to_owned()),
        };
        assert_eq!(
            map_failure(failure, "jane@example.com"),
            UserPersistenceError::duplicate_email("jane@example.com")
        );
    }

    #[rstest]
    fn other_unique_violations_are_query_errors() {
        let failure = DbFailure::Unique { constraint: None };
        assert!(matches!(
            map_failure(failure, "jane@example.com"),
            UserPersistenceError::Query { .. }
        ));
    }
}
