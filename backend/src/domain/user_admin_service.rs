//! Admin user directory and account moderation.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest, Paginated};
use tracing::{debug, info};

use super::service_support::{Repositories, map_feedback_error, map_user_error, require_admin};
use crate::domain::ports::{
    StudentFilter, StudentSummary, UserAdminCommand, UserDetails, UsersQuery,
};
use crate::domain::{
    Error, FeedbackFilter, FeedbackWithCourse, Requester, User, UserId, UserProfile,
    student_feedback_stats,
};

/// Service implementing [`UsersQuery`] and [`UserAdminCommand`].
#[derive(Clone)]
pub struct UserAdminService {
    repos: Repositories,
}

impl UserAdminService {
    /// Create a service over the shared repositories.
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.repos
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Load a moderation target, refusing administrator accounts.
    async fn load_target(&self, id: &UserId, action: &str) -> Result<User, Error> {
        let user = self.load(id).await?;
        if user.is_admin() {
            debug!(user_id = %id, action, "moderation of an admin refused");
            return Err(Error::forbidden(format!("Cannot {action} admin users")));
        }
        Ok(user)
    }
}

#[async_trait]
impl UsersQuery for UserAdminService {
    async fn list_students(
        &self,
        requester: &Requester,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<Paginated<StudentSummary>, Error> {
        require_admin(requester)?;
        let (students, total) = self
            .repos
            .users
            .list_students(filter, page)
            .await
            .map_err(map_user_error)?;
        let ids: Vec<UserId> = students.iter().map(|student| student.id).collect();
        let counts = if ids.is_empty() {
            Default::default()
        } else {
            self.repos
                .feedback
                .count_by_students(&ids)
                .await
                .map_err(map_feedback_error)?
        };
        let items = students
            .iter()
            .map(|student| StudentSummary {
                profile: student.profile(),
                feedback_count: counts.get(&student.id).copied().unwrap_or(0),
            })
            .collect();
        Ok(Paginated::new(items, PageInfo::new(page, total)))
    }

    async fn user_details(
        &self,
        requester: &Requester,
        id: &UserId,
    ) -> Result<UserDetails, Error> {
        require_admin(requester)?;
        let user = self.load(id).await?;
        let filter = FeedbackFilter {
            student_id: Some(user.id),
            ..FeedbackFilter::default()
        };
        let feedback = self
            .repos
            .feedback
            .list_matching(&filter)
            .await
            .map_err(map_feedback_error)?;
        let courses = self.repos.courses_for(&feedback).await?;
        let joined = feedback
            .iter()
            .filter_map(|row| {
                courses
                    .get(&row.course_id)
                    .map(|course| FeedbackWithCourse::new(row, course))
            })
            .collect();
        Ok(UserDetails {
            user: user.profile(),
            feedback: joined,
            stats: student_feedback_stats(&user, &feedback),
        })
    }
}

#[async_trait]
impl UserAdminCommand for UserAdminService {
    async fn toggle_block(
        &self,
        requester: &Requester,
        id: &UserId,
    ) -> Result<UserProfile, Error> {
        require_admin(requester)?;
        let mut user = self.load_target(id, "block").await?;
        user.is_blocked = !user.is_blocked;
        self.repos
            .users
            .update(&user)
            .await
            .map_err(map_user_error)?;
        info!(
            user_id = %user.id,
            blocked = user.is_blocked,
            by = %requester.id(),
            "block status changed"
        );
        Ok(user.profile())
    }

    async fn delete_user(&self, requester: &Requester, id: &UserId) -> Result<(), Error> {
        require_admin(requester)?;
        let user = self.load_target(id, "delete").await?;
        let removed_feedback = self
            .repos
            .feedback
            .delete_by_student(&user.id)
            .await
            .map_err(map_feedback_error)?;
        let deleted = self
            .repos
            .users
            .delete(&user.id)
            .await
            .map_err(map_user_error)?;
        if !deleted {
            return Err(Error::not_found("User not found"));
        }
        info!(user_id = %user.id, removed_feedback, by = %requester.id(), "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_admin_service_tests.rs"]
mod tests;
