//! Course catalogue service.
//!
//! Administrators create, edit and delete courses; every authenticated
//! caller can browse them. Name and code uniqueness is checked up front so
//! the caller gets a field-level conflict, and the repository's own unique
//! constraints catch the race between check and write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageInfo, PageRequest, Paginated};
use serde_json::json;
use tracing::info;

use super::service_support::{
    Repositories, map_course_error, map_feedback_error, referenced_course, require_admin,
};
use crate::domain::ports::{CourseCommand, CourseQuery, CourseVisibility};
use crate::domain::validation::FieldErrors;
use crate::domain::{
    CodeEditPolicy, Course, CourseDetails, CourseDraft, CourseId, CoursePatch, CourseWithStats,
    Error, FeedbackFilter, Requester, course_stats,
};

/// Course service implementing [`CourseCommand`] and [`CourseQuery`].
#[derive(Clone)]
pub struct CourseService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
    code_policy: CodeEditPolicy,
}

impl CourseService {
    /// Create a service that lets administrators edit course codes.
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            clock,
            code_policy: CodeEditPolicy::default(),
        }
    }

    /// Choose whether course codes may change after creation.
    pub fn with_code_policy(mut self, code_policy: CodeEditPolicy) -> Self {
        self.code_policy = code_policy;
        self
    }

    async fn load(&self, id: &CourseId) -> Result<Course, Error> {
        self.repos
            .courses
            .find_by_id(id)
            .await
            .map_err(map_course_error)?
            .ok_or_else(|| Error::not_found("Course not found"))
    }

    async fn ensure_unique(
        &self,
        course: &Course,
        excluding: Option<CourseId>,
    ) -> Result<(), Error> {
        let clash = self
            .repos
            .courses
            .find_conflicting(&course.name, &course.code, excluding)
            .await
            .map_err(map_course_error)?;
        let Some(existing) = clash else {
            return Ok(());
        };
        let mut fields = serde_json::Map::new();
        if existing.name == course.name {
            fields.insert("name".to_owned(), json!("Course name already exists"));
        }
        if existing.code == course.code {
            fields.insert("code".to_owned(), json!("Course code already exists"));
        }
        Err(Error::conflict("Course with this name or code already exists")
            .with_details(json!({ "fields": fields })))
    }
}

#[async_trait]
impl CourseCommand for CourseService {
    async fn create(&self, requester: &Requester, draft: &CourseDraft) -> Result<Course, Error> {
        require_admin(requester)?;
        let course = draft
            .validate()?
            .into_course(CourseId::random(), self.clock.utc());
        self.ensure_unique(&course, None).await?;
        self.repos
            .courses
            .insert(&course)
            .await
            .map_err(map_course_error)?;
        info!(course_id = %course.id, code = %course.code.as_ref(), "course created");
        Ok(course)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &CourseId,
        patch: &CoursePatch,
    ) -> Result<Course, Error> {
        require_admin(requester)?;
        let changes = patch.validate()?;
        let mut course = self.load(id).await?;
        if let Err(violation) = changes.check_code_policy(&course, self.code_policy) {
            let mut errors = FieldErrors::new();
            errors.push(&violation);
            return Err(errors.into());
        }
        changes.apply(&mut course);
        self.ensure_unique(&course, Some(course.id)).await?;
        self.repos
            .courses
            .update(&course)
            .await
            .map_err(map_course_error)?;
        info!(course_id = %course.id, "course updated");
        Ok(course)
    }

    async fn delete(&self, requester: &Requester, id: &CourseId) -> Result<(), Error> {
        require_admin(requester)?;
        let course = self.load(id).await?;
        let feedback_count = self
            .repos
            .feedback
            .count_by_course(&course.id)
            .await
            .map_err(map_feedback_error)?;
        if feedback_count > 0 {
            return Err(referenced_course(feedback_count));
        }
        let deleted = self
            .repos
            .courses
            .delete(&course.id)
            .await
            .map_err(map_course_error)?;
        if !deleted {
            return Err(Error::not_found("Course not found"));
        }
        info!(course_id = %course.id, "course deleted");
        Ok(())
    }
}

#[async_trait]
impl CourseQuery for CourseService {
    async fn list(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> Result<Paginated<Course>, Error> {
        let visibility = if requester.is_admin() {
            CourseVisibility::All
        } else {
            CourseVisibility::ActiveOnly
        };
        let (courses, total) = self
            .repos
            .courses
            .list(visibility, page)
            .await
            .map_err(map_course_error)?;
        Ok(Paginated::new(courses, PageInfo::new(page, total)))
    }

    async fn get(&self, requester: &Requester, id: &CourseId) -> Result<CourseDetails, Error> {
        let course = self.load(id).await?;
        if !requester.is_admin() {
            return Ok(CourseDetails {
                course,
                stats: None,
            });
        }
        let filter = FeedbackFilter {
            course_id: Some(course.id),
            ..FeedbackFilter::default()
        };
        let feedback = self
            .repos
            .feedback
            .list_matching(&filter)
            .await
            .map_err(map_feedback_error)?;
        Ok(CourseDetails {
            course,
            stats: Some(course_stats(&feedback)),
        })
    }

    async fn with_stats(&self, requester: &Requester) -> Result<Vec<CourseWithStats>, Error> {
        require_admin(requester)?;
        Ok(self.repos.snapshot().await?.courses_with_stats())
    }
}

#[cfg(test)]
#[path = "course_service_tests.rs"]
mod tests;
