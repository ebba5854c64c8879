//! Feedback submission, listing and export.
//!
//! Uniqueness of `(student, course)` is left to the repository so two
//! concurrent submissions cannot both succeed. Listings join each row with
//! its student and course in two batched lookups; rows whose references no
//! longer resolve are dropped from the page.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageInfo, PageRequest, Paginated};
use tracing::{debug, info};

use super::service_support::{
    Repositories, map_course_error, map_export_error, map_feedback_error, map_user_error,
    require_admin,
};
use crate::domain::ports::{
    FeedbackCommand, FeedbackExport, FeedbackExportRow, FeedbackExporter, FeedbackQuery,
};
use crate::domain::{
    Course, CourseId, Error, Feedback, FeedbackDraft, FeedbackFilter, FeedbackId, FeedbackPatch,
    FeedbackView, FeedbackWithCourse, GlobalFeedbackStats, Requester, Role, User, UserId,
};

/// Feedback service implementing [`FeedbackCommand`] and [`FeedbackQuery`].
#[derive(Clone)]
pub struct FeedbackService {
    repos: Repositories,
    exporter: Arc<dyn FeedbackExporter>,
    clock: Arc<dyn Clock>,
}

impl FeedbackService {
    /// Create a service over the repositories and an export renderer.
    pub fn new(
        repos: Repositories,
        exporter: Arc<dyn FeedbackExporter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            exporter,
            clock,
        }
    }

    async fn load(&self, id: &FeedbackId) -> Result<Feedback, Error> {
        self.repos
            .feedback
            .find_by_id(id)
            .await
            .map_err(map_feedback_error)?
            .ok_or_else(|| Error::not_found("Feedback not found"))
    }

    async fn load_course(&self, id: &CourseId) -> Result<Course, Error> {
        self.repos
            .courses
            .find_by_id(id)
            .await
            .map_err(map_course_error)?
            .ok_or_else(|| Error::not_found("Course not found"))
    }

    async fn students_for(&self, feedback: &[Feedback]) -> Result<HashMap<UserId, User>, Error> {
        let ids: Vec<UserId> = feedback
            .iter()
            .map(|row| row.student_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self
            .repos
            .users
            .find_by_ids(&ids)
            .await
            .map_err(map_user_error)?;
        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }

    async fn join_views(&self, feedback: &[Feedback]) -> Result<Vec<FeedbackView>, Error> {
        let students = self.students_for(feedback).await?;
        let courses = self.repos.courses_for(feedback).await?;
        Ok(feedback
            .iter()
            .filter_map(|row| {
                let student = students.get(&row.student_id)?;
                let course = courses.get(&row.course_id)?;
                Some(FeedbackView::new(row, student, course))
            })
            .collect())
    }

    async fn join_courses(&self, feedback: &[Feedback]) -> Result<Vec<FeedbackWithCourse>, Error> {
        let courses = self.repos.courses_for(feedback).await?;
        Ok(feedback
            .iter()
            .filter_map(|row| {
                courses
                    .get(&row.course_id)
                    .map(|course| FeedbackWithCourse::new(row, course))
            })
            .collect())
    }
}

#[async_trait]
impl FeedbackCommand for FeedbackService {
    async fn create(
        &self,
        requester: &Requester,
        draft: &FeedbackDraft,
    ) -> Result<FeedbackView, Error> {
        let submission = draft.validate()?;
        if requester.role() != Role::Student {
            debug!(user_id = %requester.id(), "non-student attempted to submit feedback");
            return Err(Error::forbidden("Only students can submit feedback"));
        }
        let student = self.repos.active_requester(requester).await?;
        let course = self.load_course(&submission.course_id).await?;

        let feedback = submission.into_feedback(student.id, self.clock.utc());
        self.repos
            .feedback
            .insert(&feedback)
            .await
            .map_err(map_feedback_error)?;
        info!(
            feedback_id = %feedback.id,
            course_id = %course.id,
            student_id = %student.id,
            "feedback submitted"
        );
        Ok(FeedbackView::new(&feedback, &student, &course))
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &FeedbackId,
        patch: &FeedbackPatch,
    ) -> Result<FeedbackWithCourse, Error> {
        let changes = patch.validate()?;
        let mut feedback = self.load(id).await?;
        if feedback.student_id != requester.id() {
            debug!(feedback_id = %id, user_id = %requester.id(), "non-owner update refused");
            return Err(Error::forbidden("You can only update your own feedback"));
        }
        self.repos.active_requester(requester).await?;

        changes.apply(&mut feedback, self.clock.utc());
        self.repos
            .feedback
            .update(&feedback)
            .await
            .map_err(map_feedback_error)?;
        let course = self.load_course(&feedback.course_id).await?;
        info!(feedback_id = %feedback.id, "feedback updated");
        Ok(FeedbackWithCourse::new(&feedback, &course))
    }

    async fn delete(&self, requester: &Requester, id: &FeedbackId) -> Result<(), Error> {
        let feedback = self.load(id).await?;
        if feedback.student_id != requester.id() && !requester.is_admin() {
            debug!(feedback_id = %id, user_id = %requester.id(), "non-owner delete refused");
            return Err(Error::forbidden("You can only delete your own feedback"));
        }
        self.repos.active_requester(requester).await?;

        let deleted = self
            .repos
            .feedback
            .delete(&feedback.id)
            .await
            .map_err(map_feedback_error)?;
        if !deleted {
            return Err(Error::not_found("Feedback not found"));
        }
        info!(feedback_id = %feedback.id, by = %requester.id(), "feedback deleted");
        Ok(())
    }
}

#[async_trait]
impl FeedbackQuery for FeedbackService {
    async fn list_all(
        &self,
        requester: &Requester,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> Result<Paginated<FeedbackView>, Error> {
        require_admin(requester)?;
        let (rows, total) = self
            .repos
            .feedback
            .list_page(filter, page)
            .await
            .map_err(map_feedback_error)?;
        let views = self.join_views(&rows).await?;
        Ok(Paginated::new(views, PageInfo::new(page, total)))
    }

    async fn mine(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> Result<Paginated<FeedbackWithCourse>, Error> {
        let filter = FeedbackFilter {
            student_id: Some(requester.id()),
            ..FeedbackFilter::default()
        };
        let (rows, total) = self
            .repos
            .feedback
            .list_page(&filter, page)
            .await
            .map_err(map_feedback_error)?;
        let joined = self.join_courses(&rows).await?;
        Ok(Paginated::new(joined, PageInfo::new(page, total)))
    }

    async fn global_stats(&self, requester: &Requester) -> Result<GlobalFeedbackStats, Error> {
        require_admin(requester)?;
        let snapshot = self.repos.snapshot().await?;
        Ok(snapshot.global_feedback_stats(self.clock.utc()))
    }

    async fn export(
        &self,
        requester: &Requester,
        filter: &FeedbackFilter,
    ) -> Result<FeedbackExport, Error> {
        require_admin(requester)?;
        let rows = self
            .repos
            .feedback
            .list_matching(filter)
            .await
            .map_err(map_feedback_error)?;
        let export_rows: Vec<FeedbackExportRow> = self
            .join_views(&rows)
            .await?
            .iter()
            .map(FeedbackExportRow::from)
            .collect();
        let bytes = self
            .exporter
            .render(&export_rows)
            .map_err(map_export_error)?;
        let file_name = format!(
            "feedback-export-{}.{}",
            self.clock.utc().format("%Y-%m-%d"),
            self.exporter.extension()
        );
        info!(rows = export_rows.len(), %file_name, "feedback exported");
        Ok(FeedbackExport {
            file_name,
            content_type: self.exporter.content_type(),
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "feedback_service_tests.rs"]
mod tests;
