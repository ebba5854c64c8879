//! In-process store used when no database is configured.
//!
//! [`InMemoryStore`] implements the user, course and feedback repository
//! ports over one mutex-guarded set of tables. Every write checks its
//! constraints and applies the change under the same lock, so it honours the
//! uniqueness, foreign-key and cascade rules of the PostgreSQL schema.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    CourseRepository, CourseRepositoryError, CourseVisibility, FeedbackRepository,
    FeedbackRepositoryError, StudentFilter, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Course, CourseCode, CourseId, CourseName, Email, Feedback, FeedbackFilter, FeedbackId, Role,
    User, UserId,
};


#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    courses: BTreeMap<CourseId, Course>,
    feedback: BTreeMap<FeedbackId, Feedback>,
}

impl Tables {
    fn feedback_for_course(&self, course_id: CourseId) -> u64 {
        self.feedback
            .values()
            .filter(|item| item.course_id == course_id)
            .count() as u64
    }

    fn course_conflict(&self, course: &Course) -> Option<CourseRepositoryError> {
        let others = || self.courses.values().filter(|other| other.id != course.id);
        if others().any(|other| other.name == course.name) {
            return Some(CourseRepositoryError::duplicate_name(course.name.as_ref()));
        }
        if others().any(|other| other.code == course.code) {
            return Some(CourseRepositoryError::duplicate_code(course.code.as_ref()));
        }
        None
    }
}

/// Shared in-process tables. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

/// Newest first, ties broken by id so paging is stable.
fn newest_first<T>(
    items: &mut [T],
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, uuid::Uuid),
) {
    items.sort_by(|a, b| {
        let (a_time, a_id) = key(a);
        let (b_time, b_id) = key(b);
        b_time.cmp(&a_time).then(a_id.cmp(&b_id))
    });
}

fn page_of<T>(items: Vec<T>, page: PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    (items.into_iter().skip(skip).take(take).collect(), total)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.users.values().any(|other| other.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables
            .users
            .values()
            .any(|other| other.id != user.id && other.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        match tables.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found for update")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn list_students(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        let mut students: Vec<User> = tables
            .users
            .values()
            .filter(|user| user.role == Role::Student && filter.matches(user))
            .cloned()
            .collect();
        newest_first(&mut students, |user| (user.created_at, *user.id.as_uuid()));
        Ok(page_of(students, page))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.values().cloned().collect())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let removed = tables.users.remove(id).is_some();
        if removed {
            tables.feedback.retain(|_, item| item.student_id != *id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut tables = self.lock().map_err(CourseRepositoryError::query)?;
        if let Some(conflict) = tables.course_conflict(course) {
            return Err(conflict);
        }
        tables.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut tables = self.lock().map_err(CourseRepositoryError::query)?;
        if let Some(conflict) = tables.course_conflict(course) {
            return Err(conflict);
        }
        match tables.courses.get_mut(&course.id) {
            Some(stored) => {
                *stored = course.clone();
                Ok(())
            }
            None => Err(CourseRepositoryError::query("course not found for update")),
        }
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let tables = self.lock().map_err(CourseRepositoryError::query)?;
        Ok(tables.courses.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[CourseId]) -> Result<Vec<Course>, CourseRepositoryError> {
        let tables = self.lock().map_err(CourseRepositoryError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.courses.get(id).cloned())
            .collect())
    }

    async fn find_conflicting(
        &self,
        name: &CourseName,
        code: &CourseCode,
        excluding: Option<CourseId>,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let tables = self.lock().map_err(CourseRepositoryError::query)?;
        Ok(tables
            .courses
            .values()
            .filter(|course| Some(course.id) != excluding)
            .find(|course| &course.name == name || &course.code == code)
            .cloned())
    }

    async fn list(
        &self,
        visibility: CourseVisibility,
        page: PageRequest,
    ) -> Result<(Vec<Course>, u64), CourseRepositoryError> {
        let tables = self.lock().map_err(CourseRepositoryError::query)?;
        let mut courses: Vec<Course> = tables
            .courses
            .values()
            .filter(|course| visibility == CourseVisibility::All || course.is_active)
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(page_of(courses, page))
    }

    async fn list_all(&self) -> Result<Vec<Course>, CourseRepositoryError> {
        let tables = self.lock().map_err(CourseRepositoryError::query)?;
        Ok(tables.courses.values().cloned().collect())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError> {
        let mut tables = self.lock().map_err(CourseRepositoryError::query)?;
        let references = tables.feedback_for_course(*id);
        if references > 0 {
            return Err(CourseRepositoryError::referenced(references));
        }
        Ok(tables.courses.remove(id).is_some())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn insert(&self, item: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        if !tables.users.contains_key(&item.student_id) {
            return Err(FeedbackRepositoryError::missing_reference(format!(
                "student {}",
                item.student_id
            )));
        }
        if !tables.courses.contains_key(&item.course_id) {
            return Err(FeedbackRepositoryError::missing_reference(format!(
                "course {}",
                item.course_id
            )));
        }
        if tables
            .feedback
            .values()
            .any(|other| other.student_id == item.student_id && other.course_id == item.course_id)
        {
            return Err(FeedbackRepositoryError::duplicate(
                item.student_id,
                item.course_id,
            ));
        }
        tables.feedback.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        match tables.feedback.get_mut(&item.id) {
            Some(stored) => {
                stored.rating = item.rating;
                stored.message = item.message.clone();
                stored.updated_at = item.updated_at;
                Ok(())
            }
            None => Err(FeedbackRepositoryError::query("feedback not found for update")),
        }
    }

    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<Feedback>, FeedbackRepositoryError> {
        let tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        Ok(tables.feedback.get(id).cloned())
    }

    async fn delete(&self, id: &FeedbackId) -> Result<bool, FeedbackRepositoryError> {
        let mut tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        Ok(tables.feedback.remove(id).is_some())
    }

    async fn delete_by_student(&self, student_id: &UserId) -> Result<u64, FeedbackRepositoryError> {
        let mut tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        let before = tables.feedback.len();
        tables.feedback.retain(|_, item| item.student_id != *student_id);
        Ok((before - tables.feedback.len()) as u64)
    }

    async fn count_by_course(&self, course_id: &CourseId) -> Result<u64, FeedbackRepositoryError> {
        let tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        Ok(tables.feedback_for_course(*course_id))
    }

    async fn count_by_students(
        &self,
        student_ids: &[UserId],
    ) -> Result<HashMap<UserId, u64>, FeedbackRepositoryError> {
        let tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        let mut counts = HashMap::new();
        for item in tables.feedback.values() {
            if student_ids.contains(&item.student_id) {
                *counts.entry(item.student_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn list_page(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> Result<(Vec<Feedback>, u64), FeedbackRepositoryError> {
        let matching = self.list_matching(filter).await?;
        Ok(page_of(matching, page))
    }

    async fn list_matching(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let tables = self.lock().map_err(FeedbackRepositoryError::query)?;
        let mut matching: Vec<Feedback> = tables
            .feedback
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        newest_first(&mut matching, |item| (item.created_at, *item.id.as_uuid()));
        Ok(matching)
    }

    async fn list_all(&self) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        self.list_matching(&FeedbackFilter::default()).await
    }
}
