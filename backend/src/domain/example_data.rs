//! Example data seeding orchestration.
//!
//! Converts deterministic example-data registry outputs into domain users,
//! courses and feedback, then persists them through the ordinary repository
//! ports so both the in-memory and PostgreSQL stores can be seeded.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use example_data::{
    ExampleCourseSeed, ExampleFeedbackSeed, ExampleStudentSeed, GenerationError, RegistryError,
    SeedRegistry, generate_example_dataset,
};
use mockable::Clock;
use pagination::PageRequest;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    CourseRepositoryError, FeedbackRepositoryError, PasswordHasher, PasswordHasherError,
    StudentFilter, UserPersistenceError,
};
use crate::domain::{
    Course, CourseDraft, CourseId, Email, Feedback, FeedbackId, FeedbackMessage,
    FeedbackValidationError, FieldErrors, NewPassword, PasswordHash, PhoneNumber, Rating,
    Repositories, Role, User, UserId, UserName, UserValidationError,
};

/// Whether a seeding run wrote anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The dataset was written.
    Applied,
    /// The store already held students or the seed administrator.
    AlreadySeeded,
}

/// Result of attempting to apply example data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDataSeedOutcome {
    /// Seed name used for the run.
    pub seed_key: String,
    /// Number of students generated.
    pub student_count: usize,
    /// Number of courses generated.
    pub course_count: usize,
    /// Number of feedback submissions generated.
    pub feedback_count: usize,
    /// Persistence outcome for the run.
    pub result: SeedingResult,
}

/// Accounts created alongside the generated dataset.
#[derive(Debug, Clone)]
pub struct SeedCredentials {
    /// Display name for the administrator account.
    pub admin_name: String,
    /// Administrator login.
    pub admin_email: String,
    /// Administrator password; must satisfy the password policy.
    pub admin_password: String,
    /// Password shared by every generated student.
    pub student_password: String,
}

/// Errors raised while preparing or applying example data.
#[derive(Debug, Error)]
pub enum ExampleDataSeedingError {
    /// Seed registry lookups failed.
    #[error("seed registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Dataset generation failed.
    #[error("example data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated or configured account failed validation.
    #[error("seed account failed validation: {0}")]
    InvalidAccount(#[from] UserValidationError),
    /// A generated course failed validation.
    #[error("seed course {code} failed validation: {errors:?}")]
    InvalidCourse { code: String, errors: FieldErrors },
    /// A generated submission failed validation.
    #[error("seed feedback failed validation: {0}")]
    InvalidFeedback(#[from] FeedbackValidationError),
    /// Password hashing failed.
    #[error("seed password hashing failed: {0}")]
    Hashing(#[from] PasswordHasherError),
    /// User persistence failed.
    #[error("example data user persistence error: {0}")]
    Users(#[from] UserPersistenceError),
    /// Course persistence failed.
    #[error("example data course persistence error: {0}")]
    Courses(#[from] CourseRepositoryError),
    /// Feedback persistence failed.
    #[error("example data feedback persistence error: {0}")]
    Feedback(#[from] FeedbackRepositoryError),
}

/// Service that orchestrates example data seeding.
#[derive(Clone)]
pub struct ExampleDataSeeder {
    repos: Repositories,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl ExampleDataSeeder {
    /// Create a new seeder over the application's repositories.
    pub fn new(
        repos: Repositories,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            hasher,
            clock,
        }
    }

    /// Apply example data for a named seed within the registry.
    ///
    /// Nothing is written when the store already contains a student or an
    /// account with the administrator's email.
    ///
    /// # Errors
    ///
    /// Returns [`ExampleDataSeedingError`] if registry lookup, generation,
    /// validation, hashing or persistence fails.
    pub async fn seed_from_registry(
        &self,
        registry: &SeedRegistry,
        seed_name: &str,
        student_count_override: Option<usize>,
        credentials: &SeedCredentials,
    ) -> Result<ExampleDataSeedOutcome, ExampleDataSeedingError> {
        let mut seed_def = registry.find_seed(seed_name)?.clone();
        if let Some(count) = student_count_override {
            seed_def = seed_def.with_student_count(count);
        }
        let dataset = generate_example_dataset(&seed_def)?;
        let now = self.clock.utc();

        let admin = self.admin_account(credentials, now)?;
        let student_hash = self
            .hasher
            .hash(&NewPassword::new(&credentials.student_password)?)?;
        let students = dataset
            .students
            .iter()
            .map(|seed| convert_student(seed, &student_hash, now))
            .collect::<Result<Vec<_>, _>>()?;
        let courses = dataset
            .courses
            .iter()
            .map(|seed| convert_course(seed, now))
            .collect::<Result<Vec<_>, _>>()?;
        let feedback = dataset
            .feedback
            .iter()
            .map(|seed| convert_feedback(seed, now))
            .collect::<Result<Vec<_>, _>>()?;

        let mut outcome = ExampleDataSeedOutcome {
            seed_key: seed_def.name().to_owned(),
            student_count: students.len(),
            course_count: courses.len(),
            feedback_count: feedback.len(),
            result: SeedingResult::AlreadySeeded,
        };
        if self.already_seeded(&admin.email).await? {
            return Ok(outcome);
        }

        self.repos.users.insert(&admin).await?;
        for student in &students {
            self.repos.users.insert(student).await?;
        }
        for course in &courses {
            self.repos.courses.insert(course).await?;
        }
        for item in &feedback {
            self.repos.feedback.insert(item).await?;
        }
        info!(
            seed = %outcome.seed_key,
            students = outcome.student_count,
            courses = outcome.course_count,
            feedback = outcome.feedback_count,
            "example data written"
        );
        outcome.result = SeedingResult::Applied;
        Ok(outcome)
    }

    fn admin_account(
        &self,
        credentials: &SeedCredentials,
        now: DateTime<Utc>,
    ) -> Result<User, ExampleDataSeedingError> {
        let name = UserName::new(&credentials.admin_name)?;
        let email = Email::new(&credentials.admin_email)?;
        let hash = self
            .hasher
            .hash(&NewPassword::new(&credentials.admin_password)?)?;
        Ok(User::new(name, email, hash, Role::Admin, now))
    }

    async fn already_seeded(&self, admin_email: &Email) -> Result<bool, ExampleDataSeedingError> {
        if self.repos.users.find_by_email(admin_email).await?.is_some() {
            return Ok(true);
        }
        let (_, students) = self
            .repos
            .users
            .list_students(&StudentFilter::default(), PageRequest::new(1, 1))
            .await?;
        Ok(students > 0)
    }
}

fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

fn convert_student(
    seed: &ExampleStudentSeed,
    password_hash: &PasswordHash,
    now: DateTime<Utc>,
) -> Result<User, UserValidationError> {
    let mut user = User::new(
        UserName::new(&seed.name)?,
        Email::new(&seed.email)?,
        password_hash.clone(),
        Role::Student,
        days_before(now, seed.joined_days_ago),
    );
    user.id = UserId::from_uuid(seed.id);
    user.phone = seed.phone.as_deref().map(PhoneNumber::new).transpose()?;
    user.is_blocked = seed.is_blocked;
    Ok(user)
}

fn convert_course(
    seed: &ExampleCourseSeed,
    now: DateTime<Utc>,
) -> Result<Course, ExampleDataSeedingError> {
    let draft = CourseDraft {
        name: seed.name.clone(),
        code: seed.code.clone(),
        description: Some(seed.description.clone()),
        instructor: Some(seed.instructor.clone()),
        credits: Some(i64::from(seed.credits)),
    };
    let course = draft
        .validate()
        .map_err(|errors| ExampleDataSeedingError::InvalidCourse {
            code: seed.code.clone(),
            errors,
        })?;
    Ok(course.into_course(
        CourseId::from_uuid(seed.id),
        days_before(now, seed.created_days_ago),
    ))
}

fn convert_feedback(
    seed: &ExampleFeedbackSeed,
    now: DateTime<Utc>,
) -> Result<Feedback, FeedbackValidationError> {
    let submitted_at = days_before(now, seed.submitted_days_ago);
    Ok(Feedback {
        id: FeedbackId::from_uuid(seed.id),
        student_id: UserId::from_uuid(seed.student_id),
        course_id: CourseId::from_uuid(seed.course_id),
        rating: Rating::new(i64::from(seed.rating))?,
        message: FeedbackMessage::new(&seed.message)?,
        created_at: submitted_at,
        updated_at: submitted_at,
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for example data seeding orchestration.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{
        CourseRepository, FeedbackRepository, MockPasswordHasher, UserRepository,
    };
    use crate::domain::service_test_helpers::{fixture_clock, test_now};
    use crate::outbound::memory::InMemoryStore;

    const REGISTRY_JSON: &str = r#"{
        "version": 1,
        "seeds": [{"name": "mossy-owl", "seed": 42, "studentCount": 6, "courseCount": 4}]
    }"#;

    fn registry() -> SeedRegistry {
        SeedRegistry::from_json(REGISTRY_JSON).expect("registry should parse")
    }

    #[fixture]
    fn credentials() -> SeedCredentials {
        SeedCredentials {
            admin_name: "Seed Admin".to_owned(),
            admin_email: "Admin@Example.edu".to_owned(),
            admin_password: "Adm1n!Pass".to_owned(),
            student_password: "Stud3nt!Pass".to_owned(),
        }
    }

    fn hasher(expected_calls: usize) -> Arc<dyn PasswordHasher> {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(expected_calls)
            .returning(|password| Ok(PasswordHash::new(format!("hashed:{}", password.expose()))));
        Arc::new(hasher)
    }

    fn seeder(store: &Arc<InMemoryStore>, hasher: Arc<dyn PasswordHasher>) -> ExampleDataSeeder {
        let repos = Repositories::new(store.clone(), store.clone(), store.clone());
        ExampleDataSeeder::new(repos, hasher, fixture_clock())
    }

    #[rstest]
    #[tokio::test]
    async fn seed_writes_admin_students_courses_and_feedback(credentials: SeedCredentials) {
        let store = Arc::new(InMemoryStore::new());
        let outcome = seeder(&store, hasher(2))
            .seed_from_registry(&registry(), "mossy-owl", None, &credentials)
            .await
            .expect("seed succeeds");

        assert_eq!(outcome.result, SeedingResult::Applied);
        assert_eq!(outcome.seed_key, "mossy-owl");
        assert_eq!(outcome.student_count, 6);
        assert_eq!(outcome.course_count, 4);

        let users = UserRepository::list_all(store.as_ref()).await.expect("users");
        assert_eq!(users.len(), 7);
        let admin = users
            .iter()
            .find(|user| user.role == Role::Admin)
            .expect("admin seeded");
        assert_eq!(admin.email.as_ref(), "admin@example.edu");
        assert_eq!(admin.password_hash.as_str(), "hashed:Adm1n!Pass");
        assert!(
            users
                .iter()
                .filter(|user| user.role == Role::Student)
                .all(|user| user.password_hash.as_str() == "hashed:Stud3nt!Pass"
                    && user.created_at <= test_now())
        );

        let courses = CourseRepository::list_all(store.as_ref()).await.expect("courses");
        assert_eq!(courses.len(), 4);
        assert!(courses.iter().all(|course| course.is_active));

        let feedback = FeedbackRepository::list_all(store.as_ref())
            .await
            .expect("feedback");
        assert_eq!(feedback.len(), outcome.feedback_count);
    }

    #[rstest]
    #[tokio::test]
    async fn seed_is_deterministic_across_stores(credentials: SeedCredentials) {
        let first = Arc::new(InMemoryStore::new());
        let second = Arc::new(InMemoryStore::new());
        for store in [&first, &second] {
            seeder(store, hasher(2))
                .seed_from_registry(&registry(), "mossy-owl", None, &credentials)
                .await
                .expect("seed succeeds");
        }

        let mut first_ids: Vec<_> = CourseRepository::list_all(first.as_ref())
            .await
            .expect("courses")
            .into_iter()
            .map(|course| course.id)
            .collect();
        let mut second_ids: Vec<_> = CourseRepository::list_all(second.as_ref())
            .await
            .expect("courses")
            .into_iter()
            .map(|course| course.id)
            .collect();
        first_ids.sort();
        second_ids.sort();
        assert_eq!(first_ids, second_ids);
    }

    #[rstest]
    #[tokio::test]
    async fn second_run_reports_already_seeded(credentials: SeedCredentials) {
        let store = Arc::new(InMemoryStore::new());
        seeder(&store, hasher(2))
            .seed_from_registry(&registry(), "mossy-owl", None, &credentials)
            .await
            .expect("first run");

        let outcome = seeder(&store, hasher(2))
            .seed_from_registry(&registry(), "mossy-owl", None, &credentials)
            .await
            .expect("second run");

        assert_eq!(outcome.result, SeedingResult::AlreadySeeded);
        let users = UserRepository::list_all(store.as_ref()).await.expect("users");
        assert_eq!(users.len(), 7);
    }

    #[rstest]
    #[tokio::test]
    async fn student_count_override_is_honoured(credentials: SeedCredentials) {
        let store = Arc::new(InMemoryStore::new());
        let outcome = seeder(&store, hasher(2))
            .seed_from_registry(&registry(), "mossy-owl", Some(2), &credentials)
            .await
            .expect("seed succeeds");

        assert_eq!(outcome.student_count, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn seed_rejects_unknown_seed(credentials: SeedCredentials) {
        let store = Arc::new(InMemoryStore::new());
        let error = seeder(&store, hasher(0))
            .seed_from_registry(&registry(), "missing-seed", None, &credentials)
            .await
            .expect_err("missing seed should error");

        assert!(matches!(error, ExampleDataSeedingError::Registry(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn weak_admin_password_is_rejected_before_writing(mut credentials: SeedCredentials) {
        credentials.admin_password = "short".to_owned();
        let store = Arc::new(InMemoryStore::new());
        let error = seeder(&store, hasher(0))
            .seed_from_registry(&registry(), "mossy-owl", None, &credentials)
            .await
            .expect_err("weak password should error");

        assert!(matches!(error, ExampleDataSeedingError::InvalidAccount(_)));
        let users = UserRepository::list_all(store.as_ref()).await.expect("users");
        assert!(users.is_empty());
    }

    #[rstest]
    fn convert_student_rejects_malformed_phone() {
        let seed = ExampleStudentSeed {
            id: uuid::Uuid::nil(),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.edu".to_owned(),
            phone: Some("12345".to_owned()),
            joined_days_ago: 3,
            is_blocked: false,
        };

        let result = convert_student(&seed, &PasswordHash::new("hash"), test_now());
        assert!(result.is_err());
    }

    #[rstest]
    fn convert_feedback_backdates_both_timestamps() {
        let seed = ExampleFeedbackSeed {
            id: uuid::Uuid::nil(),
            student_id: uuid::Uuid::nil(),
            course_id: uuid::Uuid::nil(),
            rating: 4,
            message: "Well structured labs.".to_owned(),
            submitted_days_ago: 2,
        };

        let feedback = convert_feedback(&seed, test_now()).expect("valid seed");
        assert_eq!(feedback.created_at, test_now() - Duration::days(2));
        assert_eq!(feedback.created_at, feedback.updated_at);
        assert_eq!(feedback.rating.get(), 4);
    }
}
