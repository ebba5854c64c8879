//! Deterministic dataset generation from seed definitions.
//!
//! The RNG is seeded from the definition, so the same definition always
//! produces identical students, courses and feedback.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::catalogue::{COURSE_CATALOGUE, REVIEW_MESSAGES};
use crate::error::GenerationError;
use crate::registry::SeedDefinition;
use crate::seed::{ExampleCourseSeed, ExampleDataset, ExampleFeedbackSeed, ExampleStudentSeed};
use crate::validation::{STUDENT_NAME_MAX, email_local_part, is_valid_student_name};

/// Maximum number of attempts to generate a valid student name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Domain used for generated student addresses.
const EMAIL_DOMAIN: &str = "example.edu";

/// Ratings skew positive, as real course feedback tends to.
const RATING_WEIGHTS: [u8; 10] = [1, 2, 3, 3, 4, 4, 4, 5, 5, 5];

const INSTRUCTOR_TITLES: [&str; 2] = ["Dr.", "Prof."];

/// Backend cap on instructor names.
const INSTRUCTOR_MAX: usize = 100;

/// Registrations spread over the last half year.
const MAX_JOINED_DAYS_AGO: u32 = 180;

/// Courses predate the oldest registrations.
const COURSE_AGE_DAYS: std::ops::RangeInclusive<u32> = 181..=365;

/// Generates the dataset described by `seed_def`.
///
/// Courses are drawn from the built-in catalogue without repetition. Every
/// student has a unique email, and each submits feedback for at most
/// [`SeedDefinition::feedback_per_student`] distinct courses, never before
/// they registered.
///
/// # Errors
///
/// Returns [`GenerationError::StudentNameGenerationFailed`] if the name
/// faker cannot produce a valid name within the retry budget.
///
/// # Example
///
/// ```
/// use example_data::{SeedRegistry, generate_example_dataset};
///
/// let json = r#"{
///     "version": 1,
///     "seeds": [{"name": "test", "seed": 42, "studentCount": 3, "courseCount": 2}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid");
/// let seed_def = registry.find_seed("test").expect("found");
/// let dataset = generate_example_dataset(seed_def).expect("generated");
///
/// assert_eq!(dataset.students.len(), 3);
/// assert_eq!(dataset.courses.len(), 2);
/// assert_eq!(dataset, generate_example_dataset(seed_def).expect("generated"));
/// ```
pub fn generate_example_dataset(
    seed_def: &SeedDefinition,
) -> Result<ExampleDataset, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());

    let courses = generate_courses(&mut rng, seed_def.course_count());
    let students = generate_students(&mut rng, seed_def.student_count())?;
    let feedback = generate_feedback(
        &mut rng,
        &students,
        &courses,
        seed_def.feedback_per_student(),
    );

    Ok(ExampleDataset {
        students,
        courses,
        feedback,
    })
}

fn next_uuid(rng: &mut ChaCha8Rng) -> Uuid {
    Uuid::from_u128(rng.random())
}

fn generate_courses(rng: &mut ChaCha8Rng, count: usize) -> Vec<ExampleCourseSeed> {
    let mut entries: Vec<_> = COURSE_CATALOGUE.iter().collect();
    entries.shuffle(rng);
    entries.truncate(count);

    entries
        .into_iter()
        .map(|entry| {
            let id = next_uuid(rng);
            let title = INSTRUCTOR_TITLES.choose(rng).copied().unwrap_or("Dr.");
            let first: String = FirstName(EN).fake_with_rng(rng);
            let last: String = LastName(EN).fake_with_rng(rng);
            let instructor: String = format!("{title} {first} {last}")
                .chars()
                .take(INSTRUCTOR_MAX)
                .collect();
            ExampleCourseSeed {
                id,
                name: entry.name.to_owned(),
                code: entry.code.to_owned(),
                description: entry.description.to_owned(),
                instructor,
                credits: entry.credits,
                created_days_ago: rng.random_range(COURSE_AGE_DAYS),
            }
        })
        .collect()
}

fn generate_students(
    rng: &mut ChaCha8Rng,
    count: usize,
) -> Result<Vec<ExampleStudentSeed>, GenerationError> {
    let mut emails = HashSet::with_capacity(count);
    let mut students = Vec::with_capacity(count);

    for index in 1..=count {
        let id = next_uuid(rng);
        let name = generate_student_name(rng)?;
        let local = email_local_part(&name).unwrap_or_else(|| "student".to_owned());
        let mut email = format!("{local}@{EMAIL_DOMAIN}");
        if emails.contains(&email) {
            // Local parts carry no digits, so an index suffix cannot collide.
            email = format!("{local}{index}@{EMAIL_DOMAIN}");
        }
        emails.insert(email.clone());

        let phone = rng.random_bool(0.6).then(|| generate_phone(rng));
        students.push(ExampleStudentSeed {
            id,
            name,
            email,
            phone,
            joined_days_ago: rng.random_range(0..=MAX_JOINED_DAYS_AGO),
            is_blocked: rng.random_ratio(1, 10),
        });
    }

    Ok(students)
}

/// First and last name from the faker, retried until it fits the backend's
/// name rules.
fn generate_student_name(rng: &mut ChaCha8Rng) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);
        let candidate = format!("{first} {last}");

        if candidate.chars().count() <= STUDENT_NAME_MAX && is_valid_student_name(&candidate) {
            return Ok(candidate);
        }
    }

    Err(GenerationError::StudentNameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}

fn generate_phone(rng: &mut ChaCha8Rng) -> String {
    (0..10)
        .map(|_| char::from(b'0' + rng.random_range(0..10_u8)))
        .collect()
}

fn generate_feedback(
    rng: &mut ChaCha8Rng,
    students: &[ExampleStudentSeed],
    courses: &[ExampleCourseSeed],
    per_student: usize,
) -> Vec<ExampleFeedbackSeed> {
    let mut feedback = Vec::new();

    for student in students {
        let count = rng.random_range(0..=per_student);
        let mut picks: Vec<&ExampleCourseSeed> = courses.iter().collect();
        picks.shuffle(rng);
        picks.truncate(count);

        for course in picks {
            let rating = RATING_WEIGHTS.choose(rng).copied().unwrap_or(4);
            let message = REVIEW_MESSAGES
                .get(usize::from(rating.saturating_sub(1)))
                .and_then(|set| set.choose(rng))
                .copied()
                .unwrap_or("A solid course overall.");
            let earliest = student.joined_days_ago.min(course.created_days_ago);
            feedback.push(ExampleFeedbackSeed {
                id: next_uuid(rng),
                student_id: student.id,
                course_id: course.id,
                rating,
                message: message.to_owned(),
                submitted_days_ago: rng.random_range(0..=earliest),
            });
        }
    }

    feedback
}
