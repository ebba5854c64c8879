//! Startup seeding orchestration.

use std::sync::Arc;

use example_data::{RegistryError, SeedRegistry};
use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::domain::Repositories;
use crate::domain::example_data::{
    ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError, SeedingResult,
};
use crate::domain::ports::PasswordHasher;
use crate::example_data::config::ExampleDataSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Registry file could not be read or parsed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Seed generation or persistence failed.
    #[error("example data seeding error: {0}")]
    Seeding(#[from] ExampleDataSeedingError),
    /// Seed name must not be empty.
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Apply example data on startup when enabled.
///
/// Works against whichever store backs `repos`, so a fresh in-process
/// deployment and an empty PostgreSQL database are seeded the same way.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use course_feedback::domain::Repositories;
/// use course_feedback::example_data::{ExampleDataSettings, seed_example_data_on_startup};
/// use course_feedback::outbound::credentials::Argon2PasswordHasher;
/// use course_feedback::outbound::memory::InMemoryStore;
///
/// # async fn run(settings: ExampleDataSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryStore::new());
/// let repos = Repositories::new(store.clone(), store.clone(), store);
/// let outcome =
///     seed_example_data_on_startup(&settings, &repos, Arc::new(Argon2PasswordHasher::new()))
///         .await?;
/// # let _ = outcome;
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_data_on_startup(
    settings: &ExampleDataSettings,
    repos: &Repositories,
    hasher: Arc<dyn PasswordHasher>,
) -> Result<Option<ExampleDataSeedOutcome>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "example data seeding skipped");
        return Ok(None);
    }

    let seed_name = settings.seed_name().trim();
    if seed_name.is_empty() {
        return Err(StartupSeedingError::EmptySeedName);
    }

    let registry = SeedRegistry::from_file(&settings.registry_path())?;
    let seeder = ExampleDataSeeder::new(repos.clone(), hasher, Arc::new(DefaultClock));
    let outcome = seeder
        .seed_from_registry(&registry, seed_name, settings.count, &settings.credentials())
        .await?;

    match outcome.result {
        SeedingResult::Applied => {
            info!(
                seed_key = %outcome.seed_key,
                students = outcome.student_count,
                courses = outcome.course_count,
                feedback = outcome.feedback_count,
                "example data seeding applied"
            );
        }
        SeedingResult::AlreadySeeded => {
            info!(
                seed_key = %outcome.seed_key,
                "store already holds accounts; example data skipped"
            );
        }
    }

    Ok(Some(outcome))
}
