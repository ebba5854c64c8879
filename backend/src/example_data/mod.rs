//! Demo catalogue seeding.
//!
//! When the `example-data` feature is enabled the server can populate an
//! empty store with an administrator, a handful of courses and students
//! drawn from a named seed in the registry.

mod config;
mod startup;

pub use config::ExampleDataSettings;
pub use startup::{StartupSeedingError, seed_example_data_on_startup};
