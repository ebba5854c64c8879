//! Example data configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::example_data::SeedCredentials;

const DEFAULT_SEED_NAME: &str = "mossy-owl";
const DEFAULT_ADMIN_NAME: &str = "Course Admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.edu";
const DEFAULT_ADMIN_PASSWORD: &str = "Admin@1234";
const DEFAULT_STUDENT_PASSWORD: &str = "Student@1234";

fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("example-data")
        .join("seeds.json")
}

/// Configuration values controlling example data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Enable example data seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Seed name to load from the registry.
    pub seed_name: Option<String>,
    /// Optional override for the number of students generated.
    #[ortho_config(file_key = "student_count")]
    pub count: Option<usize>,
    /// Optional registry path override.
    pub registry_path: Option<PathBuf>,
    /// Display name of the seeded administrator.
    pub admin_name: Option<String>,
    /// Login email of the seeded administrator.
    pub admin_email: Option<String>,
    /// Password of the seeded administrator.
    pub admin_password: Option<String>,
    /// Password shared by every seeded student.
    pub student_password: Option<String>,
}

impl ExampleDataSettings {
    /// Return the configured seed name, falling back to the default.
    pub fn seed_name(&self) -> &str {
        self.seed_name.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Return the configured registry path, falling back to the default.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }

    /// Demo account credentials, with the documented defaults filled in.
    pub fn credentials(&self) -> SeedCredentials {
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_owned())
        };
        SeedCredentials {
            admin_name: pick(&self.admin_name, DEFAULT_ADMIN_NAME),
            admin_email: pick(&self.admin_email, DEFAULT_ADMIN_EMAIL),
            admin_password: pick(&self.admin_password, DEFAULT_ADMIN_PASSWORD),
            student_password: pick(&self.student_password, DEFAULT_STUDENT_PASSWORD),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for example data configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use crate::domain::NewPassword;

    const VARS: [&str; 8] = [
        "EXAMPLE_DATA_ENABLED",
        "EXAMPLE_DATA_SEED_NAME",
        "EXAMPLE_DATA_COUNT",
        "EXAMPLE_DATA_REGISTRY_PATH",
        "EXAMPLE_DATA_ADMIN_NAME",
        "EXAMPLE_DATA_ADMIN_EMAIL",
        "EXAMPLE_DATA_ADMIN_PASSWORD",
        "EXAMPLE_DATA_STUDENT_PASSWORD",
    ];

    fn load_from_empty_args() -> ExampleDataSettings {
        ExampleDataSettings::load_from_iter([OsString::from("course-feedback")])
            .expect("config should load")
    }

    fn cleared_env() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();
        assert!(!settings.enabled);
        assert_eq!(settings.seed_name(), DEFAULT_SEED_NAME);
        assert_eq!(settings.registry_path(), default_registry_path());
        assert!(settings.count.is_none());

        let credentials = settings.credentials();
        assert_eq!(credentials.admin_email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(credentials.admin_name, DEFAULT_ADMIN_NAME);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut env = cleared_env();
        env.extend([
            ("EXAMPLE_DATA_ENABLED", Some("true".to_owned())),
            ("EXAMPLE_DATA_SEED_NAME", Some("busy-term".to_owned())),
            ("EXAMPLE_DATA_COUNT", Some("5".to_owned())),
            (
                "EXAMPLE_DATA_REGISTRY_PATH",
                Some("/tmp/example_registry.json".to_owned()),
            ),
            ("EXAMPLE_DATA_ADMIN_EMAIL", Some("dean@uni.test".to_owned())),
        ]);
        let _guard = lock_env(env);

        let settings = load_from_empty_args();
        assert!(settings.enabled);
        assert_eq!(settings.seed_name(), "busy-term");
        assert_eq!(
            settings.registry_path(),
            PathBuf::from("/tmp/example_registry.json")
        );
        assert_eq!(settings.count, Some(5));
        assert_eq!(settings.credentials().admin_email, "dean@uni.test");
    }

    #[rstest]
    #[case(DEFAULT_ADMIN_PASSWORD)]
    #[case(DEFAULT_STUDENT_PASSWORD)]
    fn default_passwords_satisfy_the_password_policy(#[case] password: &str) {
        assert!(NewPassword::new(password).is_ok());
    }

    #[test]
    fn bundled_registry_is_the_default() {
        assert!(default_registry_path().is_file());
    }
}
