//! Self-service account inputs: registration, profile edits and password
//! changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::validation::FieldErrors;
use super::{Address, Email, NewPassword, PhoneNumber, User, UserName};

/// Raw registration payload.
#[derive(Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[schema(example = "Jane Smith")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Student123!")]
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A registration that passed field validation.
#[derive(Debug)]
pub struct ValidRegistration {
    pub name: UserName,
    pub email: Email,
    pub password: NewPassword,
}

impl Registration {
    /// Validate every field, reporting all failures together.
    pub fn validate(&self) -> Result<ValidRegistration, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.capture(UserName::new(&self.name));
        let email = errors.capture(Email::new(&self.email));
        let password = errors.capture(NewPassword::new(&self.password));
        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if errors.is_empty() => {
                Ok(ValidRegistration {
                    name,
                    email,
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Raw profile update. Absent or blank fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "5551234567")]
    pub phone: Option<String>,
    #[serde(default)]
    #[schema(example = "2001-04-23")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Validated profile changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<UserName>,
    pub phone: Option<PhoneNumber>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<Address>,
}

fn provided(raw: Option<&str>) -> Option<&str> {
    raw.filter(|text| !text.trim().is_empty())
}

impl ProfilePatch {
    /// Validate the provided fields.
    pub fn validate(&self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.capture(provided(self.name.as_deref()).map(UserName::new).transpose());
        let phone = errors.capture(
            provided(self.phone.as_deref())
                .map(PhoneNumber::new)
                .transpose(),
        );
        let date_of_birth = errors.capture_as(
            "dateOfBirth",
            provided(self.date_of_birth.as_deref())
                .map(|text| {
                    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                        .map_err(|_| "Invalid date format")
                })
                .transpose(),
        );
        let address = errors.capture(
            provided(self.address.as_deref())
                .map(Address::new)
                .transpose(),
        );
        match (name, phone, date_of_birth, address) {
            (Some(name), Some(phone), Some(date_of_birth), Some(address)) if errors.is_empty() => {
                Ok(ProfileChanges {
                    name,
                    phone,
                    date_of_birth,
                    address,
                })
            }
            _ => Err(errors),
        }
    }
}

impl ProfileChanges {
    /// Apply the changes in place.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
    }
}

/// Raw password change payload.
#[derive(Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange(<redacted>)")
    }
}

/// A password change that passed field validation.
#[derive(Debug)]
pub struct ValidPasswordChange {
    pub current_password: Zeroizing<String>,
    pub new_password: NewPassword,
}

impl PasswordChange {
    /// Require the current password and a strong replacement.
    pub fn validate(&self) -> Result<ValidPasswordChange, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            errors.insert("currentPassword", "Current password is required");
        }
        let new_password = errors.capture_as("newPassword", NewPassword::new(&self.new_password));
        match new_password {
            Some(new_password) if errors.is_empty() => Ok(ValidPasswordChange {
                current_password: Zeroizing::new(self.current_password.clone()),
                new_password,
            }),
            _ => Err(errors),
        }
    }
}

/// Uploaded avatar bytes with their declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHash, Role};
    use chrono::Utc;
    use rstest::rstest;

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[rstest]
    fn registration_normalises_email() {
        let valid = registration(" Jane Smith ", "Jane@Example.com", "Student123!")
            .validate()
            .expect("valid registration");
        assert_eq!(valid.name.as_ref(), "Jane Smith");
        assert_eq!(valid.email.as_ref(), "jane@example.com");
    }

    #[rstest]
    fn registration_reports_all_fields() {
        let errors = registration("J", "nope", "weak")
            .validate()
            .expect_err("invalid registration");
        for field in ["name", "email", "password"] {
            assert!(errors.get(field).is_some(), "missing {field}");
        }
    }

    #[rstest]
    fn registration_debug_hides_password() {
        let raw = registration("Jane", "jane@example.com", "Student123!");
        assert!(!format!("{raw:?}").contains("Student123!"));
    }

    #[rstest]
    #[case(ProfilePatch { phone: Some("12345".into()), ..ProfilePatch::default() }, "phone")]
    #[case(
        ProfilePatch { date_of_birth: Some("23/04/2001".into()), ..ProfilePatch::default() },
        "dateOfBirth"
    )]
    #[case(ProfilePatch { address: Some("a".repeat(201)), ..ProfilePatch::default() }, "address")]
    #[case(ProfilePatch { name: Some("J".into()), ..ProfilePatch::default() }, "name")]
    fn profile_patch_rejects_bad_field(#[case] patch: ProfilePatch, #[case] field: &str) {
        let errors = patch.validate().expect_err("invalid patch");
        assert!(errors.get(field).is_some());
    }

    #[rstest]
    fn profile_patch_ignores_blank_fields() {
        let mut user = User::new(
            UserName::new("Jane Smith").expect("name"),
            Email::new("jane@example.com").expect("email"),
            PasswordHash::new("hash"),
            Role::Student,
            Utc::now(),
        );
        ProfilePatch {
            name: Some("   ".to_owned()),
            phone: Some("5551234567".to_owned()),
            date_of_birth: Some("2001-04-23".to_owned()),
            address: None,
        }
        .validate()
        .expect("valid patch")
        .apply(&mut user);
        assert_eq!(user.name.as_ref(), "Jane Smith");
        assert_eq!(
            user.phone.as_ref().map(|phone| phone.as_ref().to_owned()),
            Some("5551234567".to_owned())
        );
        assert_eq!(user.date_of_birth, NaiveDate::from_ymd_opt(2001, 4, 23));
        assert!(user.address.is_none());
    }

    #[rstest]
    fn password_change_requires_both_fields() {
        let errors = PasswordChange {
            current_password: String::new(),
            new_password: "short".to_owned(),
        }
        .validate()
        .expect_err("invalid change");
        assert_eq!(
            errors.get("currentPassword"),
            Some("Current password is required")
        );
        assert!(errors.get("newPassword").is_some());
    }
}
