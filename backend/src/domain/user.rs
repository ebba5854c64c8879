//! Users: students who submit feedback and administrators who curate.
//!
//! Value types validate on construction so a [`User`] can only hold data that
//! satisfies the account rules. Password hashes never leave the domain in
//! serialised form; adapters expose [`UserProfile`] instead.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::validation::{FieldViolation, trimmed_len};
use super::{Requester, UserId};

/// Bounds on a user's display name, in characters after trimming.
pub const USER_NAME_MIN: usize = 2;
/// Upper bound on a user's display name.
pub const USER_NAME_MAX: usize = 50;
/// Minimum password length.
pub const PASSWORD_MIN: usize = 8;
/// Maximum address length.
pub const ADDRESS_MAX: usize = 200;
/// Special characters that satisfy the password policy.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Validation failures for account fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    /// Name shorter or longer than allowed.
    NameLength,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Password misses a length or character-class requirement.
    WeakPassword,
    /// Phone is not exactly ten digits.
    InvalidPhone,
    /// Address exceeds the maximum length.
    AddressTooLong,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameLength => write!(
                f,
                "Name must be between {USER_NAME_MIN} and {USER_NAME_MAX} characters"
            ),
            Self::InvalidEmail => write!(f, "Please provide a valid email"),
            Self::WeakPassword => write!(
                f,
                "Password must be at least {PASSWORD_MIN} characters and contain uppercase, \
                 lowercase, number and special character"
            ),
            Self::InvalidPhone => write!(f, "Phone number must be 10 digits"),
            Self::AddressTooLong => write!(f, "Address cannot exceed {ADDRESS_MAX} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl FieldViolation for UserValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::NameLength => "name",
            Self::InvalidEmail => "email",
            Self::WeakPassword => "password",
            Self::InvalidPhone => "phone",
            Self::AddressTooLong => "address",
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits feedback on courses.
    Student,
    /// Manages courses and users and reads analytics.
    Admin,
}

impl Role {
    /// Lower-case wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Trimmed display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Validate and trim a display name.
    ///
    /// # Examples
    /// ```
    /// use course_feedback::domain::UserName;
    ///
    /// assert_eq!(UserName::new("  Jane Smith ").unwrap().as_ref(), "Jane Smith");
    /// assert!(UserName::new("J").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let len = trimmed_len(raw);
        if !(USER_NAME_MIN..=USER_NAME_MAX).contains(&len) {
            return Err(UserValidationError::NameLength);
        }
        Ok(Self(raw.trim().to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Lower-cased email address; the case-insensitive identity of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Trim, lower-case and validate an address.
    ///
    /// # Examples
    /// ```
    /// use course_feedback::domain::Email;
    ///
    /// assert_eq!(Email::new(" Jane@Example.COM ").unwrap().as_ref(), "jane@example.com");
    /// assert!(Email::new("jane@example").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let normalised = raw.trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Ten-digit phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a phone number of exactly ten ASCII digits.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() != 10 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserValidationError::InvalidPhone);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Postal address, at most [`ADDRESS_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Validate and trim an address.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        if trimmed_len(raw) > ADDRESS_MAX {
            return Err(UserValidationError::AddressTooLong);
        }
        Ok(Self(raw.trim().to_owned()))
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A plaintext password that satisfies the strength policy.
///
/// The buffer is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Check length and character classes.
    ///
    /// # Examples
    /// ```
    /// use course_feedback::domain::NewPassword;
    ///
    /// assert!(NewPassword::new("Student123!").is_ok());
    /// assert!(NewPassword::new("student123").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let long_enough = raw.chars().count() >= PASSWORD_MIN;
        let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        let has_special = raw.chars().any(|c| PASSWORD_SPECIALS.contains(c));
        if !(long_enough && has_lower && has_upper && has_digit && has_special) {
            return Err(UserValidationError::WeakPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Opaque encoded password hash produced by a `PasswordHasher`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string for storage and verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A stored account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub phone: Option<PhoneNumber>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<Address>,
    pub profile_picture_url: Option<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh, unblocked account.
    pub fn new(
        name: UserName,
        email: Email,
        password_hash: PasswordHash,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::random(),
            name,
            email,
            password_hash,
            role,
            phone: None,
            date_of_birth: None,
            address: None,
            profile_picture_url: None,
            is_blocked: false,
            created_at,
        }
    }

    /// Whether the account holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Identity used to authorise requests made by this user.
    pub fn requester(&self) -> Requester {
        Requester::new(self.id, self.role)
    }

    /// Public view without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Account data safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[schema(example = "Jane Smith")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            role: user.role,
            phone: user.phone.as_ref().map(|p| p.as_ref().to_owned()),
            date_of_birth: user.date_of_birth,
            address: user.address.as_ref().map(|a| a.as_ref().to_owned()),
            profile_picture_url: user.profile_picture_url.clone(),
            is_blocked: user.is_blocked,
            created_at: user.created_at,
        }
    }
}
