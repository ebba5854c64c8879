//! Authentication primitives: login credentials and the resolved requester.
//!
//! Inbound adapters build these from raw payloads and session state before
//! calling a service, so services never touch framework types.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::validation::FieldViolation;
use super::{Email, Role, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Please provide a valid email"),
            Self::EmptyPassword => write!(f, "Password is required"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl FieldViolation for LoginValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use course_feedback::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Example.com", "Admin123!").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@example.com");
/// assert_eq!(creds.password(), "Admin123!");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The authenticated caller of an operation.
///
/// Services authorise against this value rather than ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    id: UserId,
    role: Role,
}

impl Requester {
    /// Pair a user id with the role it acts under.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// The caller's user id.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// The caller's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller acts as an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("not-an-email", "pw", LoginValidationError::InvalidEmail)]
    #[case("jane@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  jane@example.com  ", " padded ")]
    #[case("JANE@EXAMPLE.COM", "Student123!")]
    fn valid_credentials_normalise_email_only(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password).expect("valid inputs");
        assert_eq!(creds.email().as_ref(), "jane@example.com");
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn debug_redacts_password() {
        let creds = LoginCredentials::try_from_parts("jane@example.com", "Student123!")
            .expect("valid inputs");
        assert!(!format!("{creds:?}").contains("Student123!"));
    }

    #[rstest]
    fn requester_reports_admin_role() {
        let admin = Requester::new(UserId::random(), Role::Admin);
        let student = Requester::new(UserId::random(), Role::Student);
        assert!(admin.is_admin());
        assert!(!student.is_admin());
    }
}
