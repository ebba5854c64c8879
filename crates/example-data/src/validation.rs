//! Student name and email rules mirroring the backend's account validation.
//!
//! The backend accepts names of 2 to 50 characters after trimming. Generated
//! names are further restricted to ASCII letters, spaces, hyphens and
//! apostrophes so that a matching email local part can be derived from them.

/// Minimum allowed length for a student name.
pub const STUDENT_NAME_MIN: usize = 2;

/// Maximum allowed length for a student name.
pub const STUDENT_NAME_MAX: usize = 50;

/// Whether `name` is a usable generated student name.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_student_name;
///
/// assert!(is_valid_student_name("Ada Lovelace"));
/// assert!(!is_valid_student_name("Zoë Quinn"));
/// assert!(!is_valid_student_name("A"));
/// assert!(!is_valid_student_name("  "));
/// ```
#[must_use]
pub fn is_valid_student_name(name: &str) -> bool {
    if name.trim() != name {
        return false;
    }
    let length = name.chars().count();
    if !(STUDENT_NAME_MIN..=STUDENT_NAME_MAX).contains(&length) {
        return false;
    }
    name.chars().any(|c| c.is_ascii_alphabetic()) && name.chars().all(is_valid_student_name_char)
}

const fn is_valid_student_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, ' ' | '-' | '\'')
}

/// Lower-case email local part for `name`: letters kept, words joined by
/// dots, everything else dropped.
///
/// Returns `None` when no letters remain.
#[must_use]
pub(crate) fn email_local_part(name: &str) -> Option<String> {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphabetic)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join("."))
    }
}
