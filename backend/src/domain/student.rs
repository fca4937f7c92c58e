//! Student record model.
//!
//! A [`Student`] is only ever produced by storage: callers build a
//! [`NewStudent`] candidate from validated parts and the repository assigns
//! the [`StudentId`] when it persists the record.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted in a student name.
pub const STUDENT_NAME_MAX: usize = 255;
/// Maximum length of an email address (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;
const EMAIL_LOCAL_PART_MAX: usize = 64;

/// Validation errors raised while building student values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentValidationError {
    #[error("student id must be a positive integer")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must be a well-formed address")]
    InvalidEmail,
}

/// Storage-assigned student identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct StudentId(i64);

impl StudentId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, StudentValidationError> {
        if raw <= 0 {
            return Err(StudentValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StudentId> for i64 {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for StudentId {
    type Error = StudentValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Student display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    pub fn new(name: impl Into<String>) -> Result<Self, StudentValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if name.chars().count() > STUDENT_NAME_MAX {
            return Err(StudentValidationError::NameTooLong {
                max: STUDENT_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for StudentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StudentName> for String {
    fn from(value: StudentName) -> Self {
        value.0
    }
}

impl TryFrom<String> for StudentName {
    type Error = StudentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-atom local part, then dot-separated labels that neither start
        // nor end with a hyphen.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address, compared by exact value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Result<Self, StudentValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(StudentValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(StudentValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let local_part_len = email.split('@').next().map_or(0, str::len);
        if local_part_len > EMAIL_LOCAL_PART_MAX || !email_regex().is_match(&email) {
            return Err(StudentValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = StudentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated create candidate awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    name: StudentName,
    email: EmailAddress,
}

impl NewStudent {
    pub fn new(name: StudentName, email: EmailAddress) -> Self {
        Self { name, email }
    }

    /// Validate raw strings into a candidate.
    pub fn try_from_strings(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, StudentValidationError> {
        Ok(Self::new(StudentName::new(name)?, EmailAddress::new(email)?))
    }

    pub fn name(&self) -> &StudentName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Promote the candidate to a persisted record. Storage adapters call
    /// this once they have assigned `id`.
    pub fn into_student(self, id: StudentId) -> Student {
        let Self { name, email } = self;
        Student { id, name, email }
    }
}

/// Persisted student record.
///
/// ## Invariants
/// - `id` is positive and never changes.
/// - `name` is non-blank; `email` is well-formed and unique in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StudentDto", into = "StudentDto")]
pub struct Student {
    id: StudentId,
    name: StudentName,
    email: EmailAddress,
}

impl Student {
    pub fn new(id: StudentId, name: StudentName, email: EmailAddress) -> Self {
        Self { id, name, email }
    }

    /// Fallible constructor from raw parts, used by storage row mapping.
    pub fn try_from_parts(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, StudentValidationError> {
        Ok(Self::new(
            StudentId::new(id)?,
            StudentName::new(name)?,
            EmailAddress::new(email)?,
        ))
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn name(&self) -> &StudentName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StudentDto {
    id: i64,
    name: String,
    email: String,
}

impl From<Student> for StudentDto {
    fn from(value: Student) -> Self {
        let Student { id, name, email } = value;
        Self {
            id: id.get(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl TryFrom<StudentDto> for Student {
    type Error = StudentValidationError;

    fn try_from(value: StudentDto) -> Result<Self, Self::Error> {
        Student::try_from_parts(value.id, value.name, value.email)
    }
}
