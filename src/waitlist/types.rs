//! The waitlist payload and its validated counterpart.
//! Includes the parsing implementations and tests for those.

use lazy_regex::regex_is_match;
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// A validated waitlist submission.
/// Transient: it lives for the duration of one request.
#[derive(Debug, Clone)]
pub struct WaitlistSubmission {
    pub email: ValidEmail,
}

impl TryFrom<Value> for WaitlistSubmission {
    type Error = DataParsingError;

    /// Anything that isn't an object, or an object without `email`, is a missing email.
    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        let email = match payload.get("email") {
            None | Some(Value::Null) => return Err(DataParsingError::EmailMissing),
            Some(Value::String(email)) => email,
            Some(_) => return Err(DataParsingError::EmailNotString),
        };

        Ok(WaitlistSubmission {
            email: ValidEmail::parse(email)?,
        })
    }
}

/// Validated Email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return Err(DataParsingError::EmailEmpty);
        }

        if value.graphemes(true).count() > 256 {
            return Err(DataParsingError::EmailTooLong);
        }

        // `validate_email` accepts dotless domains like `a@b`, we require a top-level domain.
        if value.validate_email() && regex_is_match!(r"@[^@\s]+\.[A-Za-z]{2,}$", value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
/// The `Display` output is what the client gets to see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataParsingError {
    #[error("Email is required")]
    EmailMissing,
    #[error("Email must be a string")]
    EmailNotString,
    #[error("Email is required")]
    EmailEmpty,
    #[error("Email is too long")]
    EmailTooLong,
    #[error("Invalid email")]
    EmailInvalid,
}
