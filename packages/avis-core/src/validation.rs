//! Input format checks run before any network access.
//!
//! Pure and deterministic. Each validator returns the normalized (trimmed)
//! value on success so callers never send untrimmed input to the service.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{6,15}$").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Input field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Phone,
    Email,
    Password,
}

impl Field {
    fn format_hint(&self) -> &'static str {
        match self {
            Field::Phone => "use digits only (between 6 and 15)",
            Field::Email => "expected name@domain.tld",
            Field::Password => "unsupported characters",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Phone => "phone number",
            Field::Email => "email",
            Field::Password => "password",
        })
    }
}

/// Local, pre-network rejection of user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The {0} is required")]
    Empty(Field),

    #[error("Invalid {0} format: {hint}", hint = .0.format_hint())]
    Format(Field),

    #[error("The {0} must be at least {min} characters", min = MIN_PASSWORD_LEN)]
    TooShort(Field),
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Empty(f) | ValidationError::Format(f) | ValidationError::TooShort(f) => {
                *f
            }
        }
    }
}

/// Validate a phone number used as a lookup key. Returns the trimmed value.
pub fn validate_phone(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(Field::Phone));
    }
    if !PHONE_REGEX.is_match(trimmed) {
        return Err(ValidationError::Format(Field::Phone));
    }
    Ok(trimmed.to_string())
}

/// Validate the `local@domain.tld` shape. Returns the trimmed value.
pub fn validate_email(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::Format(Field::Email));
    }
    Ok(trimmed.to_string())
}

/// Validate a new password. Returns the trimmed value.
pub fn validate_password(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(Field::Password));
    }
    if trimmed.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort(Field::Password));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_6_to_15_digits() {
        assert_eq!(validate_phone("123456"), Ok("123456".to_string()));
        assert_eq!(validate_phone("0612345678"), Ok("0612345678".to_string()));
        assert_eq!(
            validate_phone("123456789012345"),
            Ok("123456789012345".to_string())
        );
    }

    #[test]
    fn test_phone_is_trimmed() {
        assert_eq!(validate_phone("  0612345678\t\n"), Ok("0612345678".to_string()));
    }

    #[test]
    fn test_phone_blank_is_empty() {
        assert_eq!(validate_phone(""), Err(ValidationError::Empty(Field::Phone)));
        assert_eq!(validate_phone("   "), Err(ValidationError::Empty(Field::Phone)));
    }

    #[test]
    fn test_phone_format_failures() {
        for input in [
            "123",
            "12345",
            "1234567890123456",
            "+33612345678",
            "06 12 34 56 78",
            "06-12-34-56-78",
            "abcdefg",
            "０６１２３４５６７８",
        ] {
            assert_eq!(
                validate_phone(input),
                Err(ValidationError::Format(Field::Phone)),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_phone_succeeds_iff_trimmed_matches_pattern() {
        let samples = [
            "", " ", "1", "12345", "123456", " 123456 ", "1234567890123456", "12a456", "٠٦١٢٣٤٥٦",
            "000000", "999999999999999",
        ];
        for s in samples {
            let t = s.trim();
            let expected = t.len() >= 6 && t.len() <= 15 && t.bytes().all(|b| b.is_ascii_digit());
            assert_eq!(validate_phone(s).is_ok(), expected, "input {:?}", s);
        }
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(
            validate_email("pro@example.com"),
            Ok("pro@example.com".to_string())
        );
        assert_eq!(
            validate_email(" pro@shop.co.uk "),
            Ok("pro@shop.co.uk".to_string())
        );

        for input in ["", "pro", "pro@example", "@example.com", "pro@.com", "p ro@example.com", "a@b@c.d"] {
            assert_eq!(
                validate_email(input),
                Err(ValidationError::Format(Field::Email)),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(
            validate_password(""),
            Err(ValidationError::Empty(Field::Password))
        );
        assert_eq!(
            validate_password("    "),
            Err(ValidationError::Empty(Field::Password))
        );
        assert_eq!(
            validate_password("abc12"),
            Err(ValidationError::TooShort(Field::Password))
        );
        assert_eq!(validate_password("abc123"), Ok("abc123".to_string()));
        assert_eq!(validate_password("  éèàçù "), Err(ValidationError::TooShort(Field::Password)));
    }

    #[test]
    fn test_messages_are_never_empty() {
        let errors = [
            ValidationError::Empty(Field::Phone),
            ValidationError::Format(Field::Phone),
            ValidationError::Format(Field::Email),
            ValidationError::TooShort(Field::Password),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
        assert_eq!(
            ValidationError::TooShort(Field::Password).to_string(),
            "The password must be at least 6 characters"
        );
        assert_eq!(
            ValidationError::Format(Field::Phone).to_string(),
            "Invalid phone number format: use digits only (between 6 and 15)"
        );
    }
}
