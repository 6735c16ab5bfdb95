//! Field-level checks shared by registration forms.

use validator::ValidateEmail;

use crate::error::ValidationError;

/// Trim `value` and reject it when blank.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] naming `field`.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Trim an optional value, mapping blanks to `None`.
#[must_use]
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalise an email address (trimmed, lowercase) and check its shape.
///
/// Bare hosts such as `a@localhost` are refused: the domain needs a dot.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] naming `field`.
pub fn email(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let normalised = value.trim().to_lowercase();
    let dotted = normalised
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if dotted && normalised.validate_email() {
        Ok(normalised)
    } else {
        Err(ValidationError::InvalidEmail { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_normalise_email_case_and_whitespace() {
        assert_eq!(
            email("email", "  Studio@Example.COM ").unwrap(),
            "studio@example.com"
        );
    }

    #[test]
    fn should_reject_malformed_emails() {
        for bad in ["", "plain", "a@b", "@x.com", "a@.com", "a@x.", "a b@x.com", "a@b@c.com"] {
            assert!(email("email", bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn should_reject_bad_domain_labels_and_local_characters() {
        for bad in ["a@b..com", "a@-x.com", "a\"b@x.com", "a,b@x.com"] {
            assert!(
                matches!(
                    email("contact email", bad),
                    Err(ValidationError::InvalidEmail { field: "contact email" })
                ),
                "{bad} should be rejected"
            );
        }
        assert_eq!(
            email("email", "first.o'neil+tag@sub.example.co.za").unwrap(),
            "first.o'neil+tag@sub.example.co.za"
        );
    }

    #[test]
    fn should_map_blank_optional_to_none() {
        assert_eq!(optional(Some("  ".to_string())), None);
        assert_eq!(optional(Some(" x ".to_string())), Some("x".to_string()));
    }

    #[test]
    fn should_name_field_when_required_value_missing() {
        assert_eq!(
            required("name", " "),
            Err(ValidationError::EmptyField { field: "name" })
        );
    }
}
