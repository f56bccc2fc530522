use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::core::error::AppError;

lazy_static! {
    /// Regex for Egyptian mobile numbers
    /// Eleven digits starting with 010, 011, 012 or 015
    /// - Valid: "01012345678", "01198765432", "01500000000"
    /// - Invalid: "0101234567", "01312345678", "+201012345678", "0101234567a"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^01[0125][0-9]{8}$").unwrap();
}

/// Rejects strings that are empty once surrounding whitespace is removed.
/// Used as a `validator` custom function on required text fields.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Trims a required text field, failing with a validation error naming it when blank
pub fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Same as [`required_text`], also rejecting values longer than `max` characters
pub fn required_text_max(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<String, AppError> {
    let value = required_text(field, value)?;
    ensure_max_length(field, &value, max)?;
    Ok(value)
}

/// Same as [`optional_text`], also rejecting values longer than `max` characters
pub fn optional_text_max(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, AppError> {
    let value = optional_text(value);
    if let Some(v) = &value {
        ensure_max_length(field, v, max)?;
    }
    Ok(value)
}

/// Length is counted in characters, matching `VARCHAR(n)`
fn ensure_max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must not exceed {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Trims an optional text field, mapping blank input to `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalizes a phone number by dropping spaces and dashes before matching
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("01012345678"));
        assert!(PHONE_REGEX.is_match("01198765432"));
        assert!(PHONE_REGEX.is_match("01234567890"));
        assert!(PHONE_REGEX.is_match("01500000000"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("0101234567")); // too short
        assert!(!PHONE_REGEX.is_match("010123456789")); // too long
        assert!(!PHONE_REGEX.is_match("01312345678")); // unknown operator
        assert!(!PHONE_REGEX.is_match("+201012345678")); // country code
        assert!(!PHONE_REGEX.is_match("0101234567a")); // letter
        assert!(!PHONE_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("010 1234-5678"), "01012345678");
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("تسرب مياه").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(
            required_text("title", Some("  تسرب مياه ".to_string())).unwrap(),
            "تسرب مياه"
        );
        assert!(matches!(
            required_text("title", Some("  ".to_string())),
            Err(AppError::Validation(_))
        ));
        assert!(required_text("title", None).is_err());
    }

    #[test]
    fn test_text_length_counts_characters() {
        let arabic = "م".repeat(255);
        assert_eq!(
            required_text_max("title", Some(arabic.clone()), 255).unwrap(),
            arabic
        );
        assert!(matches!(
            required_text_max("title", Some("a".repeat(256)), 255),
            Err(AppError::Validation(_))
        ));
        assert_eq!(optional_text_max("area", Some("  ".to_string()), 255).unwrap(), None);
        assert!(optional_text_max("area", Some("x".repeat(300)), 255).is_err());
    }

    #[test]
    fn test_optional_text_drops_blank() {
        assert_eq!(optional_text(Some(" ".to_string())), None);
        assert_eq!(optional_text(Some(" a ".to_string())), Some("a".to_string()));
    }
}
