use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// CPF-style document, e.g. `123.456.789-00`
static DOCUMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").expect("valid document regex"));

/// Instructor registration number, e.g. `123456-G/SP`
static CREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}-\w/\w{2}$").expect("valid CREF regex"));

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_document(document: &str) -> Result<(), ValidationError> {
    if !DOCUMENT_PATTERN.is_match(document) {
        return Err(invalid(
            "document_format",
            "Document must follow the 000.000.000-00 format",
        ));
    }
    Ok(())
}

pub fn validate_cref(cref: &str) -> Result<(), ValidationError> {
    if !CREF_PATTERN.is_match(cref) {
        return Err(invalid("cref_format", "CREF must follow the 000000-X/XX format"));
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "Value cannot be blank"));
    }
    Ok(())
}
