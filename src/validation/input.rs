//! Input validation for schema mutations.
//!
//! Object and attribute names end up verbatim in generated JavaScript and in
//! staged file paths, so they are restricted to identifier characters. Project
//! names become the top-level directory of the downloaded archive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length for project names
pub const MAX_PROJECT_NAME_LENGTH: usize = 30;

/// Maximum length for object and attribute names
pub const MAX_IDENTIFIER_LENGTH: usize = 30;

/// Maximum length for action identifiers
pub const MAX_ACTION_IDENTIFIER_LENGTH: usize = 50;

/// Maximum length for action routes
pub const MAX_ROUTE_LENGTH: usize = 255;

/// Maximum length for descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 10000;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Empty(field) => field,
            ValidationError::TooLong { field, .. } => field,
            ValidationError::InvalidCharacters { field, .. } => field,
            ValidationError::InvalidFormat(field, _) => field,
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_length(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Validate a project name.
///
/// # Rules
///
/// - Must not be empty or whitespace only
/// - Must not exceed 30 characters
/// - Must not contain path separators or control characters
/// - Must not start with a period
///
/// # Examples
///
/// ```
/// use api_creator_sdk::validation::input::validate_project_name;
///
/// assert!(validate_project_name("Pet Store").is_ok());
/// assert!(validate_project_name("").is_err());
/// assert!(validate_project_name("../etc").is_err());
/// ```
pub fn validate_project_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("project name"));
    }

    check_length("project name", name, MAX_PROJECT_NAME_LENGTH)?;

    if name.starts_with('.') {
        return Err(ValidationError::InvalidFormat(
            "project name",
            "must not start with a period".to_string(),
        ));
    }

    if let Some(c) = name
        .chars()
        .find(|c| *c == '/' || *c == '\\' || c.is_control())
    {
        return Err(ValidationError::InvalidCharacters {
            field: "project name",
            reason: format!("invalid character: {:?}", c),
        });
    }

    Ok(())
}

/// Validate a name that is emitted as a JavaScript identifier.
fn validate_identifier(field: &'static str, name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    check_length(field, name, MAX_IDENTIFIER_LENGTH)?;

    let first_char = match name.chars().next() {
        Some(c) => c,
        None => return Err(ValidationError::Empty(field)),
    };
    if !first_char.is_ascii_alphabetic() && first_char != '_' && first_char != '$' {
        return Err(ValidationError::InvalidFormat(
            field,
            "must start with a letter, underscore or dollar sign".to_string(),
        ));
    }

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '$' {
            return Err(ValidationError::InvalidCharacters {
                field,
                reason: format!("invalid character: '{}'", c),
            });
        }
    }

    Ok(())
}

/// Validate an object name.
///
/// # Examples
///
/// ```
/// use api_creator_sdk::validation::input::validate_object_name;
///
/// assert!(validate_object_name("User").is_ok());
/// assert!(validate_object_name("order_item").is_ok());
/// assert!(validate_object_name("9lives").is_err());
/// assert!(validate_object_name("my-object").is_err());
/// ```
pub fn validate_object_name(name: &str) -> ValidationResult<()> {
    validate_identifier("object name", name)
}

/// Validate an attribute name.
pub fn validate_attribute_name(name: &str) -> ValidationResult<()> {
    validate_identifier("attribute name", name)
}

/// Validate a URL-safe action identifier (kebab-case).
///
/// # Examples
///
/// ```
/// use api_creator_sdk::validation::input::validate_action_identifier;
///
/// assert!(validate_action_identifier("list-users").is_ok());
/// assert!(validate_action_identifier("List Users").is_err());
/// assert!(validate_action_identifier("-users").is_err());
/// ```
pub fn validate_action_identifier(identifier: &str) -> ValidationResult<()> {
    if identifier.is_empty() {
        return Err(ValidationError::Empty("action identifier"));
    }

    check_length(
        "action identifier",
        identifier,
        MAX_ACTION_IDENTIFIER_LENGTH,
    )?;

    if let Some(c) = identifier
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
    {
        return Err(ValidationError::InvalidCharacters {
            field: "action identifier",
            reason: format!("invalid character: '{}'", c),
        });
    }

    if identifier.starts_with('-') || identifier.ends_with('-') || identifier.contains("--") {
        return Err(ValidationError::InvalidFormat(
            "action identifier",
            "hyphens must separate words".to_string(),
        ));
    }

    Ok(())
}

/// Validate an action route.
///
/// Routes must be absolute and must not contain whitespace.
pub fn validate_route(route: &str) -> ValidationResult<()> {
    if route.is_empty() {
        return Err(ValidationError::Empty("route"));
    }

    check_length("route", route, MAX_ROUTE_LENGTH)?;

    if !route.starts_with('/') {
        return Err(ValidationError::InvalidFormat(
            "route",
            "must start with '/'".to_string(),
        ));
    }

    if let Some(c) = route.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidCharacters {
            field: "route",
            reason: format!("invalid character: {:?}", c),
        });
    }

    Ok(())
}

/// Validate a description string.
pub fn validate_description(desc: &str) -> ValidationResult<()> {
    check_length("description", desc, MAX_DESCRIPTION_LENGTH)
}

/// Sanitize a string for use as a single file name.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_rules() {
        assert!(validate_project_name("Default Project").is_ok());
        assert_eq!(
            validate_project_name("   "),
            Err(ValidationError::Empty("project name"))
        );
        assert!(matches!(
            validate_project_name(&"p".repeat(31)),
            Err(ValidationError::TooLong { max: 30, actual: 31, .. })
        ));
        assert!(matches!(
            validate_project_name(".hidden"),
            Err(ValidationError::InvalidFormat("project name", _))
        ));
        assert!(matches!(
            validate_project_name("a\\b"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_attribute_name("createdBy").is_ok());
        assert!(validate_attribute_name("_private").is_ok());
        assert!(validate_attribute_name("$ref").is_ok());
        assert_eq!(
            validate_attribute_name(""),
            Err(ValidationError::Empty("attribute name"))
        );
        assert!(matches!(
            validate_attribute_name("first name"),
            Err(ValidationError::InvalidCharacters { field: "attribute name", .. })
        ));
        assert!(matches!(
            validate_object_name("Ünicode"),
            Err(ValidationError::InvalidFormat("object name", _))
        ));
    }

    #[test]
    fn test_action_identifier_rules() {
        assert!(validate_action_identifier("get-user-2").is_ok());
        assert!(validate_action_identifier("users").is_ok());
        assert!(validate_action_identifier("get--user").is_err());
        assert!(validate_action_identifier("get-user-").is_err());
        assert!(validate_action_identifier("get_user").is_err());
    }

    #[test]
    fn test_route_rules() {
        assert!(validate_route("/users/:id").is_ok());
        assert!(validate_route("users").is_err());
        assert!(validate_route("/users list").is_err());
        assert_eq!(validate_route(""), Err(ValidationError::Empty("route")));
    }

    #[test]
    fn test_error_names_field() {
        let err = validate_route("x").unwrap_err();
        assert_eq!(err.field(), "route");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
        assert_eq!(sanitize_filename("Pet Store"), "Pet Store");
    }
}
