//! Validation functionality
//!
//! Provides validation logic for:
//! - Input validation (names, identifiers, routes, descriptions)
//! - Object and action payloads (including duplicate attribute names)

pub mod input;
pub mod objects;

pub use input::{
    ValidationError, ValidationResult, sanitize_filename, validate_action_identifier,
    validate_attribute_name, validate_description, validate_object_name, validate_project_name,
    validate_route,
};
pub use objects::{
    find_duplicate_attribute_names, validate_new_action, validate_new_attribute,
    validate_new_object,
};
