//! Object and action validation
//!
//! Validates whole creation payloads before they reach the store.

use super::input::{
    ValidationResult, validate_action_identifier, validate_attribute_name, validate_description,
    validate_object_name, validate_route,
};
use crate::models::{NewAction, NewAttribute, NewObject};
use std::collections::HashSet;

/// Validate an object payload, including every attribute
pub fn validate_new_object(object: &NewObject) -> ValidationResult<()> {
    validate_object_name(&object.name)?;
    for attribute in &object.attributes {
        validate_new_attribute(attribute)?;
    }
    Ok(())
}

/// Validate a single attribute payload
pub fn validate_new_attribute(attribute: &NewAttribute) -> ValidationResult<()> {
    validate_attribute_name(&attribute.name)?;
    if let Some(desc) = &attribute.description {
        validate_description(desc)?;
    }
    Ok(())
}

/// Validate an action payload against an already resolved identifier
pub fn validate_new_action(action: &NewAction, identifier: &str) -> ValidationResult<()> {
    if action.friendly_name.trim().is_empty() {
        return Err(super::input::ValidationError::Empty("action name"));
    }
    validate_action_identifier(identifier)?;
    validate_route(&action.route)?;
    if let Some(desc) = &action.description {
        validate_description(desc)?;
    }
    Ok(())
}

/// Detect attribute names that appear more than once in a payload
///
/// Returns each duplicated name once, in order of its second occurrence.
pub fn find_duplicate_attribute_names(attributes: &[NewAttribute]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for attribute in attributes {
        if !seen.insert(attribute.name.as_str()) && !duplicates.contains(&attribute.name) {
            duplicates.push(attribute.name.clone());
        }
    }

    duplicates
}
