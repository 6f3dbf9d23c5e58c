//! Sails.js model exporter.
//!
//! Generates one `api/models/<Object>.js` file per object. The text is built
//! purely from the object name and its attributes, in the order given, so the
//! same input always yields byte-identical output.

use super::GeneratedFile;
use super::types::map_type;
use crate::models::{Attribute, Object};
use std::fmt::Write;

/// Directory of model files inside a Sails.js project
pub const MODELS_DIR: &str = "api/models";

/// File extension of generated model files
pub const MODEL_EXTENSION: &str = "js";

const INDENT: &str = "    ";

/// Exporter for Sails.js model definitions.
pub struct SailsModelExporter;

impl SailsModelExporter {
    /// Path of an object's model file relative to the project root.
    pub fn model_path(object: &Object) -> String {
        format!("{}/{}", MODELS_DIR, Self::file_name(object))
    }

    /// File name of an object's model file.
    pub fn file_name(object: &Object) -> String {
        format!("{}.{}", object.name, MODEL_EXTENSION)
    }

    /// Export an object to a Sails.js model definition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use api_creator_sdk::export::sails::SailsModelExporter;
    /// use api_creator_sdk::models::{Attribute, AttributeType, Object};
    ///
    /// let object = Object {
    ///     id: 1,
    ///     name: "User".to_string(),
    ///     project_id: 1,
    ///     owner: 1,
    ///     created_at: chrono::Utc::now(),
    /// };
    /// let attributes = vec![Attribute::new(1, 1, "email", AttributeType::Text).required()];
    ///
    /// let js = SailsModelExporter::export_object(&object, &attributes);
    /// assert!(js.contains("email: { type: 'string', required: true },"));
    /// ```
    pub fn export_object(object: &Object, attributes: &[Attribute]) -> String {
        let mut js = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(js, "// {}", Self::model_path(object));
        js.push('\n');
        js.push_str("module.exports = {\n");
        let _ = write!(js, "{}attributes: {{", INDENT);

        for attribute in attributes {
            let _ = write!(
                js,
                "\n{}{}{}: {{ type: '{}', required: {} }},",
                INDENT,
                INDENT,
                attribute.name,
                map_type(attribute.attribute_type),
                attribute.required
            );
        }

        let _ = write!(js, "\n{}}}\n}}\n", INDENT);
        js
    }

    /// Export an object to a generated file at its model path.
    pub fn export_file(object: &Object, attributes: &[Attribute]) -> GeneratedFile {
        GeneratedFile {
            path: Self::model_path(object),
            content: Self::export_object(object, attributes),
        }
    }
}
