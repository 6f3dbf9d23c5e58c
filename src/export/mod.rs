//! Export functionality
//!
//! Provides the source generator for the supported target framework:
//! - Sails.js models (`api/models/<Object>.js`)

pub mod sails;
pub mod types;

/// A generated source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the generated project root
    pub path: String,
    /// File content (UTF-8 source text)
    pub content: String,
}

// Re-export for convenience
pub use sails::SailsModelExporter;
pub use types::map_type;
