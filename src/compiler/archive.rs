//! Zip assembly of compiled projects
//!
//! Entries are written in the order given, with a fixed modification time and
//! fixed permissions, so unchanged input produces byte-identical archives.

use crate::config::ArchiveCompression;
use std::io::{Cursor, Write};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Permissions recorded for every entry
const ENTRY_PERMISSIONS: u32 = 0o644;

/// A file to place in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive
    pub name: String,
    pub content: Vec<u8>,
}

/// Path of a generated file inside a project's archive:
/// `<project-name>/<path>`
pub fn entry_name(project_name: &str, path: &str) -> String {
    format!("{}/{}", project_name, path)
}

/// Build a zip archive in memory
pub fn build_archive(entries: &[ArchiveEntry], compression: ArchiveCompression) -> ZipResult<Vec<u8>> {
    let method = match compression {
        ArchiveCompression::Deflated => CompressionMethod::Deflated,
        ArchiveCompression::Stored => CompressionMethod::Stored,
    };
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.content)?;
    }

    Ok(writer.finish()?.into_inner())
}
