//! Output formatting for CLI

use crate::compiler::{CompiledArchive, GeneratedProject};
use std::path::Path;

/// Summary printed after a compile
pub fn format_compile_summary(archive: &CompiledArchive, output: &Path) -> String {
    let mut summary = format!(
        "✅ Wrote {} ({} bytes, {} model file(s))\n",
        output.display(),
        archive.bytes.len(),
        archive.entries.len()
    );
    for entry in &archive.entries {
        summary.push_str(&format!("  - {}\n", entry));
    }
    summary
}

/// Every generated file, each preceded by a `==> path <==` banner
pub fn format_emitted(generated: &GeneratedProject) -> String {
    let mut output = String::new();
    for (idx, model) in generated.models.iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "==> {}/{} <==\n",
            generated.project.name, model.file.path
        ));
        output.push_str(&model.file.content);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_summary_lists_entries() {
        let archive = CompiledArchive {
            file_name: "Shop.zip".to_string(),
            bytes: vec![0; 10],
            entries: vec![
                "Shop/api/models/Item.js".to_string(),
                "Shop/api/models/Cart.js".to_string(),
            ],
        };
        let summary = format_compile_summary(&archive, Path::new("Shop.zip"));
        assert!(summary.starts_with("✅ Wrote Shop.zip (10 bytes, 2 model file(s))\n"));
        assert!(summary.ends_with("  - Shop/api/models/Cart.js\n"));
    }
}
