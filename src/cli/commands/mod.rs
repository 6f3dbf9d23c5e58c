//! CLI command implementations

pub mod compile;
pub mod emit;

pub use compile::{CompileArgs, handle_compile};
pub use emit::handle_emit;

use crate::cli::error::CliError;
use crate::store::{InMemorySchemaStore, SchemaSnapshot};
use std::io::Read;
use std::path::Path;

/// Load a schema snapshot from a JSON file, or from stdin when `path` is `-`
pub fn load_snapshot(path: &Path) -> Result<InMemorySchemaStore, CliError> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
        content
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?
    };

    let snapshot: SchemaSnapshot =
        serde_json::from_str(&content).map_err(|e| CliError::InvalidSnapshot(e.to_string()))?;
    Ok(InMemorySchemaStore::from_snapshot(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SchemaStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "projects": [{{"id": 1, "name": "Shop", "owner": 7}}],
                "objects": [{{"id": 1, "name": "Item", "project_id": 1, "owner": 7}}],
                "attributes": [{{"id": 1, "object_id": 1, "owner": 7, "name": "price", "type": 3}}]
            }}"#
        )
        .unwrap();

        let store = load_snapshot(file.path()).unwrap();
        let attributes = store.list_attributes(7, 1).await.unwrap();
        assert_eq!(attributes[0].name, "price");
    }

    #[test]
    fn test_load_snapshot_errors() {
        assert!(matches!(
            load_snapshot(Path::new("/nonexistent/schema.json")),
            Err(CliError::FileReadError(..))
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_snapshot(file.path()),
            Err(CliError::InvalidSnapshot(_))
        ));
    }
}
