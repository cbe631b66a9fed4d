//! @acp:module "Schema Snapshot"
//! @acp:summary "Column listings read from a JSON schema dump"
//! @acp:domain schema
//! @acp:layer service
//!
//! A snapshot maps table names to their columns:
//!
//! ```json
//! { "users": [ { "name": "id", "type": "bigint unsigned" } ] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{DocsyncError, Result};

use super::{Column, SchemaSource};

/// @acp:summary "Schema source backed by a JSON file"
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    tables: BTreeMap<String, Vec<Column>>,
}

impl SnapshotSource {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let tables = serde_json::from_str(content)?;
        Ok(Self { tables })
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl SchemaSource for SnapshotSource {
    fn columns(&mut self, table: &str) -> Result<Vec<Column>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| DocsyncError::Schema(format!("table {} not found in snapshot", table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "users": [
            { "name": "id", "type": "bigint unsigned" },
            { "name": "email", "type": "varchar(255)" }
        ],
        "posts": []
    }"#;

    #[test]
    fn test_columns_in_definition_order() {
        let mut source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        let columns = source.columns("users").unwrap();
        assert_eq!(
            columns,
            vec![
                Column::new("id", "bigint unsigned"),
                Column::new("email", "varchar(255)"),
            ]
        );
        assert!(source.columns("posts").unwrap().is_empty());
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let mut source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        assert!(matches!(source.columns("comments"), Err(DocsyncError::Schema(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let source = SnapshotSource::load(file.path()).unwrap();
        let tables: Vec<_> = source.tables().collect();
        assert_eq!(tables, vec!["posts", "users"]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SnapshotSource::from_json("{ not json"),
            Err(DocsyncError::Json(_))
        ));
    }
}
