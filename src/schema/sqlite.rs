//! @acp:module "SQLite Schema"
//! @acp:summary "Column listings read live from a SQLite database"
//! @acp:domain schema
//! @acp:layer service

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::{DocsyncError, Result};

use super::{Column, SchemaSource};

/// @acp:summary "Schema source backed by a read-only SQLite connection"
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl SchemaSource for SqliteSource {
    fn columns(&mut self, table: &str) -> Result<Vec<Column>> {
        let mut stmt = self.conn.prepare("SELECT name, type FROM pragma_table_info(?1)")?;
        let columns = stmt
            .query_map([table], |row| Ok(Column::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(DocsyncError::Schema(format!("table {} not found", table)));
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_info() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(100), score REAL);")
            .unwrap();

        let mut source = SqliteSource::from_connection(conn);
        let columns = source.columns("users").unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "score"]);
        assert_eq!(columns[1].native_type, "VARCHAR(100)");
    }

    #[test]
    fn test_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let mut source = SqliteSource::from_connection(conn);
        assert!(source.columns("nope").is_err());
    }
}
