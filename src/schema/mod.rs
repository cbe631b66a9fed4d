//! @acp:module "Schema"
//! @acp:summary "Column listings for models and native-type mapping"
//! @acp:domain schema
//! @acp:layer service
//!
//! A model's columns come from the schema source registered for its
//! connection name. Sources are opened lazily and cached for the whole run;
//! the cache is never invalidated mid-run.

pub mod snapshot;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsyncError, Result};

pub use snapshot::SnapshotSource;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;

/// @acp:summary "One column of a table"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Type as reported by the database, e.g. `bigint unsigned`
    #[serde(rename = "type")]
    pub native_type: String,
}

impl Column {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
        }
    }
}

/// @acp:summary "Coarse annotation type of a column"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhpType {
    Int,
    Float,
    Bool,
    String,
}

impl PhpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhpType::Int => "int",
            PhpType::Float => "float",
            PhpType::Bool => "bool",
            PhpType::String => "string",
        }
    }
}

impl fmt::Display for PhpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered substring rules; the first rule with a matching needle wins.
const TYPE_RULES: &[(&[&str], PhpType)] = &[
    (&["int"], PhpType::Int),
    (&["decimal", "double", "float", "real", "numeric"], PhpType::Float),
    (&["bool"], PhpType::Bool),
    (&["char", "text", "timestamp", "date", "time", "json", "enum"], PhpType::String),
];

/// @acp:summary "Map a native column type to its annotation type"
pub fn map_native_type(native: &str) -> PhpType {
    let native = native.to_lowercase();
    TYPE_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| native.contains(n)))
        .map(|(_, php)| *php)
        .unwrap_or(PhpType::String)
}

/// Conventional table name of a model: snake_case, pluralized.
pub fn default_table_name(class: &str) -> String {
    let mut snake = String::new();
    for (i, ch) in class.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    pluralize(&snake)
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// @acp:summary "A backing store able to list a table's columns"
pub trait SchemaSource {
    /// Columns of `table` in definition order
    fn columns(&mut self, table: &str) -> Result<Vec<Column>>;
}

/// @acp:summary "Per-run cache of opened schema sources keyed by connection"
pub struct SchemaCache {
    root: PathBuf,
    connections: HashMap<String, PathBuf>,
    opened: HashMap<String, Box<dyn SchemaSource>>,
}

impl SchemaCache {
    /// `connections` maps connection names to schema files relative to `root`
    pub fn new(root: &Path, connections: HashMap<String, PathBuf>) -> Self {
        Self {
            root: root.to_path_buf(),
            connections,
            opened: HashMap::new(),
        }
    }

    /// Register an already-open source under `connection`
    pub fn insert(&mut self, connection: &str, source: Box<dyn SchemaSource>) {
        self.opened.insert(connection.to_string(), source);
    }

    /// Number of sources opened so far
    pub fn opened(&self) -> usize {
        self.opened.len()
    }

    /// @acp:summary "Columns of `table` on `connection`, opening the source on first use"
    pub fn columns(&mut self, connection: &str, table: &str) -> Result<Vec<Column>> {
        if !self.opened.contains_key(connection) {
            let source = self.open(connection)?;
            tracing::debug!("Opened schema source for connection {}", connection);
            self.opened.insert(connection.to_string(), source);
        }
        match self.opened.get_mut(connection) {
            Some(source) => source.columns(table),
            None => Err(DocsyncError::Schema(format!("connection {} unavailable", connection))),
        }
    }

    fn open(&self, connection: &str) -> Result<Box<dyn SchemaSource>> {
        let path = self
            .connections
            .get(connection)
            .map(|p| self.root.join(p))
            .ok_or_else(|| {
                DocsyncError::Schema(format!("no schema configured for connection {}", connection))
            })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Box::new(SnapshotSource::load(&path)?)),
            #[cfg(feature = "sqlite")]
            Some("sqlite" | "sqlite3" | "db") => Ok(Box::new(SqliteSource::open(&path)?)),
            _ => Err(DocsyncError::Schema(format!(
                "unsupported schema source: {}",
                path.display()
            ))),
        }
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("root", &self.root)
            .field("connections", &self.connections)
            .field("opened", &self.opened.keys().collect::<Vec<_>>())
            .finish()
    }
}
