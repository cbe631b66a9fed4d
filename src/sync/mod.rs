//! @acp:module "Doc Sync"
//! @acp:summary "Per-file orchestration of scanning, merging and splicing"
//! @acp:domain sync
//! @acp:layer service
//!
//! ## Overview
//!
//! For every discovered class file the executor:
//!
//! 1. scans the declaration ([`Parser`])
//! 2. obtains property facts (schema columns for models, public properties otherwise)
//! 3. renders the canonical class block and splices it over the previous one
//! 4. synthesizes blocks for undocumented public methods and splices each in
//! 5. writes the file when its content changed
//!
//! A failed splice anywhere leaves the whole file untouched. No per-file
//! failure stops the run.

pub mod discover;
pub mod splice;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub use discover::{discover, ClassFile, ClassKind};
pub use splice::{splice, splice_required, PatchResult};

use crate::config::Config;
use crate::docblock::{synthesize_method_block, ClassBlock, Discovery, PropertyFact};
use crate::error::{DocsyncError, Result};
use crate::parse::{ClassDecl, Parser};
use crate::schema::{default_table_name, map_native_type, SchemaCache, SchemaSource};

/// @acp:summary "What happened to one file"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOutcome {
    /// Content changed (written, or would be in a dry run)
    Patched,
    Unchanged,
    /// A previous annotation text was not found in the source
    NoSpliceMatch,
    /// A previous annotation text was found more than once
    Ambiguous,
    /// No namespace or class declaration could be read
    Malformed,
    /// The file is read-only or could not be written
    NotWritable,
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileOutcome::Patched => "patched",
            FileOutcome::Unchanged => "unchanged",
            FileOutcome::NoSpliceMatch => "no match",
            FileOutcome::Ambiguous => "ambiguous",
            FileOutcome::Malformed => "malformed",
            FileOutcome::NotWritable => "not writable",
        };
        write!(f, "{}", label)
    }
}

/// @acp:summary "Result of processing one file"
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: ClassKind,
    pub outcome: FileOutcome,
    /// Source as read
    pub original: String,
    /// Source after splicing; equal to `original` unless patched
    pub updated: String,
    /// Property facts could not be obtained for the class
    pub metadata_unavailable: bool,
}

impl FileReport {
    pub fn changed(&self) -> bool {
        self.original != self.updated
    }
}

/// @acp:summary "Counters over a whole run"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub patched: usize,
    pub unchanged: usize,
    pub no_match: usize,
    pub ambiguous: usize,
    pub malformed: usize,
    pub not_writable: usize,
    pub metadata_unavailable: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &FileReport) {
        match report.outcome {
            FileOutcome::Patched => self.patched += 1,
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::NoSpliceMatch => self.no_match += 1,
            FileOutcome::Ambiguous => self.ambiguous += 1,
            FileOutcome::Malformed => self.malformed += 1,
            FileOutcome::NotWritable => self.not_writable += 1,
        }
        if report.metadata_unavailable {
            self.metadata_unavailable += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.patched
            + self.unchanged
            + self.no_match
            + self.ambiguous
            + self.malformed
            + self.not_writable
    }

    /// Files that were skipped for any reason
    pub fn skipped(&self) -> usize {
        self.no_match + self.ambiguous + self.malformed + self.not_writable
    }
}

/// @acp:summary "All file reports of a run plus their summary"
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub summary: RunSummary,
}

/// Rendered text of one file
#[derive(Debug)]
struct Rendered {
    text: String,
    metadata_unavailable: bool,
}

/// Main sync executor - owns the scanner and the per-run schema cache
pub struct SyncExecutor {
    root: PathBuf,
    config: Config,
    parser: Parser,
    schemas: SchemaCache,
}

impl SyncExecutor {
    /// Create an executor for the project at `root`
    pub fn new(root: &Path, config: Config) -> Self {
        let connections: HashMap<String, PathBuf> = config.connections.clone();
        Self {
            root: root.to_path_buf(),
            schemas: SchemaCache::new(root, connections),
            parser: Parser::new(),
            config,
        }
    }

    /// Serve `connection` from an already-open source
    pub fn with_schema(mut self, connection: &str, source: Box<dyn SchemaSource>) -> Self {
        self.schemas.insert(connection, source);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Files this executor would process
    pub fn discover(&self, class_filter: Option<&str>) -> Vec<ClassFile> {
        discover(&self.root, &self.config, class_filter)
    }

    /// @acp:summary "Process every discovered file"
    pub fn run(&mut self, class_filter: Option<&str>, write: bool) -> RunReport {
        let mut report = RunReport::default();
        for file in self.discover(class_filter) {
            let file_report = self.process_file(&file, write);
            report.summary.record(&file_report);
            report.files.push(file_report);
        }
        report
    }

    /// @acp:summary "Read, merge and (optionally) write one file"
    pub fn process_file(&mut self, file: &ClassFile, write: bool) -> FileReport {
        let original = match std::fs::read_to_string(&file.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", file.path.display(), e);
                return FileReport {
                    path: file.path.clone(),
                    kind: file.kind,
                    outcome: FileOutcome::Malformed,
                    original: String::new(),
                    updated: String::new(),
                    metadata_unavailable: false,
                };
            }
        };

        let mut report = FileReport {
            path: file.path.clone(),
            kind: file.kind,
            outcome: FileOutcome::Unchanged,
            updated: original.clone(),
            original,
            metadata_unavailable: false,
        };

        let rendered = match self.process_source(&file.path, file.kind, &report.original) {
            Ok(rendered) => rendered,
            Err(e) => {
                report.outcome = match e {
                    DocsyncError::NoSpliceMatch => FileOutcome::NoSpliceMatch,
                    DocsyncError::AmbiguousSpliceMatch { .. } => FileOutcome::Ambiguous,
                    _ => FileOutcome::Malformed,
                };
                tracing::warn!("Skipping {}: {}", file.path.display(), e);
                return report;
            }
        };

        report.metadata_unavailable = rendered.metadata_unavailable;
        if rendered.text == report.original {
            tracing::debug!("{} already up to date", file.path.display());
            return report;
        }

        if write {
            if let Err(e) = persist(&file.path, &rendered.text) {
                tracing::warn!("Cannot write {}: {}", file.path.display(), e);
                report.outcome = FileOutcome::NotWritable;
                return report;
            }
        }
        report.updated = rendered.text;
        report.outcome = FileOutcome::Patched;
        report
    }

    /// Merge all annotation blocks of `content` without touching the disk
    fn process_source(&mut self, path: &Path, kind: ClassKind, content: &str) -> Result<Rendered> {
        let decl = self.parser.parse_source(path, content)?;
        tracing::debug!("Processing {} ({:?})", decl.name, kind);

        let discovery = match kind {
            ClassKind::Model => model_discovery(&mut self.schemas, &self.config, &decl),
            ClassKind::Plain => Discovery::Discovered(decl.properties.clone()),
        };
        let mixins: &[String] = match kind {
            ClassKind::Model => &self.config.mixins,
            ClassKind::Plain => &[],
        };
        // Only models get a description placeholder
        let placeholder: &str = match kind {
            ClassKind::Model => &self.config.placeholder,
            ClassKind::Plain => "",
        };

        let block = ClassBlock {
            name: &decl.name,
            namespace: &decl.namespace,
            existing: decl.doc.as_deref(),
            discovery: &discovery,
            mixins,
            placeholder,
        }
        .render();

        let mut text = splice_required(content, &decl.previous, &decl.class_replacement(&block))?;

        for method in &decl.methods {
            let Some(block) = synthesize_method_block(method, &decl.name, &decl.imports) else {
                continue;
            };
            tracing::debug!("Adding block to {}::{}", decl.name, method.name);
            let replacement = format!("{}{}{}", decl.with_newlines(&block), decl.newline, method.anchor);
            text = splice_required(&text, &method.anchor, &replacement)?;
        }

        Ok(Rendered {
            text,
            metadata_unavailable: matches!(discovery, Discovery::Unavailable(_)),
        })
    }
}

impl fmt::Debug for SyncExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncExecutor")
            .field("root", &self.root)
            .field("schemas", &self.schemas)
            .finish()
    }
}

/// Column facts of a model, or the reason they are missing
fn model_discovery(schemas: &mut SchemaCache, config: &Config, decl: &ClassDecl) -> Discovery {
    let connection = decl
        .connection
        .clone()
        .unwrap_or_else(|| config.default_connection.clone());
    let table = decl
        .table
        .clone()
        .unwrap_or_else(|| default_table_name(&decl.name));

    match schemas.columns(&connection, &table) {
        Ok(columns) => Discovery::Discovered(
            columns
                .iter()
                .map(|c| PropertyFact::new(&c.name, map_native_type(&c.native_type).as_str()))
                .collect(),
        ),
        Err(e) => {
            let err = DocsyncError::MetadataUnavailable {
                class: decl.name.clone(),
                reason: e.to_string(),
            };
            tracing::warn!("{}", err);
            Discovery::Unavailable(err.to_string())
        }
    }
}

fn persist(path: &Path, content: &str) -> Result<()> {
    if std::fs::metadata(path)?.permissions().readonly() {
        return Err(DocsyncError::Other(format!("{} is read-only", path.display())));
    }
    std::fs::write(path, content)?;
    Ok(())
}
