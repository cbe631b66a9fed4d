#![forbid(unsafe_code)]

//! @acp:module "docsync Library"
//! @acp:summary "Synthesize and merge PHPDoc annotation blocks for PHP classes"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # docsync
//!
//! Keeps the `/** ... */` blocks above PHP classes and methods in step with
//! what the class actually exposes, without losing anything a human wrote.
//!
//! ## Features
//!
//! - **Models**: `@property` tags from table columns, plus the required `@mixin`
//! - **Classes**: `@property` tags from public properties
//! - **Methods**: `@param` / `@return` blocks for undocumented public methods
//! - **Canonical layout**: fixed tag order, column-aligned variable names
//! - **Safe splicing**: a file is only touched when its old text matches exactly once
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use docsync::{Config, SyncExecutor};
//!
//! let mut executor = SyncExecutor::new(Path::new("."), Config::default());
//! let report = executor.run(None, true);
//! println!("patched {} files", report.summary.patched);
//! ```

pub mod commands;
pub mod config;
pub mod docblock;
pub mod error;
pub mod parse;
pub mod schema;
pub mod sync;

// Re-exports
pub use config::Config;
pub use docblock::{
    align_lines, assemble, group_tags, reconcile_properties, synthesize_method_block, ClassBlock,
    Discovery, MethodSignature, MixinRequirement, OrderSpec, Parameter, PropertyFact, TagGroups,
    CLASS_ORDER, METHOD_ORDER,
};
pub use error::{DocsyncError, Result};
pub use parse::{ClassDecl, ImportTable, Parser};
pub use schema::{map_native_type, Column, PhpType, SchemaCache, SchemaSource, SnapshotSource};
pub use sync::{
    splice, ClassFile, ClassKind, FileOutcome, FileReport, PatchResult, RunReport, RunSummary,
    SyncExecutor,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
