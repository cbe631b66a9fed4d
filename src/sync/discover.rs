//! @acp:module "Class Discovery"
//! @acp:summary "Enumerate the class files a run should process"
//! @acp:domain sync
//! @acp:layer service

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;

/// @acp:summary "How a class gets its property facts"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Columns from the schema source, plus the required mixins
    Model,
    /// Public instance properties declared in the class body
    Plain,
}

/// @acp:summary "One file to process"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    pub path: PathBuf,
    pub kind: ClassKind,
}

/// @acp:summary "Collect `.php` files under the configured roots"
///
/// Models come first, then the remaining classes, each sorted by path.
/// `class_filter` keeps only files whose stem equals the given name.
pub fn discover(root: &Path, config: &Config, class_filter: Option<&str>) -> Vec<ClassFile> {
    let mut files = Vec::new();
    let mut seen = Vec::new();

    for (dir, kind) in [
        (&config.models_root, ClassKind::Model),
        (&config.classes_root, ClassKind::Plain),
    ] {
        let base = root.join(dir);
        if !base.is_dir() {
            tracing::debug!("Skipping missing directory {}", base.display());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(&base)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "php"))
            .filter(|p| match class_filter {
                Some(name) => p.file_stem().is_some_and(|stem| stem == name),
                None => true,
            })
            .collect();
        found.sort();

        for path in found {
            if !seen.contains(&path) {
                seen.push(path.clone());
                files.push(ClassFile { path, kind });
            }
        }
    }

    files
}
