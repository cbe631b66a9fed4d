//! @acp:module "Init Command"
//! @acp:summary "Write a default docsync configuration"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `docsync init`.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::Config;

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Where to write the config
    pub config_path: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.config_path.exists() && !options.force {
        eprintln!(
            "{} Config file already exists. Use --force to overwrite.",
            style("✗").red()
        );
        std::process::exit(1);
    }

    let config = Config::default();
    config.save(&options.config_path)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        options.config_path.display()
    );

    let mut connections: Vec<_> = config.connections.iter().collect();
    connections.sort();
    for (name, path) in connections {
        println!(
            "  {} connection {} reads {}",
            style("→").cyan(),
            name,
            path.display()
        );
    }

    Ok(())
}
