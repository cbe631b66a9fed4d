#![forbid(unsafe_code)]
//! docsync Command Line Interface

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use docsync::commands::{execute_init, execute_sync, InitOptions, SyncOptions};
use docsync::Config;

#[derive(Parser)]
#[command(name = "docsync")]
#[command(about = "Synthesize and merge PHPDoc annotation blocks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".docsync.config.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .docsync.config.json
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Merge annotation blocks into class files
    Sync {
        /// Only process the class with this name
        #[arg(long)]
        class: Option<String>,

        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Print a diff instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Exit with status 1 when any annotation block is out of date
    Check {
        /// Only check the class with this name
        #[arg(long)]
        class: Option<String>,

        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "docsync=debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?)
    } else {
        Ok(Config::default())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { force } => {
            execute_init(InitOptions {
                config_path: cli.config,
                force,
            })?;
        }

        Commands::Sync { class, root, dry_run } => {
            let options = SyncOptions {
                root,
                class,
                dry_run,
                check: false,
                verbose: cli.verbose,
            };
            execute_sync(options, load_config(&cli.config)?)?;
        }

        Commands::Check { class, root } => {
            let options = SyncOptions {
                root,
                class,
                dry_run: false,
                check: true,
                verbose: cli.verbose,
            };
            if let Err(e) = execute_sync(options, load_config(&cli.config)?) {
                eprintln!("{} {}", style("✗").red(), e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
