// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! vislib: Screenshot Ingester & Visual Reference Catalog
//!
//! Running without a subcommand performs one ingestion pass using the
//! configuration file.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use vislib::config::AppConfig;
use vislib::history::History;
use vislib::ingest::{FileDescriptor, Ingestor};
use vislib::publish::GitPublisher;
use vislib::report;
use vislib::resolve::PathResolver;
use vislib::{Result, VislibError};

/// vislib CLI - Screenshot Ingester & Visual Reference Catalog
#[derive(Parser, Debug)]
#[command(name = "vislib")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Categorize screenshots, publish them and keep a markdown catalog", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "vislib.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest new screenshots and append them to the catalog
    Ingest {
        /// Show what would be copied without touching disk
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how filenames would be classified
    Classify {
        /// Filenames to classify
        #[arg(required = true)]
        filenames: Vec<String>,
    },

    /// Copy history
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Initialize a new vislib setup
    Init {
        /// Directory to initialize (default: current)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Force overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent history entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Clear all history
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "vislib.json")]
        output: PathBuf,

        /// Use the two-folder (examples/reference) taxonomy
        #[arg(long)]
        flat: bool,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if !cli.quiet {
        info!("vislib v1.0.0");
    }

    // Init runs before a config exists
    if let Some(Commands::Init { dir, force }) = &cli.command {
        run_init(dir.clone(), *force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Ingest { dry_run }) => run_ingest(&config, dry_run, &cli.format),
        Some(Commands::Classify { filenames }) => {
            run_classify(&config, &filenames, &cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::History { action }) => {
            run_history_command(&config, action)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config { action }) => {
            run_config_command(&config, action, &cli.config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Init { .. }) => Ok(ExitCode::SUCCESS),
        None => run_ingest(&config, false, &cli.format),
    }
}

/// Run one ingestion pass
fn run_ingest(config: &AppConfig, dry_run: bool, format: &str) -> Result<ExitCode> {
    info!("Source: {:?}", config.source_dir());
    info!("Catalog: {:?}", config.catalog_path());

    let publisher = GitPublisher::from_config(config);
    let report = Ingestor::new(config, &publisher).dry_run(dry_run).run()?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report::render_text(&report)),
    }

    Ok(if report.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Print the classification of each filename
fn run_classify(config: &AppConfig, filenames: &[String], format: &str) -> Result<()> {
    let resolver = PathResolver::new(config);
    let descriptors: Vec<FileDescriptor> = filenames
        .iter()
        .filter_map(|name| FileDescriptor::describe(Path::new(name), &resolver))
        .collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    for d in &descriptors {
        let name = resolver.taxonomy().display_name(&d.category, &d.filename);
        println!("{}", d.filename);
        println!("  category: {}", d.category.label());
        println!("  name:     {}", name);
        println!("  dest:     {}", d.relative_path);
        println!("  url:      {}", d.public_url);
    }

    Ok(())
}

/// Run history commands
fn run_history_command(config: &AppConfig, action: HistoryCommands) -> Result<()> {
    let history = History::new(config.history_path());

    match action {
        HistoryCommands::List { count } => {
            let entries = history.get_recent(count)?;
            println!("Recent history in {} ({} entries):", history.path().display(), entries.len());
            for entry in entries {
                println!("  {} {} -> {} [{}]",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.source_path.display(),
                    entry.destination_path.display(),
                    entry.category
                );
            }
        }
        HistoryCommands::Clear { force } => {
            if !force {
                eprintln!("Use --force to confirm clearing history");
                return Ok(());
            }
            history.clear()?;
            println!("History cleared: {}", history.path().display());
        }
    }

    Ok(())
}

/// Run config commands
fn run_config_command(config: &AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output, flat } => {
            let mut generated = AppConfig::default();
            if flat {
                generated.taxonomy = vislib::taxonomy::Taxonomy::flat_default();
            }
            generated.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Source: {}", config.source_dir);
            println!("  Destination: {}", config.destination_root);
            println!("  Catalog: {}", config.catalog.path);
            println!("  Sections: {}", config.taxonomy.sections().len());
        }
    }

    Ok(())
}

/// Initialize a new vislib setup
fn run_init(dir: Option<PathBuf>, force: bool) -> Result<()> {
    let target = dir.unwrap_or_else(|| PathBuf::from("."));
    let config_path = target.join("vislib.json");

    if config_path.exists() && !force {
        return Err(VislibError::Config(
            "vislib.json already exists. Use --force to overwrite".to_string()
        ));
    }

    let source_dir = target.join("screenshots");
    std::fs::create_dir_all(&source_dir)?;

    let mut config = AppConfig::default();
    config.source_dir = source_dir.to_string_lossy().to_string();
    config.save(&config_path)?;

    println!("vislib initialized in {:?}", target);
    println!("\nCreated:");
    println!("  - vislib.json");
    println!("  - screenshots/");
    println!("\nNext steps:");
    println!("  1. Set destination_root and publish.identity in vislib.json");
    println!("  2. Drop screenshots named like C__template__needs-statement__v01.png");
    println!("  3. Run: vislib");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["vislib"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("vislib.json"));
    }

    #[test]
    fn test_cli_ingest_command() {
        let cli = Cli::try_parse_from(["vislib", "ingest", "--dry-run", "--format", "json"]).unwrap();

        match cli.command {
            Some(Commands::Ingest { dry_run }) => assert!(dry_run),
            _ => panic!("Expected Ingest command"),
        }
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_cli_classify_requires_filenames() {
        assert!(Cli::try_parse_from(["vislib", "classify"]).is_err());

        let cli = Cli::try_parse_from(["vislib", "classify", "a.png", "b.png"]).unwrap();
        match cli.command {
            Some(Commands::Classify { filenames }) => assert_eq!(filenames, vec!["a.png", "b.png"]),
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["vislib", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_history_clear_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.history_path = dir.path().join("history.jsonl").to_string_lossy().to_string();
        std::fs::write(config.history_path(), "").unwrap();

        run_history_command(&config, HistoryCommands::List { count: 5 }).unwrap();
        run_history_command(&config, HistoryCommands::Clear { force: false }).unwrap();
        assert!(config.history_path().exists());
        run_history_command(&config, HistoryCommands::Clear { force: true }).unwrap();
        assert!(!config.history_path().exists());
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        run_init(Some(dir.path().to_path_buf()), false).unwrap();
        assert!(dir.path().join("vislib.json").exists());
        assert!(dir.path().join("screenshots").is_dir());
        assert!(run_init(Some(dir.path().to_path_buf()), false).is_err());
        assert!(run_init(Some(dir.path().to_path_buf()), true).is_ok());
    }
}
