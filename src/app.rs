// Declare modules
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use self::cli::Cli;
use self::config::resolve_config;
use self::error::AppError;
use self::formatter::OutputGenerator;
use self::scanner::Scanner;
use self::writer::{emit, Destination, Document, Stats};

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose);

    // 2. Identify Project Root & Name
    let root = fs::canonicalize(&args.path).map_err(|source| AppError::RootUnreadable {
        path: args.path.clone(),
        source,
    })?;
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    // 3. Resolve Configuration
    let config = resolve_config(&args);
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let destination = if args.no_save {
        Destination::Stdout
    } else {
        Destination::File(args.output.clone())
    };

    // 4. Scan Directory
    let mut scanner = Scanner::new(root.clone(), &config)?;
    if let Destination::File(path) = &destination {
        scanner = scanner.exclude_path(absolute_output_path(path)?);
    }
    let entries = scanner.scan()?;

    if !entries.iter().any(|e| e.is_included()) {
        log::warn!("No files or directories matched under {}", root.display());
    }

    // 5. Generate Output
    let tree = OutputGenerator::generate_tree(&project_name, &entries);
    let files = (!args.tree).then(|| OutputGenerator::generate_content(&entries, &config));
    let stats = Stats::collect(&entries, files.as_deref());
    let document = Document::assemble(&project_name, &root, tree, files.as_deref(), &stats);

    // 6. Write
    emit(&document.render(), &destination)?;

    if let Destination::File(path) = &destination {
        println!("Repository prompt saved to: {}", path.display());
        println!("Files included: {}", stats.files_included);
        println!(
            "\nYou can now copy the contents of '{}' and paste it into any LLM chat",
            path.display()
        );
        println!("to provide comprehensive context about your repository.");
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Resolves the output path the way the scanner will see it, so the file
/// can be excluded from its own contents. The file itself need not exist.
fn absolute_output_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .context("Failed to get current directory")?
            .join(path)
    };

    if let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) {
        if let Ok(parent) = fs::canonicalize(parent) {
            return Ok(parent.join(name));
        }
    }
    Ok(absolute)
}
