use crate::app::error::AppError;
use crate::app::models::{Entry, FileContent, RenderedFile};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const BANNER_WIDTH: usize = 80;

const USAGE_NOTE: &[&str] = &[
    "This repository structure and content has been provided to give you ",
    "comprehensive context about the project. Please use this information ",
    "to better understand the codebase and provide more accurate assistance.",
];

/// File counts reported at the end of the document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub files_included: usize,
    pub directories_included: usize,
    pub binary_skipped: usize,
    pub oversized: usize,
    pub unreadable: usize,
    pub entries_excluded: usize,
}

impl Stats {
    /// `files` is `None` when contents were not rendered (tree-only output).
    pub fn collect(entries: &[Entry], files: Option<&[RenderedFile]>) -> Self {
        let mut stats = Stats::default();

        for entry in entries {
            match (entry.is_included(), entry.is_dir()) {
                (false, _) => stats.entries_excluded += 1,
                (true, true) => stats.directories_included += 1,
                (true, false) => stats.files_included += 1,
            }
        }

        for file in files.unwrap_or_default() {
            match file.content {
                FileContent::Text(_) => {}
                FileContent::Binary => stats.binary_skipped += 1,
                FileContent::TooLarge { .. } => stats.oversized += 1,
                FileContent::Unreadable(_) => stats.unreadable += 1,
            }
        }

        stats
    }

    fn lines(&self, root: &Path) -> Vec<String> {
        vec![
            "Statistics:".to_string(),
            format!("- Total files included: {}", self.files_included),
            format!("- Directories included: {}", self.directories_included),
            format!("- Binary files skipped: {}", self.binary_skipped),
            format!("- Files over size limit: {}", self.oversized),
            format!("- Unreadable files: {}", self.unreadable),
            format!("- Entries excluded: {}", self.entries_excluded),
            format!("- Repository root: {}", root.display()),
        ]
    }
}

#[derive(Debug)]
struct Section {
    title: &'static str,
    lines: Vec<String>,
}

/// The assembled output: banner-separated sections, rendered once.
#[derive(Debug)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn assemble(
        repo_name: &str,
        root: &Path,
        tree: Vec<String>,
        files: Option<&[RenderedFile]>,
        stats: &Stats,
    ) -> Self {
        let mut sections = Vec::with_capacity(4);

        sections.push(Section {
            title: "REPOSITORY CONTEXT",
            lines: vec![
                format!("Repository: {}", repo_name),
                format!("Path: {}", root.display()),
                String::new(),
            ],
        });

        let mut tree_lines = tree;
        tree_lines.push(String::new());
        sections.push(Section {
            title: "DIRECTORY STRUCTURE",
            lines: tree_lines,
        });

        if let Some(files) = files {
            let rule = "-".repeat(BANNER_WIDTH);
            let mut lines = Vec::with_capacity(files.len() * 5);
            for file in files {
                lines.push(rule.clone());
                lines.push(format!("File: {}", file.relative_path));
                lines.push(rule.clone());
                lines.push(file.content.as_document_text());
                lines.push(String::new());
            }
            sections.push(Section {
                title: "FILE CONTENTS",
                lines,
            });
        }

        let mut closing: Vec<String> = USAGE_NOTE.iter().map(|s| s.to_string()).collect();
        closing.push(String::new());
        closing.extend(stats.lines(root));
        closing.push(String::new());
        sections.push(Section {
            title: "ADDITIONAL CONTEXT",
            lines: closing,
        });

        Self { sections }
    }

    pub fn render(&self) -> String {
        let banner = "=".repeat(BANNER_WIDTH);
        let mut lines: Vec<&str> = Vec::new();
        for section in &self.sections {
            lines.push(&banner);
            lines.push(section.title);
            lines.push(&banner);
            lines.push("");
            lines.extend(section.lines.iter().map(String::as_str));
        }
        lines.join("\n")
    }
}

#[derive(Debug)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

pub fn emit(document: &str, destination: &Destination) -> Result<(), AppError> {
    match destination {
        Destination::File(path) => {
            fs::write(path, document).map_err(|source| AppError::FileWrite {
                path: path.clone(),
                source,
            })?;
            log::info!("Repository prompt saved to: {}", path.display());
        }
        Destination::Stdout => {
            let mut out = io::stdout().lock();
            out.write_all(document.as_bytes())
                .and_then(|_| out.flush())
                .map_err(AppError::Stdout)?;
        }
    }
    Ok(())
}
