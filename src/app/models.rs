use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Why an entry was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    ToolDirectory,
    Hidden,
    IgnoredDir(String),
    IgnoredPattern(String),
    Gitignored,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolDirectory => write!(f, "tool directory"),
            Self::Hidden => write!(f, "hidden"),
            Self::IgnoredDir(name) => write!(f, "ignored name '{}'", name),
            Self::IgnoredPattern(pattern) => write!(f, "matches pattern '{}'", pattern),
            Self::Gitignored => write!(f, "matched by .gitignore"),
        }
    }
}

/// Represents a single file or directory discovered during the scan.
///
/// Excluded entries are kept (with their reason) but never descended into.
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    /// Path relative to the scan root, always with `/` separators.
    pub relative_path: String,
    pub kind: EntryKind,
    /// Root children are depth 1.
    pub depth: usize,
    pub exclusion: Option<ExclusionReason>,
}

impl Entry {
    pub fn is_included(&self) -> bool {
        self.exclusion.is_none()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

/// What ends up under a file's header in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Text(String),
    Binary,
    TooLarge { size_kb: f64, limit_kb: u64 },
    Unreadable(String),
}

impl FileContent {
    pub fn as_document_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Binary => "[Binary file - content not included]".to_string(),
            Self::TooLarge { size_kb, limit_kb } => format!(
                "[File too large - {:.1}KB exceeds {}KB limit]",
                size_kb, limit_kb
            ),
            Self::Unreadable(reason) => format!("[Error reading file: {}]", reason),
        }
    }
}

/// A rendered file section: relative path plus its decoded content or note.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub relative_path: String,
    pub content: FileContent,
}
