use crate::app::config::Config;
use crate::app::error::{AppError, ConfigError};
use crate::app::filter::EntryFilter;
use crate::app::models::{Entry, EntryKind, ExclusionReason};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub struct Scanner<'a> {
    root: PathBuf,
    config: &'a Config,
    filter: EntryFilter,
    gitignore: Option<Gitignore>,
    excluded_paths: Vec<PathBuf>,
}

impl<'a> Scanner<'a> {
    pub fn new(root: PathBuf, config: &'a Config) -> Result<Self, ConfigError> {
        let gitignore = if config.use_gitignore {
            load_gitignore(&root)
        } else {
            None
        };

        Ok(Self {
            filter: EntryFilter::new(config)?,
            root,
            config,
            gitignore,
            excluded_paths: Vec::new(),
        })
    }

    /// Drops one exact path (the output file) from the scan entirely, so
    /// neither the tree nor the statistics depend on whether it exists.
    pub fn exclude_path(mut self, path: PathBuf) -> Self {
        self.excluded_paths.push(path);
        self
    }

    /// Walks the root depth-first in byte-wise name order. Excluded entries
    /// are recorded but not descended into.
    pub fn scan(&self) -> Result<Vec<Entry>, AppError> {
        check_root(&self.root)?;

        // walkdir raises a max_depth below min_depth up to min_depth.
        if self.config.max_depth == 0 {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(self.config.max_depth)
            .sort_by_file_name()
            .into_iter();

        while let Some(result) = walker.next() {
            let dir_entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let Some(entry) = self.process_entry(&dir_entry) else {
                continue;
            };

            if let Some(reason) = &entry.exclusion {
                log::debug!("Excluding {} ({})", entry.relative_path, reason);
                if entry.is_dir() {
                    walker.skip_current_dir();
                }
            }
            entries.push(entry);
        }

        log::info!(
            "Scanned {}: {} entries included, {} excluded",
            self.root.display(),
            entries.iter().filter(|e| e.is_included()).count(),
            entries.iter().filter(|e| !e.is_included()).count()
        );
        Ok(entries)
    }

    fn process_entry(&self, dir_entry: &DirEntry) -> Option<Entry> {
        let path = dir_entry.path();
        if self.excluded_paths.iter().any(|p| p == path) {
            log::debug!("Skipping output file {}", path.display());
            return None;
        }

        let relative = diff_paths(path, &self.root)?;
        let relative_path = relative.to_string_lossy().replace('\\', "/");
        let name = dir_entry.file_name().to_string_lossy();
        let kind = entry_kind(dir_entry);

        let exclusion = self.exclusion_for(path, &name, kind);

        Some(Entry {
            path: path.to_path_buf(),
            relative_path,
            kind,
            depth: dir_entry.depth(),
            exclusion,
        })
    }

    fn exclusion_for(&self, path: &Path, name: &str, kind: EntryKind) -> Option<ExclusionReason> {
        let by_name = self.filter.classify(name);
        if by_name.is_some() {
            return by_name;
        }

        let is_dir = kind == EntryKind::Directory;
        match &self.gitignore {
            Some(gitignore) if gitignore.matched(path, is_dir).is_ignore() => {
                Some(ExclusionReason::Gitignored)
            }
            _ => None,
        }
    }
}

/// Symlinks are not followed, but a link to a directory is still listed as one.
fn entry_kind(dir_entry: &DirEntry) -> EntryKind {
    let is_dir = if dir_entry.path_is_symlink() {
        dir_entry.path().is_dir()
    } else {
        dir_entry.file_type().is_dir()
    };

    if is_dir {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

fn check_root(root: &Path) -> Result<(), AppError> {
    let metadata = fs::metadata(root).map_err(|source| AppError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(AppError::RootNotDirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| AppError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Only the root `.gitignore` is consulted.
fn load_gitignore(root: &Path) -> Option<Gitignore> {
    let path = root.join(".gitignore");
    if !path.is_file() {
        return None;
    }

    let mut builder = GitignoreBuilder::new(root);
    if let Some(err) = builder.add(&path) {
        log::warn!("Problem reading {}: {}", path.display(), err);
    }
    match builder.build() {
        Ok(gitignore) => Some(gitignore),
        Err(err) => {
            log::warn!("Ignoring {}: {}", path.display(), err);
            None
        }
    }
}
