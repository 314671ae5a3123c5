use crate::app::config::{Config, TOOL_DIR_NAME};
use crate::app::error::ConfigError;
use crate::app::models::ExclusionReason;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;

/// Compiled name rules, evaluated once per entry during the walk.
#[derive(Debug)]
pub struct EntryFilter {
    ignore_dirs: BTreeSet<String>,
    ignore_files: GlobSet,
    ignore_file_patterns: Vec<String>,
    include_hidden: bool,
}

impl EntryFilter {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            ignore_dirs: config.ignore_dirs.clone(),
            ignore_files: build_globset(&config.ignore_files)?,
            ignore_file_patterns: config.ignore_files.iter().cloned().collect(),
            include_hidden: config.include_hidden,
        })
    }

    /// Returns the reason `name` should be excluded, or `None` to keep it.
    /// Name rules apply to files and directories alike.
    pub fn classify(&self, name: &str) -> Option<ExclusionReason> {
        if name == TOOL_DIR_NAME {
            return Some(ExclusionReason::ToolDirectory);
        }
        if !self.include_hidden && name.starts_with('.') {
            return Some(ExclusionReason::Hidden);
        }
        if self.ignore_dirs.contains(name) {
            return Some(ExclusionReason::IgnoredDir(name.to_string()));
        }

        // `matches` yields indices in pattern insertion order.
        self.ignore_files
            .matches(name)
            .first()
            .map(|&idx| ExclusionReason::IgnoredPattern(self.ignore_file_patterns[idx].clone()))
    }
}

/// Helper to build efficient glob sets
pub fn build_globset<'a, I>(patterns: I) -> Result<GlobSet, ConfigError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|source| ConfigError::Pattern {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::Pattern {
        pattern: "<set>".to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(config: Config) -> EntryFilter {
        EntryFilter::new(&config).unwrap()
    }

    #[test]
    fn tool_directory_always_excluded() {
        let filter = filter_with(Config {
            ignore_dirs: BTreeSet::new(),
            include_hidden: true,
            ..Config::default()
        });
        assert_eq!(
            filter.classify(TOOL_DIR_NAME),
            Some(ExclusionReason::ToolDirectory)
        );
    }

    #[test]
    fn hidden_names_follow_include_hidden() {
        let strict = filter_with(Config::default());
        assert_eq!(strict.classify(".hidden"), Some(ExclusionReason::Hidden));

        let lenient = filter_with(Config {
            include_hidden: true,
            ..Config::default()
        });
        assert_eq!(lenient.classify(".hidden"), None);
        assert_eq!(
            lenient.classify(".git"),
            Some(ExclusionReason::IgnoredDir(".git".to_string()))
        );
    }

    #[test]
    fn ignore_dirs_match_exact_names_only() {
        let filter = filter_with(Config::default());
        assert_eq!(
            filter.classify("node_modules"),
            Some(ExclusionReason::IgnoredDir("node_modules".to_string()))
        );
        assert_eq!(filter.classify("node_modules_backup"), None);
    }

    #[test]
    fn ignore_files_are_globs_on_the_name() {
        let filter = filter_with(Config::default());
        assert_eq!(
            filter.classify("module.pyc"),
            Some(ExclusionReason::IgnoredPattern("*.pyc".to_string()))
        );
        assert_eq!(
            filter.classify("pkg.egg-info"),
            Some(ExclusionReason::IgnoredPattern("*.egg-info".to_string()))
        );
        assert_eq!(filter.classify("main.py"), None);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let patterns = vec!["ok.txt".to_string(), "bad[".to_string()];
        let err = build_globset(&patterns).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { pattern, .. } if pattern == "bad["));
    }
}
