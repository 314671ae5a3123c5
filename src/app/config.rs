use crate::app::cli::Cli;
use crate::app::error::ConfigError;
use crate::app::filter::build_globset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the tool's own directory; always excluded from scans and used
/// for the user-level config directory.
pub const TOOL_DIR_NAME: &str = "repo-prompt";
pub const DEFAULT_OUTPUT_FILE: &str = "repo_prompt.txt";
const USER_CONFIG_FILE: &str = "config.json";

const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git", ".svn", ".hg", "__pycache__", "node_modules", ".idea", ".vscode", "venv", "env",
    ".env", "dist", "build", "target", ".pytest_cache", ".mypy_cache", TOOL_DIR_NAME,
];

const DEFAULT_IGNORE_FILES: &[&str] = &[
    ".DS_Store", "Thumbs.db", "*.pyc", "*.pyo", "*.pyd", "*.so", "*.dll", "*.dylib",
    "*.egg-info", "*.egg", DEFAULT_OUTPUT_FILE,
];

const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".ico", ".svg", ".pdf", ".doc", ".docx", ".xls",
    ".xlsx", ".ppt", ".pptx", ".zip", ".tar", ".gz", ".rar", ".7z", ".bin", ".exe", ".dll",
    ".so", ".dylib", ".db", ".sqlite", ".pickle", ".pkl",
];

/// Effective configuration for one run. Built once, then only borrowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub ignore_dirs: BTreeSet<String>,
    pub ignore_files: BTreeSet<String>,
    pub binary_extensions: BTreeSet<String>,
    pub max_file_size_kb: u64,
    pub include_hidden: bool,
    pub max_depth: usize,
    pub use_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_dirs: to_set(DEFAULT_IGNORE_DIRS.iter().copied()),
            ignore_files: to_set(DEFAULT_IGNORE_FILES.iter().copied()),
            binary_extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            max_file_size_kb: 500,
            include_hidden: false,
            max_depth: 10,
            use_gitignore: true,
        }
    }
}

impl Config {
    /// True if the file name's extension is in `binary_extensions`.
    pub fn is_binary_name(&self, name: &str) -> bool {
        match Path::new(name).extension() {
            Some(ext) => {
                let ext = normalize_extension(&ext.to_string_lossy());
                self.binary_extensions.contains(&ext)
            }
            None => false,
        }
    }

    /// Keys present in the overlay replace the defaults wholesale.
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(dirs) = overlay.ignore_dirs {
            self.ignore_dirs = to_set(dirs);
        }
        if let Some(files) = overlay.ignore_files {
            self.ignore_files = to_set(files);
        }
        if let Some(exts) = overlay.binary_extensions {
            self.binary_extensions = exts.iter().map(|e| normalize_extension(e)).collect();
        }
        if let Some(kb) = overlay.max_file_size_kb {
            self.max_file_size_kb = kb;
        }
        if let Some(hidden) = overlay.include_hidden {
            self.include_hidden = hidden;
        }
        if let Some(depth) = overlay.max_depth {
            self.max_depth = depth;
        }
        if let Some(gitignore) = overlay.use_gitignore {
            self.use_gitignore = gitignore;
        }
    }
}

/// The shape of a user config file. Every key is optional; unknown keys are
/// ignored.
#[derive(Deserialize, Debug, Default)]
struct ConfigOverlay {
    ignore_dirs: Option<Vec<String>>,
    ignore_files: Option<Vec<String>>,
    binary_extensions: Option<Vec<String>>,
    max_file_size_kb: Option<u64>,
    include_hidden: Option<bool>,
    max_depth: Option<usize>,
    use_gitignore: Option<bool>,
}

fn to_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Lowercase with a single leading dot: `PNG`, `.png` and `.PNG` all become `.png`.
pub fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.').to_lowercase())
}

fn parse_overlay(path: &Path, content: &str) -> Result<ConfigOverlay, ConfigError> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Loads the defaults and overlays the file at `path`, if any.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    config.apply_overlay(parse_overlay(path, &content)?);

    // Reject bad globs here so the fallback to defaults applies.
    build_globset(&config.ignore_files)?;

    log::debug!("Loaded config overrides from {}", path.display());
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?
        .join(TOOL_DIR_NAME)
        .join(USER_CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Resolution order: defaults, then `--config` (or the user-level config
/// file when no `--config` is given), then command-line flags.
pub fn resolve_config(cli: &Cli) -> Config {
    let source = cli.config.clone().or_else(user_config_path);

    let mut config = load_config(source.as_deref()).unwrap_or_else(|err| {
        log::warn!("{}; falling back to default configuration", err);
        Config::default()
    });

    apply_cli_overrides(&mut config, cli);
    config
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(kb) = cli.max_file_size_kb {
        config.max_file_size_kb = kb;
    }
    if cli.include_hidden {
        config.include_hidden = true;
    }
    if cli.no_gitignore {
        config.use_gitignore = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert!(config.ignore_dirs.contains("node_modules"));
        assert!(config.ignore_dirs.contains(TOOL_DIR_NAME));
        assert!(config.ignore_files.contains(DEFAULT_OUTPUT_FILE));
        assert!(config.binary_extensions.contains(".png"));
        assert_eq!(config.max_file_size_kb, 500);
        assert_eq!(config.max_depth, 10);
        assert!(!config.include_hidden);
        assert!(config.use_gitignore);
    }

    #[test]
    fn no_path_yields_defaults() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn json_overlay_replaces_only_present_keys() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cfg.json",
            r#"{"max_depth": 2, "ignore_dirs": ["vendor"], "unknown_key": 1}"#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.ignore_dirs, to_set(["vendor"]));
        assert_eq!(config.max_file_size_kb, 500);
        assert_eq!(config.ignore_files, Config::default().ignore_files);
    }

    #[test]
    fn toml_overlay_is_supported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.toml", "include_hidden = true\nmax_file_size_kb = 1\n");

        let config = load_config(Some(&path)).unwrap();
        assert!(config.include_hidden);
        assert_eq!(config.max_file_size_kb, 1);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.json", "{ not json");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn wrong_value_type_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.json", r#"{"max_depth": "deep"}"#);
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn invalid_glob_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.json", r#"{"ignore_files": ["a[b"]}"#);
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Pattern { .. })
        ));
    }

    #[test]
    fn resolve_falls_back_to_defaults_on_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.json", "[1, 2");
        let cli = Cli::parse_from(["repo-prompt", "-c", path.to_str().unwrap()]);
        assert_eq!(resolve_config(&cli), Config::default());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.json", r#"{"max_depth": 2, "use_gitignore": true}"#);
        let cli = Cli::parse_from([
            "repo-prompt",
            "-c",
            path.to_str().unwrap(),
            "--max-depth",
            "7",
            "--include-hidden",
            "--no-gitignore",
        ]);

        let config = resolve_config(&cli);
        assert_eq!(config.max_depth, 7);
        assert!(config.include_hidden);
        assert!(!config.use_gitignore);
    }

    #[test]
    fn binary_extensions_are_normalized() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.json", r#"{"binary_extensions": ["DAT", ".Raw"]}"#);

        let config = load_config(Some(&path)).unwrap();
        assert!(config.is_binary_name("dump.dat"));
        assert!(config.is_binary_name("photo.RAW"));
        assert!(!config.is_binary_name("photo.png"));
        assert!(!config.is_binary_name("Makefile"));
    }
}
