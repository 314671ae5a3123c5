use crate::app::config::Config;
use crate::app::content::read_content;
use crate::app::models::{Entry, RenderedFile};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

pub struct OutputGenerator;

impl OutputGenerator {
    /// Draws the included entries as a box-drawing tree under `root_label/`.
    ///
    /// `entries` must be in depth-first order, as produced by the scanner.
    pub fn generate_tree(root_label: &str, entries: &[Entry]) -> Vec<String> {
        let included: Vec<&Entry> = entries.iter().filter(|e| e.is_included()).collect();
        let last_flags = last_child_flags(&included);

        let mut lines = Vec::with_capacity(included.len() + 1);
        lines.push(format!("{}/", root_label));

        // One flag per open ancestor: was that ancestor the last of its siblings?
        let mut ancestors: Vec<bool> = Vec::new();
        for (entry, &is_last) in included.iter().zip(&last_flags) {
            ancestors.truncate(entry.depth.saturating_sub(1));

            let mut line: String = ancestors
                .iter()
                .map(|&last| if last { SPACE } else { PIPE })
                .collect();
            line.push_str(if is_last { LAST_BRANCH } else { BRANCH });
            line.push_str(&entry.name());
            lines.push(line);

            ancestors.push(is_last);
        }

        lines
    }

    /// Reads (or notes) every included file, in tree order.
    pub fn generate_content(entries: &[Entry], config: &Config) -> Vec<RenderedFile> {
        entries
            .iter()
            .filter(|e| e.is_included() && !e.is_dir())
            .map(|entry| RenderedFile {
                relative_path: entry.relative_path.clone(),
                content: read_content(&entry.path, config),
            })
            .collect()
    }
}

/// For a depth-first list, an entry is the last child when no later sibling
/// appears before the walk climbs back above its depth.
fn last_child_flags(entries: &[&Entry]) -> Vec<bool> {
    let mut flags = vec![false; entries.len()];
    let mut sibling_seen: Vec<bool> = Vec::new();

    for (idx, entry) in entries.iter().enumerate().rev() {
        let depth = entry.depth;
        if sibling_seen.len() <= depth {
            sibling_seen.resize(depth + 1, false);
        }
        flags[idx] = !sibling_seen[depth];
        sibling_seen[depth] = true;
        sibling_seen.truncate(depth + 1);
    }

    flags
}
