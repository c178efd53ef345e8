/// Completed-levels persistence.
///
/// File format: one completed level identifier per line. A missing file
/// means no progress (not an error); an unreadable one is treated the
/// same after a warning. The set is the source of truth in memory and
/// recording an already-completed level is a no-op, so the write path
/// never appends duplicates.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("could not write progress file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Debug, Default)]
pub struct CompletedLevels {
    set: BTreeSet<String>,
}

impl CompletedLevels {
    /// Load from disk. Missing file => empty set.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                eprintln!("Starting with no recorded progress.");
                String::new()
            }
        };
        let set = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        CompletedLevels { set }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    /// Record a completion. Returns true if the id was newly added;
    /// recording a level that is already complete changes nothing.
    pub fn record(&mut self, id: &str) -> bool {
        self.set.insert(id.to_string())
    }

    /// Write the whole set, one id per line.
    pub fn save(&self, path: &Path) -> Result<(), ProgressError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ProgressError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        let mut content = String::new();
        for id in &self.set {
            content.push_str(id);
            content.push('\n');
        }
        std::fs::write(path, content).map_err(|source| ProgressError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
