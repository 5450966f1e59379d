use crate::app::error::{SelectionError, SelectionResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Inputs of the selection engine. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct SelectionConfig {
    pub roots: Vec<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Original identifier -> replacement, in declaration order.
    pub aliases: Vec<(String, String)>,
    pub flatten: bool,
}

/// How the finished manifest is rendered and where it goes.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// `None` means stdout.
    pub out: Option<PathBuf>,
    pub module: Option<String>,
    pub map_name: String,
}

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub selection: SelectionConfig,
    pub output: OutputConfig,
}

/// A file accepted by the walker, before its content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Relative to the import root, always `/`-separated.
    pub relative_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub source: PathBuf,
    pub bytes: Vec<u8>,
}

/// Key -> content mapping, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, refusing to replace an existing key.
    pub fn insert(&mut self, key: String, source: &Path, bytes: Vec<u8>) -> SelectionResult<()> {
        if let Some(existing) = self.entries.get(&key) {
            return Err(SelectionError::KeyCollision {
                key,
                existing: existing.source.clone(),
                incoming: source.to_path_buf(),
            });
        }
        self.entries.insert(
            key,
            ManifestEntry {
                source: source.to_path_buf(),
                bytes,
            },
        );
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(|e| e.bytes.len()).sum()
    }
}
