use crate::app::alias::AliasResolver;
use crate::app::error::{SelectionError, SelectionResult};
use crate::app::models::{Manifest, SelectionConfig};
use crate::app::scanner::{validate_root, Scanner};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Supplies file contents to the engine.
pub trait SourceReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads straight from the filesystem.
pub struct DiskReader;

impl SourceReader for DiskReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// Turns a validated [`SelectionConfig`] into a [`Manifest`].
///
/// Construction performs all configuration checks (roots, patterns, alias
/// rules), so a constructed engine can only fail on I/O or key collisions.
pub struct SelectionEngine {
    roots: Vec<PathBuf>,
    scanner: Scanner,
    aliases: AliasResolver,
}

impl SelectionEngine {
    pub fn new(config: &SelectionConfig) -> SelectionResult<Self> {
        for root in &config.roots {
            validate_root(root)?;
        }

        Ok(Self {
            roots: config.roots.clone(),
            scanner: Scanner::new(config)?,
            aliases: AliasResolver::new(&config.aliases, config.flatten)?,
        })
    }

    /// Walks every root in declaration order and builds the manifest.
    ///
    /// Stops at the first error; no partial manifest is ever returned.
    pub fn run(&self, reader: &dyn SourceReader) -> SelectionResult<Manifest> {
        let mut manifest = Manifest::new();
        let mut used_aliases = HashSet::new();

        for root in &self.roots {
            log::debug!("Walking import root {}", root.display());

            for candidate in self.scanner.walk(root) {
                let candidate = candidate?;
                let bytes = reader
                    .read(&candidate.path)
                    .map_err(|source| SelectionError::Read {
                        path: candidate.path.clone(),
                        source,
                    })?;

                let resolution = self.aliases.resolve(&candidate.relative_path);
                if let Some(identifier) = &resolution.aliased_by {
                    log::debug!(
                        "Alias '{}' maps {} to {}{}",
                        identifier,
                        candidate.relative_path,
                        resolution.key,
                        if resolution.path_shaped { " (explicit path)" } else { "" }
                    );
                    used_aliases.insert(identifier.clone());
                }

                log::debug!(
                    "Added key {} ({} bytes) from {}",
                    resolution.key,
                    bytes.len(),
                    candidate.path.display()
                );
                manifest.insert(resolution.key, &candidate.path, bytes)?;
            }
        }

        let mut unused: Vec<&str> = self
            .aliases
            .identifiers()
            .filter(|id| !used_aliases.contains(*id))
            .collect();
        unused.sort_unstable();
        for identifier in unused {
            log::warn!("Alias '{}' did not match any file", identifier);
        }

        Ok(manifest)
    }
}
