use crate::app::error::{SelectionError, SelectionResult};
use crate::app::matcher::{compile_patterns, matches_all, matches_any, Pattern};
use crate::app::models::{Candidate, SelectionConfig};
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::path::Path;

/// Walks import roots and yields the files that survive the filters.
pub struct Scanner {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl Scanner {
    pub fn new(config: &SelectionConfig) -> SelectionResult<Self> {
        Ok(Self {
            include: compile_patterns(&config.include)?,
            exclude: compile_patterns(&config.exclude)?,
        })
    }

    /// Lazily walks `root` depth-first, siblings in lexical order.
    ///
    /// Every call starts a fresh traversal. The first traversal or read error
    /// ends the walk as far as the caller is concerned; there is no
    /// best-effort mode.
    pub fn walk<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = SelectionResult<Candidate>> + 'a {
        // Hidden files and .gitignore carry no meaning for an import root.
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        walker.filter_map(move |result| match result {
            Ok(entry) => self.process_entry(root, &entry).transpose(),
            Err(source) => Some(Err(SelectionError::Walk {
                root: root.to_path_buf(),
                source,
            })),
        })
    }

    fn process_entry(&self, root: &Path, entry: &DirEntry) -> SelectionResult<Option<Candidate>> {
        if entry.depth() == 0 {
            return Ok(None);
        }

        let path = entry.path();
        let Some(file_type) = entry.file_type() else {
            return Ok(None);
        };
        if file_type.is_dir() {
            return Ok(None);
        }
        if file_type.is_symlink() {
            // Broken links surface here as read errors.
            let target = fs::metadata(path).map_err(|source| SelectionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            if !target.is_file() {
                log::trace!("Skipping link to non-file: {}", path.display());
                return Ok(None);
            }
        }

        let Some(relative) = diff_paths(path, root) else {
            return Ok(None);
        };
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let base_name = entry.file_name().to_string_lossy();

        if matches_any(&self.exclude, &relative_path, &base_name) {
            log::trace!("Excluded: {}", relative_path);
            return Ok(None);
        }
        if !matches_all(&self.include, &relative_path, &base_name) {
            log::trace!("Not included: {}", relative_path);
            return Ok(None);
        }

        Ok(Some(Candidate {
            path: path.to_path_buf(),
            relative_path,
        }))
    }
}

/// Checks that an import root exists and is a directory.
pub fn validate_root(root: &Path) -> SelectionResult<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SelectionError::RootNotDirectory(root.to_path_buf())),
        Err(_) => Err(SelectionError::RootNotFound(root.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn walk_all(scanner: &Scanner, root: &Path) -> Vec<String> {
        scanner
            .walk(root)
            .map(|c| c.unwrap().relative_path)
            .collect()
    }

    fn config(include: &[&str], exclude: &[&str]) -> SelectionConfig {
        SelectionConfig {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn test_walk_is_lexical_depth_first() {
        let dir = TempDir::new().unwrap();
        for rel in ["b.txt", "a/z.txt", "a/b/c.txt", "c/d.txt", ".hidden"] {
            touch(&dir, rel);
        }

        let scanner = Scanner::new(&SelectionConfig::default()).unwrap();
        assert_eq!(
            walk_all(&scanner, dir.path()),
            vec![".hidden", "a/b/c.txt", "a/z.txt", "b.txt", "c/d.txt"]
        );
    }

    #[test]
    fn test_gitignore_has_no_effect() {
        let dir = TempDir::new().unwrap();
        touch(&dir, ".gitignore");
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        touch(&dir, "app.log");

        let scanner = Scanner::new(&SelectionConfig::default()).unwrap();
        assert_eq!(walk_all(&scanner, dir.path()), vec![".gitignore", "app.log"]);
    }

    #[test]
    fn test_walk_applies_filters() {
        let dir = TempDir::new().unwrap();
        for rel in ["a.txt", "b.log", "sub/a.txt", "sub/c.txt"] {
            touch(&dir, rel);
        }

        let scanner = Scanner::new(&config(&["a*"], &["*.log"])).unwrap();
        assert_eq!(walk_all(&scanner, dir.path()), vec!["a.txt", "sub/a.txt"]);

        let scanner = Scanner::new(&config(&[], &["sub/a.txt"])).unwrap();
        assert_eq!(
            walk_all(&scanner, dir.path()),
            vec!["a.txt", "b.log", "sub/c.txt"]
        );
    }

    #[test]
    fn test_walk_is_restartable() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt");

        let scanner = Scanner::new(&SelectionConfig::default()).unwrap();
        assert_eq!(walk_all(&scanner, dir.path()), walk_all(&scanner, dir.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();

        let scanner = Scanner::new(&SelectionConfig::default()).unwrap();
        let results: Vec<_> = scanner.walk(dir.path()).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(SelectionError::Read { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt");
        touch(&dir, "locked/secret.txt");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let scanner = Scanner::new(&SelectionConfig::default()).unwrap();
        let results: Vec<_> = scanner.walk(dir.path()).collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(results[0], Ok(ref c) if c.relative_path == "a.txt"));
        let err = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("walk should report the locked directory");
        assert!(matches!(err, SelectionError::Walk { root, .. } if root == dir.path()));
        assert!(results
            .iter()
            .all(|r| !matches!(r, Ok(c) if c.relative_path == "locked/secret.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_file_is_yielded() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "real.txt");
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let scanner = Scanner::new(&SelectionConfig::default()).unwrap();
        assert_eq!(walk_all(&scanner, dir.path()), vec!["link.txt", "real.txt"]);
    }

    #[test]
    fn test_validate_root() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "file.txt");

        assert!(validate_root(dir.path()).is_ok());
        assert!(matches!(
            validate_root(&dir.path().join("file.txt")),
            Err(SelectionError::RootNotDirectory(_))
        ));
        assert!(matches!(
            validate_root(&dir.path().join("nope")),
            Err(SelectionError::RootNotFound(_))
        ));
    }
}
