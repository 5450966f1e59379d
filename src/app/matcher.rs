use crate::app::error::{SelectionError, SelectionResult};
use globset::{GlobBuilder, GlobMatcher};

/// A single include/exclude pattern, compiled once.
///
/// A pattern matches a file when it is literally equal to the file's
/// root-relative path or base name, or when its glob form matches either of
/// them. `*` and `?` never cross a `/`.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    glob: GlobMatcher,
}

impl Pattern {
    pub fn new(raw: &str) -> SelectionResult<Self> {
        let glob = GlobBuilder::new(raw)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| SelectionError::InvalidPattern {
                pattern: raw.to_string(),
                reason: e.kind().to_string(),
            })?
            .compile_matcher();

        Ok(Self {
            raw: raw.to_string(),
            glob,
        })
    }

    /// `relative_path` must use `/` separators.
    pub fn matches(&self, relative_path: &str, base_name: &str) -> bool {
        self.raw == relative_path
            || self.raw == base_name
            || self.glob.is_match(relative_path)
            || self.glob.is_match(base_name)
    }
}

/// Compiles every pattern, failing on the first malformed one.
pub fn compile_patterns(raw: &[String]) -> SelectionResult<Vec<Pattern>> {
    raw.iter().map(|p| Pattern::new(p)).collect()
}

/// Disjunctive combinator, used for excludes.
pub fn matches_any(patterns: &[Pattern], relative_path: &str, base_name: &str) -> bool {
    patterns.iter().any(|p| p.matches(relative_path, base_name))
}

/// Conjunctive combinator, used for includes. Vacuously true for no patterns.
pub fn matches_all(patterns: &[Pattern], relative_path: &str, base_name: &str) -> bool {
    patterns.iter().all(|p| p.matches(relative_path, base_name))
}
