use crate::app::error::{SelectionError, SelectionResult};
use std::collections::HashMap;

/// Outcome of resolving one file's manifest key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub key: String,
    /// Alias identifier that matched, if any.
    pub aliased_by: Option<String>,
    /// The alias value carried a directory and was used verbatim.
    pub path_shaped: bool,
}

/// Two-tier alias table: identifiers containing `/` are matched against the
/// full relative path, bare identifiers against the base name. The path tier
/// is always consulted first.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    by_path: HashMap<String, String>,
    by_name: HashMap<String, String>,
    flatten: bool,
}

impl AliasResolver {
    pub fn new(rules: &[(String, String)], flatten: bool) -> SelectionResult<Self> {
        let mut resolver = Self {
            flatten,
            ..Self::default()
        };

        for (original, replacement) in rules {
            validate_rule(original, replacement)?;

            let tier = if original.contains('/') {
                &mut resolver.by_path
            } else {
                &mut resolver.by_name
            };

            if let Some(first) = tier.get(original) {
                if first != replacement {
                    return Err(SelectionError::DuplicateAlias {
                        original: original.clone(),
                        first: first.clone(),
                        second: replacement.clone(),
                    });
                }
                continue;
            }
            tier.insert(original.clone(), replacement.clone());
        }

        Ok(resolver)
    }

    /// Alias identifiers in no particular order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.by_path.keys().chain(self.by_name.keys()).map(String::as_str)
    }

    /// `relative_path` must use `/` separators.
    pub fn resolve(&self, relative_path: &str) -> Resolution {
        let (dir, base) = match relative_path.rsplit_once('/') {
            Some((dir, base)) => (Some(dir), base),
            None => (None, relative_path),
        };

        let hit = self
            .by_path
            .get_key_value(relative_path)
            .or_else(|| self.by_name.get_key_value(base));

        let Some((identifier, replacement)) = hit else {
            let key = if self.flatten { base } else { relative_path };
            return Resolution {
                key: key.to_string(),
                aliased_by: None,
                path_shaped: false,
            };
        };

        let path_shaped = replacement.contains('/');
        let key = match dir {
            _ if path_shaped || self.flatten => replacement.clone(),
            Some(dir) => format!("{}/{}", dir, replacement),
            None => replacement.clone(),
        };

        Resolution {
            key,
            aliased_by: Some(identifier.clone()),
            path_shaped,
        }
    }
}

fn validate_rule(original: &str, replacement: &str) -> SelectionResult<()> {
    let reason = if original.is_empty() {
        Some("original name is empty")
    } else if replacement.is_empty() {
        Some("replacement is empty")
    } else if replacement.ends_with('/') {
        Some("replacement must name a file, not a directory")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SelectionError::InvalidAlias {
            original: original.to_string(),
            replacement: replacement.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
