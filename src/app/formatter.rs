use crate::app::models::Manifest;
use anyhow::{bail, Result};
use std::fmt::Write;

/// Consumes a finished manifest and renders it into a source artifact.
pub trait ManifestEmitter {
    fn emit(&self, manifest: &Manifest) -> Result<String>;
}

/// Renders the manifest as a Rust module with a sorted static table.
pub struct RustEmitter {
    map_name: String,
    module: Option<String>,
}

impl RustEmitter {
    pub fn new(map_name: &str, module: Option<&str>) -> Result<Self> {
        validate_ident(map_name)?;
        if let Some(module) = module {
            validate_ident(module)?;
        }
        Ok(Self {
            map_name: map_name.to_string(),
            module: module.map(str::to_string),
        })
    }

    fn render_items(&self, manifest: &Manifest, indent: &str) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "{indent}pub static {}: &[(&str, &[u8])] = &[", self.map_name)?;
        for (key, entry) in manifest.iter() {
            writeln!(
                out,
                "{indent}    ({:?}, b\"{}\"),",
                key,
                entry.bytes.escape_ascii()
            )?;
        }
        writeln!(out, "{indent}];")?;
        writeln!(out)?;
        writeln!(out, "{indent}/// Returns the embedded content for `name`.")?;
        writeln!(out, "{indent}pub fn get(name: &str) -> Option<&'static [u8]> {{")?;
        writeln!(out, "{indent}    {}", self.map_name)?;
        writeln!(out, "{indent}        .binary_search_by(|(key, _)| (*key).cmp(name))")?;
        writeln!(out, "{indent}        .ok()")?;
        writeln!(out, "{indent}        .map(|i| {}[i].1)", self.map_name)?;
        writeln!(out, "{indent}}}")?;

        Ok(out)
    }
}

impl ManifestEmitter for RustEmitter {
    fn emit(&self, manifest: &Manifest) -> Result<String> {
        let mut out = String::from("// Code generated by statics. DO NOT EDIT.\n\n");

        match &self.module {
            Some(module) => {
                writeln!(out, "pub mod {module} {{")?;
                out.push_str(&self.render_items(manifest, "    ")?);
                out.push_str("}\n");
            }
            None => out.push_str(&self.render_items(manifest, "")?),
        }

        Ok(out)
    }
}

/// Strict and reserved keywords, including `gen` from the 2024 edition. None of them can name a
/// module or a static, raw identifiers aside.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn validate_ident(name: &str) -> Result<()> {
    if RUST_KEYWORDS.contains(&name) {
        bail!("'{}' is a Rust keyword and cannot be used as a name", name);
    }
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
    if !valid_start || !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) || name == "_" {
        bail!("'{}' is not a valid Rust identifier", name);
    }
    Ok(())
}
