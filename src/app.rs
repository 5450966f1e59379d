// Declare modules
pub mod alias;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

use self::cli::Cli;
use self::config::resolve_config;
use self::engine::{DiskReader, SelectionEngine};
use self::error::ErrorKind;
use self::formatter::{ManifestEmitter, RustEmitter};

fn init_logger(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

/// Writes through a temporary sibling file so a failed run never leaves a
/// truncated artifact behind.
///
/// An existing target keeps its permissions. A new one gets the same mode a
/// plain create would give it (0666 minus the umask).
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if existing.is_none() {
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
    }
    let mut staging = builder
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create staging file in {}", dir.display()))?;
    if let Some(permissions) = existing {
        staging
            .as_file()
            .set_permissions(permissions)
            .context("Failed to copy permissions to staging file")?;
    }
    staging
        .write_all(contents.as_bytes())
        .context("Failed to write staging file")?;
    staging
        .persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logger(args.verbose);

    // 2. Identify project name for preset auto-detection
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let config = resolve_config(args, project_name)?;
    log::debug!("Resolved configuration: {:?}", config);

    let emitter = RustEmitter::new(&config.output.map_name, config.output.module.as_deref())?;

    // 4. Select files
    let manifest = SelectionEngine::new(&config.selection)
        .and_then(|engine| engine.run(&DiskReader))
        .map_err(|err| {
            let context = match err.kind() {
                ErrorKind::Configuration => "Invalid configuration",
                ErrorKind::Io => "Failed to collect files",
                ErrorKind::KeyCollision => "Conflicting manifest keys",
            };
            anyhow::Error::new(err).context(context)
        })?;

    if manifest.is_empty() {
        log::warn!("No files matched; generating an empty table.");
    } else {
        log::info!(
            "Embedding {} files ({} bytes)",
            manifest.len(),
            manifest.total_bytes()
        );
        log::debug!("Manifest keys: {:?}", manifest.keys().collect::<Vec<_>>());
    }

    // 5. Generate Output
    let rendered = emitter.emit(&manifest)?;

    // 6. Write to file or stdout
    match &config.output.out {
        Some(path) => write_atomically(path, &rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("files.rs");
        fs::write(&target, "old").unwrap();

        write_atomically(&target, "new").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("files.rs");

        for mode in [0o644, 0o640] {
            fs::write(&target, "old").unwrap();
            fs::set_permissions(&target, fs::Permissions::from_mode(mode)).unwrap();

            write_atomically(&target, "new").unwrap();

            let after = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
            assert_eq!(after, mode, "mode {:o} became {:o}", mode, after);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_new_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("files.rs");

        // Compare against a file created the ordinary way under the same umask.
        let plain = dir.path().join("plain.rs");
        fs::write(&plain, "x").unwrap();
        let expected = fs::metadata(&plain).unwrap().permissions().mode() & 0o777;

        write_atomically(&target, "new").unwrap();

        let after = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(after, expected);
    }

    #[test]
    fn test_write_atomically_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("files.rs");

        assert!(write_atomically(&target, "x").is_err());
        assert!(!target.exists());
    }
}
