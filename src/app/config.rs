use crate::app::cli::Cli;
use crate::app::models::{OutputConfig, RuntimeConfig, SelectionConfig};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

const DEFAULT_ROOT: &str = "./include";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct PresetConfig {
    path: Option<Vec<PathBuf>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    alias: Option<BTreeMap<String, String>>,
    keep_dirs: Option<bool>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("statics").join("presets.toml"))
}

fn load_presets_file(config_path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content).with_context(|| format!("Failed to parse {:?}", config_path))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

/// Concatenates preset and CLI values, dropping repeats but keeping order.
fn merge_vecs<T: Clone + Eq + Hash>(preset_vec: Option<Vec<T>>, cli_vec: Option<Vec<T>>) -> Vec<T> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Expands `"a | b | c"` values into separate patterns.
fn split_pattern_lists(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values.map(|values| {
        values
            .iter()
            .flat_map(|v| v.split('|'))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn parse_alias(raw: &str) -> Result<(String, String)> {
    let Some((from, to)) = raw.split_once('=') else {
        bail!("Alias '{}' must have the form FROM=TO", raw);
    };
    Ok((from.trim().to_string(), to.trim().to_string()))
}

pub fn resolve_config(cli: Cli, project_name: Option<&str>) -> Result<RuntimeConfig> {
    let presets = load_presets_file(&presets_path()?)?;
    build_config(cli, &presets, project_name)
}

fn build_config(
    cli: Cli,
    presets: &HashMap<String, PresetConfig>,
    project_name: Option<&str>,
) -> Result<RuntimeConfig> {
    // Determine preset to use: CLI flag > Auto-detect > None
    if let Some(name) = cli.preset.as_deref() {
        if !presets.contains_key(name) {
            bail!("Unknown preset '{}'", name);
        }
    }
    let preset_key = cli.preset.as_deref().or(project_name);
    let preset = preset_key
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();
    if let Some(key) = preset_key.filter(|k| presets.contains_key(*k)) {
        log::debug!("Using preset '{}'", key);
    }

    let cli_aliases = cli
        .alias
        .map(|raw| raw.iter().map(|a| parse_alias(a)).collect::<Result<Vec<_>>>())
        .transpose()?;
    let preset_aliases: Option<Vec<(String, String)>> =
        preset.alias.map(|table| table.into_iter().collect());

    let mut roots = merge_vecs(preset.path, cli.paths);
    if roots.is_empty() {
        roots.push(PathBuf::from(DEFAULT_ROOT));
    }

    let selection = SelectionConfig {
        roots,
        include: merge_vecs(preset.include, cli.include),
        exclude: merge_vecs(
            split_pattern_lists(preset.exclude),
            split_pattern_lists(cli.exclude),
        ),
        aliases: merge_vecs(preset_aliases, cli_aliases),
        flatten: !(cli.keep_dirs || preset.keep_dirs.unwrap_or(false)),
    };

    let output = OutputConfig {
        out: (cli.out != "-").then(|| PathBuf::from(&cli.out)),
        module: cli.module,
        map_name: cli.map,
    };

    Ok(RuntimeConfig { selection, output })
}
