//! Configuration file loading for slicefix.
//!
//! Discovers and loads `slicefix.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use slicefix_domain::{DEFAULT_SOURCE_DIR, EngineConfig, RuleToggles, SameLayerImports, SurfaceFiles};
use slicefix_types::{Layer, RuleId};
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "slicefix.toml";

/// Top-level configuration from slicefix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlicefixConfig {
    /// Literal prefix stripped from import specifiers (e.g. `@/`).
    pub alias: Option<String>,

    /// Directory name marking the source root (default `src`).
    pub source_dir: Option<String>,

    pub ignore_files_patterns: Vec<String>,

    pub test_files_patterns: Vec<String>,

    pub rules: RuleToggles,

    /// Same-layer import switches for features, widgets, pages, app.
    pub layers: SameLayerImports,

    pub surfaces: SurfaceFiles,
}

/// Discover the slicefix.toml config file.
///
/// Returns `None` if no config file is found in `repo_root`.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a slicefix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<SlicefixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<SlicefixConfig> {
    let config: SlicefixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<SlicefixConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(SlicefixConfig::default()),
    }
}

/// `check` flags that can override or extend the config file.
#[derive(Debug, Clone, Default)]
pub struct CheckOverrides {
    pub alias: Option<String>,
    pub source_dir: Option<String>,
    pub ignore: Vec<String>,
    pub test_files: Vec<String>,
    pub disable: Vec<RuleId>,
    pub allow_self_import: Vec<Layer>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: SlicefixConfig,
}

impl ConfigMerger {
    pub fn new(config: SlicefixConfig) -> Self {
        Self { config }
    }

    /// Merge with `check` arguments into an engine configuration.
    ///
    /// Pattern lists are extended, scalars are overridden, and rules or self-import flags named
    /// on the command line are switched off or on respectively.
    pub fn merge_check_args(self, cli: &CheckOverrides) -> anyhow::Result<EngineConfig> {
        let SlicefixConfig {
            alias,
            source_dir,
            mut ignore_files_patterns,
            mut test_files_patterns,
            mut rules,
            mut layers,
            surfaces,
        } = self.config;

        extend_unique(&mut ignore_files_patterns, &cli.ignore);
        extend_unique(&mut test_files_patterns, &cli.test_files);

        for rule in &cli.disable {
            rules.set(*rule, false);
        }
        for layer in &cli.allow_self_import {
            match layer {
                Layer::Features => layers.features_self_import = true,
                Layer::Widgets => layers.widgets_self_import = true,
                Layer::Pages => layers.pages_self_import = true,
                Layer::App => layers.app_self_import = true,
                Layer::Shared | Layer::Entities => {
                    anyhow::bail!("layer '{}' may always import itself", layer)
                }
            }
        }

        let source_dir = cli
            .source_dir
            .clone()
            .or(source_dir)
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        if source_dir.is_empty() || source_dir.contains(['/', '\\']) {
            anyhow::bail!("source_dir must be a single directory name, got '{}'", source_dir);
        }

        Ok(EngineConfig {
            alias: cli.alias.clone().or(alias).filter(|a| !a.is_empty()),
            source_dir,
            ignore_files_patterns,
            test_files_patterns,
            rules,
            layers,
            surfaces,
        })
    }
}

fn extend_unique(into: &mut Vec<String>, extra: &[String]) {
    for pattern in extra {
        if !into.contains(pattern) {
            into.push(pattern.clone());
        }
    }
}
