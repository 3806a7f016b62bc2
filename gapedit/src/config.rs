//! Configuration for gapedit.
//!
//! Loaded from TOML. [`Config::load_with_overrides`] picks the source:
//! CLI override > `gapedit.toml` discovered in the working directory > the
//! embedded defaults in `config.toml`.

use anyhow::{Context, Result};
use gapedit_text::{BufferOptions, HistoryOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked for by [`Config::discover`].
pub const CONFIG_FILE_NAME: &str = "gapedit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Columns per tab stop for line:col conversion.
    pub tab_width: usize,

    /// Edits closer together than this merge into one undo step.
    pub coalesce_window_ms: u64,

    /// Whether runs of backspaces merge like typed text does.
    ///
    /// Off by default, so each backspace undoes separately while typing
    /// undoes in bursts.
    pub coalesce_deletions: bool,

    /// Minimum capacity of new buffers and slack added to loaded files.
    pub initial_gap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: 4,
            coalesce_window_ms: 300,
            coalesce_deletions: false,
            initial_gap: 4096,
        }
    }
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate(path)?;
        Ok(config)
    }

    /// Load configuration with priority: CLI override > discovered path > defaults.
    pub fn load_with_overrides(
        cli_override: Option<&Path>,
        discovered_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = cli_override {
            return Self::load(path);
        }
        if let Some(path) = discovered_path {
            return Self::load(path);
        }
        Self::load_embedded()
    }

    /// `gapedit.toml` in `dir`, if there is one.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }

    fn load_embedded() -> Result<Self> {
        let source = include_str!("../../config.toml");
        toml::from_str(source).context("Failed to parse embedded config.toml")
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.tab_width == 0 {
            anyhow::bail!("Invalid config file {}: tab_width must be at least 1", path.display());
        }
        Ok(())
    }

    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions {
            coalesce_window_ms: self.coalesce_window_ms,
            coalesce_deletions: self.coalesce_deletions,
        }
    }

    pub fn buffer_options(&self) -> BufferOptions {
        BufferOptions {
            history: self.history_options(),
            initial_gap: self.initial_gap,
        }
    }
}
