//! Layered level settings: defaults, then the TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use iso_tactics_core::LevelSettings;
use serde::Deserialize;

/// Partial settings supplied by one configuration source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct SettingsLayer {
    pub(crate) width: Option<i32>,
    pub(crate) height: Option<i32>,
    pub(crate) tile_size: Option<i32>,
    pub(crate) hazard: Option<f32>,
    pub(crate) seed: Option<u64>,
}

impl SettingsLayer {
    /// Values from `self`, falling back to `lower` where unset.
    fn over(self, lower: Self) -> Self {
        Self {
            width: self.width.or(lower.width),
            height: self.height.or(lower.height),
            tile_size: self.tile_size.or(lower.tile_size),
            hazard: self.hazard.or(lower.hazard),
            seed: self.seed.or(lower.seed),
        }
    }
}

/// Reads and parses a TOML settings file.
pub(crate) fn load(path: &Path) -> Result<SettingsLayer> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn parse(contents: &str) -> Result<SettingsLayer> {
    Ok(toml::from_str(contents)?)
}

/// Resolves the final settings; an explicit seed locks it, otherwise
/// `random_seed` is used and left unlocked.
pub(crate) fn resolve(file: &SettingsLayer, flags: &SettingsLayer, random_seed: u64) -> LevelSettings {
    let defaults = LevelSettings::default();
    let merged = flags.over(*file);
    let settings = LevelSettings::new(
        merged.width.unwrap_or(defaults.width() as i32),
        merged.height.unwrap_or(defaults.height() as i32),
        merged.tile_size.unwrap_or(defaults.tile_size() as i32),
        merged.hazard.unwrap_or(defaults.hazard_density()),
    );
    match merged.seed {
        Some(seed) => settings.with_seed(seed),
        None => settings.with_random_seed(random_seed),
    }
}
