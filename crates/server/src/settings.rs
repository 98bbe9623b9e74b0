//! Server settings, stored as JSON next to the claims file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use flats_engine::volume::WorldCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between autosaves.
    pub autosave_interval_secs: u64,
    /// Largest allowed volume for a single claimed area, in blocks.
    pub max_flat_volume: u64,
    /// How many flats one non-admin actor may own at once.
    pub max_claimable_flats: usize,
    /// World names claim areas may refer to.
    pub worlds: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 300,
            max_flat_volume: 10_000,
            max_claimable_flats: 1,
            worlds: vec!["world".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from `path`, writing the defaults there first if
    /// the file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let defaults = Self::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating data dir {}", parent.display()))?;
            }
            let json = serde_json::to_string_pretty(&defaults).context("serializing settings")?;
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote default settings to {}", path.display());
            return Ok(defaults);
        }
        let json =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    /// Catalog of the worlds named in the settings.
    pub fn catalog(&self) -> WorldCatalog {
        let mut catalog = WorldCatalog::new();
        for name in &self.worlds {
            catalog.register(name);
        }
        catalog
    }
}
