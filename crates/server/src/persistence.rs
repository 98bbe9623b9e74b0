//! Claims persistence.
//!
//! Flats are stored in a single JSON document: per flat a nullable
//! owner UUID, the ordered list of area strings in the
//! `world:x1,y1,z1;x2,y2,z2` format, and the trusted UUID list. An
//! absent owner means unclaimed.
//!
//! Loading tolerates partial damage: a malformed area string or one
//! referring to an unknown world drops that area with a warning, a flat
//! left with no valid areas is dropped with a warning, and the rest of
//! the file still loads. A single corrupt flat must never take the
//! whole dataset down.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flats_engine::flat::Flat;
use flats_engine::volume::{AreaVolume, WorldCatalog};

#[derive(Serialize, Deserialize, Debug, Default)]
struct ClaimsFile {
    flats: IndexMap<String, FlatRecord>,
}

#[derive(Serialize, Deserialize, Debug)]
struct FlatRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    trusted: Vec<String>,
}

/// Serialize a registry snapshot to `path`. The caller takes the
/// snapshot on the commanding thread; this function only ever touches
/// that owned copy. Returns the number of flats written.
pub fn save_flats(snapshot: &[Flat], path: &Path) -> Result<usize> {
    let start = Instant::now();

    let mut file = ClaimsFile::default();
    for flat in snapshot {
        let record = FlatRecord {
            owner: flat.owner().map(|id| id.to_string()),
            areas: flat.areas().iter().map(AreaVolume::to_string).collect(),
            trusted: flat.trusted().iter().map(Uuid::to_string).collect(),
        };
        file.flats.insert(flat.name().to_string(), record);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&file).context("serializing claims")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(
        "Saved {} flats to {} ({:.2?})",
        file.flats.len(),
        path.display(),
        start.elapsed(),
    );
    Ok(file.flats.len())
}

/// Load all flats from `path`, resolving worlds through `catalog`.
/// A missing file is an empty claim set, not an error.
pub fn load_flats(path: &Path, catalog: &WorldCatalog) -> Result<Vec<Flat>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: ClaimsFile =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;

    let mut flats = Vec::new();
    for (name, record) in file.flats {
        let mut areas = Vec::new();
        for s in &record.areas {
            match AreaVolume::parse(s, catalog) {
                Ok(area) => areas.push(area),
                Err(e) => tracing::warn!("Dropping area of flat '{}': {}", name, e),
            }
        }

        let owner = record.owner.as_deref().and_then(|s| match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(
                    "Flat '{}' has unparseable owner '{}', treating as unclaimed",
                    name,
                    s,
                );
                None
            }
        });
        let trusted: Vec<Uuid> = record
            .trusted
            .iter()
            .filter_map(|s| match Uuid::parse_str(s) {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(
                        "Flat '{}' has unparseable trusted entry '{}', skipping",
                        name,
                        s,
                    );
                    None
                }
            })
            .collect();

        match Flat::from_parts(name.clone(), areas, owner, trusted) {
            Some(flat) => flats.push(flat),
            None => tracing::warn!("Dropping flat '{}': no valid areas left", name),
        }
    }

    tracing::info!("Loaded {} flats from {}", flats.len(), path.display());
    Ok(flats)
}
